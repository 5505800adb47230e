mod answers;
mod cursor;
mod engine;
mod events;
mod progress;
mod scoring;

// Public API of the attempt subsystem.
pub use crate::error::EngineError;
pub use answers::AnswerStore;
pub use cursor::Cursor;
pub use engine::{AttemptEngine, AttemptState};
pub use events::AttemptEvent;
pub use progress::AttemptProgress;
