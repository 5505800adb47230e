mod answer;
mod ids;
mod question;
mod result;
mod session;

pub use answer::AnswerValue;
pub use ids::{AssessmentId, AttemptId, ParseIdError, QuestionId};
pub use question::{Question, QuestionError, ResponseFormat};
pub use result::{GradeOutcome, QuestionOutcome, SubmissionResult};
pub use session::AssessmentSession;
