use thiserror::Error;

use crate::model::QuestionError;
use crate::timer::TimerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Timer(#[from] TimerError),
}
