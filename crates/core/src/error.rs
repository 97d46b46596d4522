use thiserror::Error;

use crate::model::{ChatSessionError, QuestionError, QuizSessionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuizSession(#[from] QuizSessionError),
    #[error(transparent)]
    ChatSession(#[from] ChatSessionError),
}
