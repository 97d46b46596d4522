//! Shared error types for the services crate.

use thiserror::Error;

use lumina_core::model::{QuestionError, QuizSessionError};

/// Errors emitted by the generation backend and client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generation service is not configured")]
    Disabled,

    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("generated payload was not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("generated question was malformed: {0}")]
    MalformedQuestion(#[from] QuestionError),

    #[error("expected {expected} questions, got {got}")]
    QuestionCount { expected: usize, got: usize },
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz topic must not be empty")]
    EmptyTopic,

    #[error(transparent)]
    Session(#[from] QuizSessionError),
}
