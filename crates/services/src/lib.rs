#![forbid(unsafe_code)]

pub mod ai;
pub mod error;
pub mod quiz_service;
pub mod tutor_service;

pub use lumina_core::Clock;

pub use ai::{
    GenerationBackend, GenerationClient, GenerationConfig, GenerationRequest,
    HttpGenerationBackend, QUIZ_LENGTH,
};
pub use error::{GenerationError, QuizServiceError};
pub use quiz_service::QuizService;
pub use tutor_service::{TUTOR_GREETING, TutorService};
