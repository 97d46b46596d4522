pub mod backend;
pub mod client;

pub use backend::{GenerationBackend, GenerationConfig, GenerationRequest, HttpGenerationBackend};
pub use client::{GenerationClient, QUIZ_LENGTH};
