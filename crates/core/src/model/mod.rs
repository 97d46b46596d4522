mod chat;
mod question;
mod quiz;

pub use chat::{ChatMessage, ChatRole, ChatSessionError, ChatTranscript, SendToken};
pub use question::{OPTION_COUNT, QuestionError, QuizQuestion};
pub use quiz::{GenerationToken, QuizPhase, QuizSession, QuizSessionError};
