use std::sync::Arc;

use log::{error, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use lumina_core::model::{OPTION_COUNT, QuizQuestion};

use crate::ai::backend::{
    GenerationBackend, GenerationConfig, GenerationRequest, HttpGenerationBackend,
};
use crate::error::GenerationError;

/// Number of questions a quiz generation asks for and accepts.
pub const QUIZ_LENGTH: usize = 5;

const UNAVAILABLE_REPLY: &str = "AI Service Unavailable";
const EMPTY_REPLY: &str = "I'm sorry, I didn't catch that.";
const FAILED_REPLY: &str = "I'm having trouble connecting right now.";

/// Best-effort client over the generation endpoint.
///
/// Both operations make at most one outbound call and collapse every failure
/// to a safe fallback value; nothing here ever propagates an error to the
/// caller. No retries, no caching.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl GenerationClient {
    /// A client wired to the HTTP backend, or a disabled one when the
    /// environment carries no credential.
    #[must_use]
    pub fn from_env() -> Self {
        match GenerationConfig::from_env() {
            Some(config) => Self::new(Arc::new(HttpGenerationBackend::new(config))),
            None => {
                warn!("generation API key not found, AI features disabled");
                Self::disabled()
            }
        }
    }

    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A client with no backend; every call takes the fallback path.
    #[must_use]
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Generate a [`QUIZ_LENGTH`]-question multiple-choice quiz about `topic`.
    ///
    /// Returns either exactly [`QUIZ_LENGTH`] validated questions or an empty
    /// vector; a missing credential, transport failure, or malformed payload
    /// all yield the empty vector. `topic` must not be blank.
    pub async fn generate_quiz(&self, topic: &str) -> Vec<QuizQuestion> {
        debug_assert!(!topic.trim().is_empty(), "topic must not be blank");
        match self.request_quiz(topic).await {
            Ok(questions) => questions,
            Err(err) => {
                error!("quiz generation failed: {err}");
                Vec::new()
            }
        }
    }

    async fn request_quiz(&self, topic: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
        let backend = self.backend.as_deref().ok_or(GenerationError::Disabled)?;
        let request = GenerationRequest::structured(quiz_prompt(topic), quiz_schema());
        let text = backend.complete(&request).await?;
        parse_quiz_payload(&text)
    }

    /// One tutor reply for `message`, given the prior transcript lines.
    ///
    /// Never returns an empty string: a missing credential, an empty reply,
    /// and a failed request each map to a fixed fallback text.
    pub async fn tutor_reply(&self, history: &[String], message: &str) -> String {
        let Some(backend) = self.backend.as_deref() else {
            return UNAVAILABLE_REPLY.to_string();
        };
        let request = GenerationRequest::text(tutor_prompt(history, message));
        match backend.complete(&request).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) | Err(GenerationError::EmptyResponse) => EMPTY_REPLY.to_string(),
            Err(err) => {
                error!("tutor reply failed: {err}");
                FAILED_REPLY.to_string()
            }
        }
    }
}

fn quiz_prompt(topic: &str) -> String {
    format!(
        "Generate {QUIZ_LENGTH} multiple choice questions about \"{topic}\" for a high school student."
    )
}

fn quiz_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "question": { "type": "string" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": OPTION_COUNT,
                    "maxItems": OPTION_COUNT
                },
                "correctAnswer": {
                    "type": "integer",
                    "description": "Index of the correct option (0-3)"
                }
            },
            "required": ["question", "options", "correctAnswer"]
        }
    })
}

fn tutor_prompt(history: &[String], message: &str) -> String {
    format!(
        "You are an encouraging and helpful AI tutor in a Learning Management System.\n\
         Conversation History:\n{}\n\
         User: {message}\n\n\
         Keep response concise (under 50 words) and helpful.",
        history.join("\n")
    )
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: usize,
}

/// Parse and validate a generated quiz payload, all-or-nothing.
fn parse_quiz_payload(text: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
    let raw: Vec<RawQuestion> = serde_json::from_str(strip_code_fences(text))?;
    if raw.len() != QUIZ_LENGTH {
        return Err(GenerationError::QuestionCount {
            expected: QUIZ_LENGTH,
            got: raw.len(),
        });
    }
    raw.into_iter()
        .map(|entry| {
            Ok(QuizQuestion::new(
                entry.question,
                entry.options,
                entry.correct_answer,
            )?)
        })
        .collect()
}

/// Models occasionally wrap a JSON payload in a markdown code fence.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
