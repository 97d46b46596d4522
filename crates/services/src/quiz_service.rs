use log::debug;

use lumina_core::model::{QuizPhase, QuizSession};

use crate::ai::GenerationClient;
use crate::error::QuizServiceError;

/// Drives a [`QuizSession`] with the generation client.
///
/// One generation call is outstanding at a time; the session's state machine
/// rejects a second request while the first is in flight, and a result for a
/// quiz that was discarded in the meantime is dropped instead of applied.
pub struct QuizService {
    client: GenerationClient,
    session: QuizSession,
}

impl QuizService {
    #[must_use]
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            session: QuizSession::new(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GenerationClient::from_env())
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Generate a fresh quiz about `topic`.
    ///
    /// Returns the settled phase: `Ready` when generation produced a quiz,
    /// `Empty` when it failed or produced nothing.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::EmptyTopic` for a blank topic and
    /// `QuizServiceError::Session` while a generation is already in flight;
    /// the session is untouched in both cases.
    pub async fn start_generation(&mut self, topic: &str) -> Result<QuizPhase, QuizServiceError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizServiceError::EmptyTopic);
        }

        let token = self.session.begin_generation()?;
        let questions = self.client.generate_quiz(topic).await;
        if !self.session.apply_generation(token, questions) {
            debug!("discarded generation result for a superseded quiz");
        }
        Ok(self.session.phase())
    }

    /// Select the answer for one question of the current quiz.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        self.session.select_answer(question, option);
    }

    /// Submit the current quiz and return the score.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` unless a quiz is ready or already
    /// submitted.
    pub fn submit(&mut self) -> Result<usize, QuizServiceError> {
        Ok(self.session.submit()?)
    }

    /// Discard the current quiz so a new topic can be entered.
    pub fn start_new(&mut self) {
        self.session.reset();
    }
}
