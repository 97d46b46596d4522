use lumina_core::Clock;
use lumina_core::model::{ChatSessionError, ChatTranscript};

use crate::ai::GenerationClient;

/// Greeting the tutor opens every conversation with.
pub const TUTOR_GREETING: &str =
    "Hi! I'm your AI Tutor. Need help with homework or understanding a topic?";

/// One tutor conversation: a transcript plus the generation client.
pub struct TutorService {
    client: GenerationClient,
    clock: Clock,
    transcript: ChatTranscript,
}

impl TutorService {
    #[must_use]
    pub fn new(client: GenerationClient) -> Self {
        let clock = Clock::default();
        Self {
            transcript: ChatTranscript::with_greeting(TUTOR_GREETING, clock.now()),
            client,
            clock,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GenerationClient::from_env())
    }

    /// Use a fixed clock for deterministic message timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Send one user message and append the tutor's reply.
    ///
    /// The user turn lands on the transcript immediately; the assistant turn
    /// follows once the round trip resolves, with the client's fallbacks
    /// guaranteeing a non-empty reply even when the service is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `ChatSessionError::ReplyPending` or
    /// `ChatSessionError::EmptyMessage` without touching the transcript.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatSessionError> {
        let history = self.transcript.history_lines();
        let token = self.transcript.begin_send(text, self.clock.now())?;
        let reply = self.client.tutor_reply(&history, text).await;
        self.transcript
            .complete_send(token, reply.clone(), self.clock.now());
        Ok(reply)
    }
}
