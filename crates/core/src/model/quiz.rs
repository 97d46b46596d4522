use thiserror::Error;

use crate::model::QuizQuestion;

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizSessionError {
    #[error("a generation request is already in flight")]
    GenerationInFlight,

    #[error("no quiz is ready to submit")]
    NotReady,
}

/// Externally visible lifecycle phase of a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Empty,
    Loading,
    Ready,
    Submitted,
}

/// Single-use handle returned by [`QuizSession::begin_generation`].
///
/// The token pins a generation result to the request that asked for it: if
/// the session was reset or restarted while the call was outstanding, the
/// token no longer matches and the late result is discarded.
#[derive(Debug)]
pub struct GenerationToken(u64);

/// In-memory quiz lifecycle: `Empty → Loading → Ready → Submitted`.
///
/// The session holds the generated questions, one selected answer slot per
/// question, and the score computed once at submission. It performs no IO;
/// a caller drives it with the result of a generation call.
#[derive(Debug, Default)]
pub struct QuizSession {
    generation: u64,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Empty,
    Loading,
    Ready {
        questions: Vec<QuizQuestion>,
        answers: Vec<Option<usize>>,
    },
    Submitted {
        questions: Vec<QuizQuestion>,
        answers: Vec<Option<usize>>,
        score: usize,
    },
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match self.state {
            State::Empty => QuizPhase::Empty,
            State::Loading => QuizPhase::Loading,
            State::Ready { .. } => QuizPhase::Ready,
            State::Submitted { .. } => QuizPhase::Submitted,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, State::Loading)
    }

    /// Questions of the current quiz; empty unless `Ready` or `Submitted`.
    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        match &self.state {
            State::Ready { questions, .. } | State::Submitted { questions, .. } => questions,
            _ => &[],
        }
    }

    /// Selected answer per question; same length as [`Self::questions`].
    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        match &self.state {
            State::Ready { answers, .. } | State::Submitted { answers, .. } => answers,
            _ => &[],
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers().iter().flatten().count()
    }

    /// Final score; `None` until the quiz has been submitted.
    #[must_use]
    pub fn score(&self) -> Option<usize> {
        match self.state {
            State::Submitted { score, .. } => Some(score),
            _ => None,
        }
    }

    /// Enter `Loading` and hand out a token for the matching result.
    ///
    /// Any questions and answers from a previous quiz are discarded, as when
    /// the user starts a new quiz after submitting.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::GenerationInFlight` while a generation is
    /// outstanding; the session is left untouched.
    pub fn begin_generation(&mut self) -> Result<GenerationToken, QuizSessionError> {
        if self.is_loading() {
            return Err(QuizSessionError::GenerationInFlight);
        }
        self.generation += 1;
        self.state = State::Loading;
        Ok(GenerationToken(self.generation))
    }

    /// Apply the result of a generation call.
    ///
    /// Returns `false` and leaves the session untouched when the token is
    /// stale (the session was reset or restarted in the meantime). An empty
    /// result collapses back to `Empty`; a non-empty one becomes `Ready`
    /// with every question unanswered.
    pub fn apply_generation(
        &mut self,
        token: GenerationToken,
        questions: Vec<QuizQuestion>,
    ) -> bool {
        if token.0 != self.generation || !self.is_loading() {
            return false;
        }
        self.state = if questions.is_empty() {
            State::Empty
        } else {
            let answers = vec![None; questions.len()];
            State::Ready { questions, answers }
        };
        true
    }

    /// Select the answer for one question, overwriting any previous choice.
    ///
    /// Has no effect after submission (answers are frozen) or while no quiz
    /// is ready.
    ///
    /// # Panics
    ///
    /// Panics if `question` or `option` is out of range for the current quiz;
    /// callers are expected to index into the rendered question list.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        if let State::Ready { questions, answers } = &mut self.state {
            assert!(
                question < questions.len(),
                "question index {question} out of range"
            );
            assert!(
                option < questions[question].options().len(),
                "option index {option} out of range"
            );
            answers[question] = Some(option);
        }
    }

    /// Finalize the quiz and compute the score.
    ///
    /// The score counts questions whose selected answer equals the correct
    /// index; unanswered questions count as incorrect. Submitting an already
    /// submitted quiz is idempotent and returns the stored score.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotReady` unless a quiz is ready or
    /// already submitted.
    pub fn submit(&mut self) -> Result<usize, QuizSessionError> {
        match std::mem::take(&mut self.state) {
            State::Ready { questions, answers } => {
                let score = questions
                    .iter()
                    .zip(&answers)
                    .filter(|(question, answer)| **answer == Some(question.correct_answer()))
                    .count();
                self.state = State::Submitted {
                    questions,
                    answers,
                    score,
                };
                Ok(score)
            }
            State::Submitted {
                questions,
                answers,
                score,
            } => {
                self.state = State::Submitted {
                    questions,
                    answers,
                    score,
                };
                Ok(score)
            }
            other => {
                self.state = other;
                Err(QuizSessionError::NotReady)
            }
        }
    }

    /// Return to `Empty`, invalidating any outstanding generation token.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = State::Empty;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: usize) -> QuizQuestion {
        let options = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        QuizQuestion::new(text, options, correct).unwrap()
    }

    fn five_questions() -> Vec<QuizQuestion> {
        (0..5).map(|i| question(&format!("Q{i}"), i % 4)).collect()
    }

    #[test]
    fn new_session_is_empty() {
        let session = QuizSession::new();
        assert_eq!(session.phase(), QuizPhase::Empty);
        assert!(session.questions().is_empty());
        assert_eq!(session.score(), None);
    }

    #[test]
    fn generation_populates_ready_state() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        assert_eq!(session.phase(), QuizPhase::Loading);

        assert!(session.apply_generation(token, five_questions()));
        assert_eq!(session.phase(), QuizPhase::Ready);
        assert_eq!(session.questions().len(), 5);
        assert_eq!(session.answers(), &[None; 5]);
    }

    #[test]
    fn empty_generation_collapses_to_empty() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        assert!(session.apply_generation(token, Vec::new()));
        assert_eq!(session.phase(), QuizPhase::Empty);
    }

    #[test]
    fn second_generation_while_loading_is_a_no_op() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();

        let err = session.begin_generation().unwrap_err();
        assert_eq!(err, QuizSessionError::GenerationInFlight);
        assert_eq!(session.phase(), QuizPhase::Loading);

        // The original token still applies.
        assert!(session.apply_generation(token, five_questions()));
        assert_eq!(session.phase(), QuizPhase::Ready);
    }

    #[test]
    fn stale_result_after_reset_is_discarded() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.reset();

        assert!(!session.apply_generation(token, five_questions()));
        assert_eq!(session.phase(), QuizPhase::Empty);
        assert!(session.questions().is_empty());
    }

    #[test]
    fn stale_result_after_restart_is_discarded() {
        let mut session = QuizSession::new();
        let old = session.begin_generation().unwrap();
        session.reset();
        let fresh = session.begin_generation().unwrap();

        assert!(!session.apply_generation(old, five_questions()));
        assert_eq!(session.phase(), QuizPhase::Loading);
        assert!(session.apply_generation(fresh, five_questions()));
        assert_eq!(session.phase(), QuizPhase::Ready);
    }

    #[test]
    fn selecting_overwrites_previous_answer() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.apply_generation(token, five_questions());

        session.select_answer(2, 0);
        session.select_answer(2, 3);
        assert_eq!(session.answers()[2], Some(3));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        // Correct answers are 0, 1, 2, 3, 0.
        session.apply_generation(token, five_questions());

        session.select_answer(0, 0); // correct
        session.select_answer(1, 1); // correct
        session.select_answer(2, 3); // wrong
        session.select_answer(3, 3); // correct
        // question 4 left unanswered

        let score = session.submit().unwrap();
        assert_eq!(score, 3);
        assert_eq!(session.phase(), QuizPhase::Submitted);
        assert_eq!(session.score(), Some(3));
    }

    #[test]
    fn unanswered_questions_never_count_as_correct() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.apply_generation(token, five_questions());

        assert_eq!(session.submit().unwrap(), 0);
    }

    #[test]
    fn submit_is_idempotent() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.apply_generation(token, five_questions());
        session.select_answer(0, 0);

        assert_eq!(session.submit().unwrap(), 1);
        assert_eq!(session.submit().unwrap(), 1);
        assert_eq!(session.phase(), QuizPhase::Submitted);
    }

    #[test]
    fn answers_are_frozen_after_submission() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.apply_generation(token, five_questions());
        session.select_answer(0, 0);
        session.submit().unwrap();

        session.select_answer(0, 2);
        assert_eq!(session.answers()[0], Some(0));
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn submit_without_quiz_is_rejected() {
        let mut session = QuizSession::new();
        assert_eq!(session.submit().unwrap_err(), QuizSessionError::NotReady);

        session.begin_generation().unwrap();
        assert_eq!(session.submit().unwrap_err(), QuizSessionError::NotReady);
    }

    #[test]
    fn reset_clears_a_submitted_quiz() {
        let mut session = QuizSession::new();
        let token = session.begin_generation().unwrap();
        session.apply_generation(token, five_questions());
        session.submit().unwrap();

        session.reset();
        assert_eq!(session.phase(), QuizPhase::Empty);
        assert!(session.questions().is_empty());
        assert_eq!(session.score(), None);
    }
}
