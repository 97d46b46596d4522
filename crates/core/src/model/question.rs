use serde::Serialize;
use thiserror::Error;

/// Number of answer options the generation contract asks for per question.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyQuestion,

    #[error("question has no answer options")]
    NoOptions,

    #[error("answer option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

/// A single validated multiple-choice question.
///
/// Generated payloads are untrusted, so construction goes through
/// [`QuizQuestion::new`]; a value of this type always holds a non-empty
/// question, non-empty options, and a correct-answer index within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl QuizQuestion {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the question text or any option is blank,
    /// the option list is empty, or `correct_answer` is out of range.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            question,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["6".into(), "7".into(), "8".into(), "9".into()]
    }

    #[test]
    fn valid_question_builds() {
        let question = QuizQuestion::new("What is 6 x 7 divided by 6?", options(), 1).unwrap();
        assert_eq!(question.question(), "What is 6 x 7 divided by 6?");
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert_eq!(question.correct_answer(), 1);
    }

    #[test]
    fn blank_question_text_is_rejected() {
        let err = QuizQuestion::new("   ", options(), 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyQuestion);
    }

    #[test]
    fn empty_option_list_is_rejected() {
        let err = QuizQuestion::new("Q", Vec::new(), 0).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn blank_option_is_rejected() {
        let err = QuizQuestion::new("Q", vec!["a".into(), " ".into()], 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected() {
        let err = QuizQuestion::new("Q", options(), 4).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectAnswerOutOfRange {
                index: 4,
                options: 4
            }
        );
    }
}
