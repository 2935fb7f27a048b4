use crate::{QuestionId, QuestionType};

/// Error type for survey session operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Respondent cancelled the survey (Ctrl+C, closed window, etc.)
    #[error("Survey cancelled by respondent")]
    Cancelled,

    /// The survey has no root questions.
    #[error("No questions available")]
    NoQuestions,

    /// No question with this id exists in the survey.
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    /// The question exists but is not part of the active root's path.
    #[error("Question '{0}' is not on the active path")]
    NotInActivePath(QuestionId),

    /// The respondent returned an empty answer for a question it was asked.
    #[error("Empty answer for question: {0}")]
    EmptyAnswer(QuestionId),

    /// The respondent returned a value that cannot answer a question of this type.
    #[error("Answer for question {question} does not fit a {expected} question (got {actual})")]
    WrongShape {
        question: QuestionId,
        expected: QuestionType,
        actual: &'static str,
    },

    /// Backend-specific failure (I/O, UI framework crash, etc.)
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl FlowError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error represents respondent cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
