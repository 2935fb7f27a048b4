//! Scripted respondent for running surveys without user interaction.
//!
//! `TestRespondent` answers each question from a table of pre-defined
//! answers keyed by question id, and records the order questions were
//! asked in. This is useful for testing survey definitions end to end.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_flow::{TestRespondent, parse_survey, run};
//!
//! let tree = parse_survey(payload);
//! let mut respondent = TestRespondent::new()
//!     .with_text("1", "11")
//!     .with_choices("3", ["31", "32"]);
//!
//! let session = run(&tree, &mut respondent).unwrap();
//! assert!(session.is_submit_ready());
//! ```

use std::collections::HashMap;

use survey_flow_types::{AnswerValue, QuestionId, QuestionNode, Respondent};

/// A respondent that returns pre-configured answers.
#[derive(Debug, Clone, Default)]
pub struct TestRespondent {
    answers: HashMap<QuestionId, AnswerValue>,
    asked: Vec<QuestionId>,
}

/// Error type for TestRespondent.
#[derive(Debug, thiserror::Error)]
pub enum TestRespondentError {
    #[error("Missing answer for question: {0}")]
    MissingAnswer(QuestionId),
}

impl TestRespondent {
    /// Create a new respondent without any answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer for a question.
    pub fn with_answer(mut self, question: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(question.into(), value.into());
        self
    }

    /// Add a text (or single option) answer.
    pub fn with_text(self, question: impl Into<QuestionId>, value: impl Into<String>) -> Self {
        self.with_answer(question, AnswerValue::Text(value.into()))
    }

    /// Add a numeric answer.
    pub fn with_number(self, question: impl Into<QuestionId>, value: f64) -> Self {
        self.with_answer(question, AnswerValue::Number(value))
    }

    /// Add a multiple-choice answer.
    pub fn with_choices(
        self,
        question: impl Into<QuestionId>,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let choices = choices.into_iter().map(Into::into).collect();
        self.with_answer(question, AnswerValue::List(choices))
    }

    /// Question ids in the order they were asked.
    pub fn asked(&self) -> &[QuestionId] {
        &self.asked
    }
}

impl Respondent for TestRespondent {
    type Error = TestRespondentError;

    fn respond(
        &mut self,
        question: &QuestionNode,
        _previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, Self::Error> {
        self.asked.push(question.id().clone());
        self.answers
            .get(question.id())
            .cloned()
            .ok_or_else(|| TestRespondentError::MissingAnswer(question.id().clone()))
    }
}
