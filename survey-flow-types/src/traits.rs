use std::fmt;

use crate::{AnswerValue, QuestionNode};

/// Trait for respondent implementations that answer survey questions.
///
/// A respondent is asked one question at a time, in the order the flow
/// engine presents them. It decides how to present the question (terminal
/// prompt, scripted answers, ...) and returns the chosen answer.
pub trait Respondent {
    /// The error type for this respondent.
    type Error: Into<anyhow::Error>;

    /// Answer a single question.
    ///
    /// # Arguments
    /// * `question` - The question to answer
    /// * `previous` - The answer given earlier, if the question is asked again
    ///
    /// # Returns
    /// * `Ok(value)` with the answer
    /// * `Err` on cancellation or backend failure
    fn respond(
        &mut self,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, Self::Error>;
}

impl<R: Respondent + ?Sized> Respondent for &mut R {
    type Error = R::Error;

    fn respond(
        &mut self,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, Self::Error> {
        (**self).respond(question, previous)
    }
}

/// Credential sent with survey requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>`
    Bearer(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Explicit request context handed to every source call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub base_url: String,
    pub credential: Option<Credential>,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: None,
        }
    }

    /// Attach a bearer token.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::Bearer(token.into()));
        self
    }

    /// The value of the `Authorization` header, if any.
    pub fn authorization(&self) -> Option<String> {
        self.credential.as_ref().map(|credential| match credential {
            Credential::Bearer(token) => format!("Bearer {token}"),
        })
    }
}

/// Error type for survey sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Survey not found: {0}")]
    NotFound(String),

    #[error("Empty response for survey {0}")]
    Empty(String),

    #[error("Source error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Trait for places survey detail payloads are fetched from.
///
/// The transport (HTTP, file, fixture) is up to the implementation; the
/// payload is returned as raw JSON and normalized by the caller.
pub trait SurveySource {
    fn fetch(
        &self,
        context: &RequestContext,
        survey_id: &str,
    ) -> Result<serde_json::Value, SourceError>;
}
