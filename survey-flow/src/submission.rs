//! The answer payload sent when a respondent submits a survey.

use serde::{Deserialize, Serialize};
use survey_flow_types::{AnswerValue, Answers, QuestionId, QuestionNode, QuestionType};

/// Error type for building a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Survey has no questions")]
    NoQuestions,

    #[error("Survey is not accepting answers")]
    Closed,

    #[error("{} question(s) still need an answer", .missing.len())]
    Incomplete { missing: Vec<QuestionId> },

    #[error("Could not encode answer for question {question}: {source}")]
    Encode {
        question: QuestionId,
        #[source]
        source: serde_json::Error,
    },
}

/// An identifier as the backend expects it: numeric ids are sent as
/// numbers, anything else as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Number)
    }
}

impl From<&QuestionId> for WireId {
    fn from(id: &QuestionId) -> Self {
        Self::parse(id.as_str())
    }
}

/// Contact details of the person answering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentInfo {
    pub full_name: String,
    pub position: String,
    pub phone_number: String,
    pub company_name: String,
}

/// One answered question in backend form.
///
/// Exactly one of the three answer fields is set, depending on the
/// question type. The others are sent as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAnswer {
    pub question_id: WireId,
    /// Chosen option of a single-choice question.
    pub option_id: Option<WireId>,
    /// Rating or free text, as a string.
    pub text_answer: Option<String>,
    /// Chosen options of a multiple-choice question, as a JSON-encoded array.
    pub extra_option_ids: Option<String>,
}

impl SubmissionAnswer {
    /// Convert one answer to backend form.
    ///
    /// Returns `Ok(None)` for empty answers and for answers whose shape does
    /// not fit the question type.
    pub fn from_answer(question: &QuestionNode, value: &AnswerValue) -> Result<Option<Self>, SubmitError> {
        if !question.accepts(value) {
            return Ok(None);
        }
        let mut answer = Self {
            question_id: question.id().into(),
            option_id: None,
            text_answer: None,
            extra_option_ids: None,
        };
        match question.question_type() {
            QuestionType::SingleChoice => {
                answer.option_id = value.scalar().map(|raw| WireId::parse(&question.option_key(&raw)));
            }
            QuestionType::MultipleChoice => {
                let Some(items) = value.as_list() else {
                    return Ok(None);
                };
                let ids: Vec<WireId> = items
                    .iter()
                    .map(|raw| WireId::parse(&question.option_key(raw)))
                    .collect();
                let encoded = serde_json::to_string(&ids).map_err(|source| SubmitError::Encode {
                    question: question.id().clone(),
                    source,
                })?;
                answer.extra_option_ids = Some(encoded);
            }
            QuestionType::Rating | QuestionType::Text => {
                answer.text_answer = value.scalar();
            }
        }
        let filled = answer.option_id.is_some() || answer.text_answer.is_some() || answer.extra_option_ids.is_some();
        Ok(filled.then_some(answer))
    }
}

/// The full submission request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub survey_id: Option<WireId>,
    #[serde(flatten)]
    pub respondent: RespondentInfo,
    pub answers: Vec<SubmissionAnswer>,
}

/// Convert the answers along `paths` to backend form, in path order.
///
/// Answers to questions that are not on any path are left out.
pub fn map_answers(paths: &[Vec<&QuestionNode>], answers: &Answers) -> Result<Vec<SubmissionAnswer>, SubmitError> {
    let mut mapped = Vec::new();
    for question in paths.iter().flatten() {
        let Some(value) = answers.get(question.id().as_str()) else {
            continue;
        };
        match SubmissionAnswer::from_answer(question, value)? {
            Some(answer) => mapped.push(answer),
            None => {
                tracing::debug!(question = %question.id(), kind = value.type_name(), "answer not submittable, skipping");
            }
        }
    }
    Ok(mapped)
}
