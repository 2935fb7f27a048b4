//! # survey-flow
//!
//! Conditional flow engine for patient surveys.
//!
//! A survey is a forest of questions. Each answer may route the respondent
//! to a follow-up question, either through a single option (simple
//! branching) or through a condition over a set of options (combinational
//! branching, `AND` or `OR`). Given the answers so far, the engine computes
//! which questions are on each root's path, when a root is done, and what
//! to submit.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use survey_flow::{RespondentInfo, SurveySession, parse_survey};
//!
//! let tree = parse_survey(&payload);
//! let mut session = SurveySession::new(&tree);
//!
//! while let Some(question) = session.current_question() {
//!     let answer = ask(question);
//!     session.answer(question.id(), answer)?;
//! }
//!
//! let body = session.submission(RespondentInfo::default())?;
//! ```
//!
//! ## Modules
//!
//! - [`normalize`] - payload shapes to [`SurveyTree`]
//! - [`flow`] - pure path computation
//! - [`SurveySession`] - answers, truncation and cross-root progression
//! - [`lint`] - authoring checks for ambiguous routes and cycles
//! - [`SurveyLoader`] - fetching through a [`SurveySource`], latest request wins
//!
//! ## Respondents
//!
//! [`run`] drives a session with any [`Respondent`]:
//! - [`TestRespondent`] - scripted answers, for tests
//! - `survey-flow-dialoguer` - terminal prompts via dialoguer

// Re-export all types from survey-flow-types
pub use survey_flow_types::*;

pub mod flow;
pub mod lint;
pub mod normalize;

mod loader;
mod payload;
mod runner;
mod selection;
mod session;
mod slug;
mod source;
mod submission;

// Test respondent for running surveys without user interaction
mod test_backend;

pub use flow::{build_path, build_paths, is_root_exhausted, next_question, reset_path};
pub use lint::{LintWarning, lint};
pub use loader::{LoadedSurvey, RequestTicket, SurveyLoader};
pub use normalize::{
    NormalizeError, NormalizeOptions, discover_roots, normalize_survey, parse_survey, try_normalize_survey,
    try_parse_survey,
};
pub use runner::run;
pub use selection::Selection;
pub use session::{AnswerOutcome, Progress, SessionState, SurveySession};
pub use slug::{decode_survey_slug, survey_slug};
pub use source::JsonFileSource;
pub use submission::{RespondentInfo, SubmissionAnswer, SubmissionPayload, SubmitError, WireId, map_answers};
pub use test_backend::{TestRespondent, TestRespondentError};
