//! Core types for the survey-flow crate.
//!
//! This crate provides the foundational types for conditional surveys:
//! - `SurveyTree` - The normalized question graph with its ordered roots
//! - `QuestionNode`, `SurveyOption` and `Route` - Questions and their branch decisions
//! - `Answers` and `AnswerValue` - The answer set of one respondent
//! - `Respondent` and `SurveySource` traits - For answering and loading surveys

mod question_id;
pub use question_id::QuestionId;

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{Answer, AnswerError, Answers};

mod route;
pub use route::Route;

mod question;
pub use question::{
    Branch, BranchGrouping, ConditionType, QuestionNode, QuestionType, SurveyOption,
};

mod survey_tree;
pub use survey_tree::{SurveyMeta, SurveyStatus, SurveyTree};

mod error;
pub use error::FlowError;

mod traits;
pub use traits::{Credential, RequestContext, Respondent, SourceError, SurveySource};
