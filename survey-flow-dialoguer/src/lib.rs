//! # survey-flow-dialoguer
//!
//! Dialoguer respondent for survey-flow.
//!
//! Questions are presented one at a time in the terminal, in the order the
//! flow engine decides. Follow-up questions appear only when the answers
//! given so far route to them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use survey_flow::{RespondentInfo, parse_survey, run};
//! use survey_flow_dialoguer::DialoguerRespondent;
//!
//! fn main() -> anyhow::Result<()> {
//!     let tree = parse_survey(&std::fs::read_to_string("survey.json")?);
//!     let session = run(&tree, DialoguerRespondent::new())?;
//!     let body = session.submission(RespondentInfo::default())?;
//!     println!("{}", serde_json::to_string_pretty(&body)?);
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::{DialoguerError, DialoguerRespondent, is_cancellation};
