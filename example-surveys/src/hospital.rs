//! The inpatient experience survey.
//!
//! Three roots:
//! 1. An overall rating. A rating of 1 or 2 asks what disappointed the
//!    patient. Picking exactly waiting times and staff attitude offers a
//!    callback, picking cleanliness (without that exact pair) asks which
//!    area.
//! 2. Discharge instructions. "No" asks what was unclear.
//! 3. Free comments.

use survey_flow::{NormalizeOptions, SurveyTree, normalize, parse_survey};

/// Public survey endpoint shape: roots with follow-ups nested under options.
pub const INPATIENT_EXPERIENCE_JSON: &str = include_str!("../data/inpatient-experience.json");

/// Admin endpoint shape: every question listed flat, PascalCase keys,
/// combinational branches as separate records. The survey is still a draft.
pub const WARD_ADMIN_JSON: &str = include_str!("../data/ward-admin.json");

pub fn inpatient_experience() -> SurveyTree {
    parse_survey(INPATIENT_EXPERIENCE_JSON)
}

pub fn ward_admin() -> SurveyTree {
    normalize::try_parse_survey(WARD_ADMIN_JSON, &NormalizeOptions::default()).unwrap_or_default()
}
