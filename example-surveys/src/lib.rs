//! Sample surveys for tests and the survey runner.
//!
//! `hospital` holds a complete inpatient experience survey in both payload
//! shapes the backend produces. `scenarios` holds small hand-built trees,
//! each exercising one branching rule.

pub mod hospital;
pub mod scenarios;

pub use hospital::{INPATIENT_EXPERIENCE_JSON, WARD_ADMIN_JSON, inpatient_experience, ward_admin};
pub use scenarios::{
    combinational_and, combinational_or, no_questions, rating_or, simple_yes_no, unknown_target, values_as_keys,
};
