use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a question, unique within one survey.
///
/// Backends hand out numeric ids, older payloads use strings. Both are
/// stored as their string form so that ids compare the same regardless of
/// how the payload spelled them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Create a new id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric form of this id, if it has one.
    ///
    /// Submission payloads send numeric ids as JSON numbers.
    pub fn as_number(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for QuestionId {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<i64> for QuestionId {
    fn from(n: i64) -> Self {
        Self::new(n.to_string())
    }
}

impl From<&QuestionId> for QuestionId {
    fn from(id: &QuestionId) -> Self {
        id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        assert_eq!(QuestionId::from(12), QuestionId::from("12"));
    }

    #[test]
    fn as_number() {
        assert_eq!(QuestionId::new("42").as_number(), Some(42));
        assert_eq!(QuestionId::new("q-42").as_number(), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", QuestionId::new("q1")), "q1");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::new("q1")).unwrap();
        assert_eq!(json, "\"q1\"");
    }
}
