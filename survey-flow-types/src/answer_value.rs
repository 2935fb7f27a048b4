use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A single answer value collected for one question.
///
/// SingleChoice, Rating and Text questions are answered with a scalar,
/// MultipleChoice questions with a list of selected option values.
/// Values of the wrong shape for their question are kept as-is and simply
/// never match a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// No value (a cleared answer, or a value that could not be read).
    #[default]
    Null,

    /// A string value (option value, or free text).
    Text(String),

    /// A numeric value (ratings, numeric option values).
    Number(f64),

    /// Selected option values of a multi-select.
    List(Vec<String>),
}

impl AnswerValue {
    /// Whether this value counts as "not answered".
    ///
    /// Only a null value and an empty multi-select are empty. An empty
    /// string is a (blank) answer.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            Self::Text(_) | Self::Number(_) => false,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a list of selections.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The string form of a scalar value.
    ///
    /// Numbers render without a trailing `.0`, so a rating of `2` reads `"2"`.
    pub fn scalar(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Null | Self::List(_) => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
            Self::List(_) => "List",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<AnswerValue>> From<Option<T>> for AnswerValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Wire shape of an answer value as the UI layer sends it.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswerValue {
    Null,
    Number(f64),
    Text(String),
    List(Vec<RawScalar>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl From<RawAnswerValue> for AnswerValue {
    fn from(raw: RawAnswerValue) -> Self {
        match raw {
            RawAnswerValue::Null | RawAnswerValue::Other(_) => Self::Null,
            RawAnswerValue::Number(n) => Self::Number(n),
            RawAnswerValue::Text(s) => Self::Text(s),
            RawAnswerValue::List(items) => Self::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        RawScalar::Number(n) => Some(n.to_string()),
                        RawScalar::Text(s) => Some(s),
                        RawScalar::Other(_) => None,
                    })
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawAnswerValue::deserialize(deserializer).map(Self::from)
    }
}
