//! Tolerant read access to survey payloads.
//!
//! Survey payloads come from more than one producer: the public survey
//! endpoint nests follow-up questions under their options, the admin
//! endpoint lists every question flat. Field casing differs between them,
//! ids arrive as numbers or strings, and any field may be missing or `null`.
//! [`RawObject`] looks a field up under all of its known spellings and
//! coerces it to the expected shape, treating anything unusable as absent.

use serde_json::{Map, Value};

/// A JSON object viewed through lenient, multi-key accessors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawObject<'a>(&'a Map<String, Value>);

impl<'a> RawObject<'a> {
    pub(crate) fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self)
    }

    /// The first non-null value stored under any of `keys`.
    pub(crate) fn field(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// A string or number, rendered as a string. Empty strings count as absent.
    pub(crate) fn scalar(&self, keys: &[&str]) -> Option<String> {
        self.field(keys).and_then(scalar_string).filter(|s| !s.is_empty())
    }

    /// Free text. Unlike [`RawObject::scalar`], an empty string is kept.
    pub(crate) fn text(&self, keys: &[&str]) -> Option<String> {
        self.field(keys).and_then(scalar_string)
    }

    pub(crate) fn int(&self, keys: &[&str]) -> Option<i64> {
        match self.field(keys)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn flag(&self, keys: &[&str]) -> bool {
        match self.field(keys) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => matches!(s.trim(), "true" | "True" | "1"),
            _ => false,
        }
    }

    pub(crate) fn array(&self, keys: &[&str]) -> Option<&'a [Value]> {
        self.field(keys).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// A list of scalars, stringified. `None` unless the field is an array;
    /// non-scalar elements are skipped.
    pub(crate) fn scalar_list(&self, keys: &[&str]) -> Option<Vec<String>> {
        self.array(keys)
            .map(|items| items.iter().filter_map(scalar_string).collect())
    }

    pub(crate) fn object(&self, keys: &[&str]) -> Option<&'a Value> {
        self.field(keys).filter(|value| value.is_object())
    }

    pub(crate) fn nested(&self, keys: &[&str]) -> Option<RawObject<'a>> {
        self.object(keys).and_then(RawObject::new)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) mod keys {
    pub const ID: &[&str] = &["id", "Id", "ID"];
    pub const SURVEY: &[&str] = &["survey", "Survey"];
    pub const ROOT_QUESTIONS: &[&str] = &["rootQuestions", "RootQuestions", "root_questions"];
    pub const QUESTIONS: &[&str] = &["questions", "Questions"];
    pub const TITLE: &[&str] = &["title", "Title"];
    pub const DESCRIPTION: &[&str] = &["description", "Description"];
    pub const STATUS: &[&str] = &["status", "Status"];

    pub const CONTENT: &[&str] = &["content", "Content", "text", "Text"];
    pub const QUESTION_TYPE: &[&str] = &["questionType", "QuestionType", "question_type"];
    pub const TYPE_NAME: &[&str] = &["type", "Type"];
    pub const TYPE_CODE: &[&str] = &["code", "Code", "name", "Name"];
    pub const REQUIRED: &[&str] = &["isRequired", "IsRequired", "is_required", "required"];
    pub const ORDER: &[&str] = &["order", "Order"];
    pub const MIN_RATING: &[&str] = &["minRating", "MinRating", "min_rating"];
    pub const MAX_RATING: &[&str] = &["maxRating", "MaxRating", "max_rating"];
    pub const OPTIONS: &[&str] = &["options", "Options"];
    pub const BRANCHES: &[&str] = &["branches", "Branches"];

    pub const VALUE: &[&str] = &["value", "Value"];
    pub const NEXT_QUESTION: &[&str] = &["nextQuestion", "NextQuestion", "next_question"];
    pub const NEXT_QUESTION_ID: &[&str] = &["nextQuestionId", "NextQuestionId", "next_question_id"];
    pub const CONDITION_TYPE: &[&str] = &["conditionType", "ConditionType", "condition_type"];
    pub const BRANCH_OPTION_IDS: &[&str] = &["branchOptionIds", "BranchOptionIds", "branch_option_ids"];

    pub const CURRENT_QUESTION_ID: &[&str] =
        &["currentQuestionId", "CurrentQuestionId", "current_question_id"];
    pub const OPTION_IDS: &[&str] = &["optionIds", "OptionIds", "option_ids"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_skips_null_spellings() {
        let value = json!({ "rootQuestions": null, "RootQuestions": [1] });
        let raw = RawObject::new(&value).unwrap();
        assert_eq!(raw.array(keys::ROOT_QUESTIONS).map(<[Value]>::len), Some(1));
    }

    #[test]
    fn scalars_accept_numbers_and_strings() {
        let value = json!({ "id": 12, "nextQuestionId": "7", "order": "3", "minRating": 1.0 });
        let raw = RawObject::new(&value).unwrap();
        assert_eq!(raw.scalar(keys::ID).as_deref(), Some("12"));
        assert_eq!(raw.scalar(keys::NEXT_QUESTION_ID).as_deref(), Some("7"));
        assert_eq!(raw.int(keys::ORDER), Some(3));
        assert_eq!(raw.int(keys::MIN_RATING), Some(1));
    }

    #[test]
    fn empty_scalar_is_absent_but_empty_text_is_kept() {
        let value = json!({ "conditionType": "", "content": "" });
        let raw = RawObject::new(&value).unwrap();
        assert_eq!(raw.scalar(keys::CONDITION_TYPE), None);
        assert_eq!(raw.text(keys::CONTENT).as_deref(), Some(""));
    }

    #[test]
    fn flags() {
        let value = json!({ "isRequired": true, "required": 0, "is_required": "1" });
        let raw = RawObject::new(&value).unwrap();
        assert!(raw.flag(&["isRequired"]));
        assert!(!raw.flag(&["required"]));
        assert!(raw.flag(&["is_required"]));
        assert!(!raw.flag(&["missing"]));
    }

    #[test]
    fn scalar_list_requires_an_array() {
        let value = json!({ "branchOptionIds": [1, "2", null, {}], "optionIds": "1,2" });
        let raw = RawObject::new(&value).unwrap();
        assert_eq!(
            raw.scalar_list(keys::BRANCH_OPTION_IDS),
            Some(vec!["1".to_string(), "2".to_string()])
        );
        assert_eq!(raw.scalar_list(keys::OPTION_IDS), None);
    }
}
