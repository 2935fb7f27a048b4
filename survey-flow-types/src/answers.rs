use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId, QuestionNode};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    MissingAnswer(QuestionId),

    #[error("Type mismatch for question '{question}': expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// One answer as exchanged with the UI layer: `{questionId, value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    #[serde(default)]
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// The answer set of one respondent, keyed by question id.
///
/// Holds at most one answer per question; inserting again replaces the
/// previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Answer>", into = "Vec<Answer>")]
pub struct Answers {
    values: HashMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create a new empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert or replace the answer for a question, returning the old value.
    pub fn insert(
        &mut self,
        question: impl Into<QuestionId>,
        value: impl Into<AnswerValue>,
    ) -> Option<AnswerValue> {
        self.values.insert(question.into(), value.into())
    }

    /// Get the answer for a question.
    pub fn get(&self, question: &str) -> Option<&AnswerValue> {
        self.values.get(question)
    }

    /// Check if an answer (possibly empty) is stored for a question.
    pub fn contains(&self, question: &str) -> bool {
        self.values.contains_key(question)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, question: &str) -> Option<AnswerValue> {
        self.values.remove(question)
    }

    /// Keep only the answers for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&QuestionId, &AnswerValue) -> bool) {
        self.values.retain(|id, value| keep(id, value));
    }

    /// Check if a question has an answer of the right shape for its type.
    pub fn is_answered(&self, question: &QuestionNode) -> bool {
        self.get(question.id().as_str())
            .is_some_and(|value| question.accepts(value))
    }

    /// Check that every listed question is answered.
    pub fn all_answered<'a>(&self, questions: impl IntoIterator<Item = &'a QuestionNode>) -> bool {
        questions.into_iter().all(|question| self.is_answered(question))
    }

    /// Get an iterator over all question-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of stored answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another answer set into this one. Answers in `other` win.
    pub fn extend(&mut self, other: Answers) {
        self.values.extend(other.values);
    }

    /// The answers as a list, ordered by question id.
    pub fn to_list(&self) -> Vec<Answer> {
        let mut list: Vec<Answer> = self
            .values
            .iter()
            .map(|(id, value)| Answer::new(id, value.clone()))
            .collect();
        list.sort_by(|a, b| a.question_id.cmp(&b.question_id));
        list
    }

    // === Convenience accessors ===

    /// Get a text answer.
    pub fn get_text(&self, question: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(question.as_str()) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingAnswer(question.clone())),
        }
    }

    /// Get a numeric answer.
    pub fn get_number(&self, question: &QuestionId) -> Result<f64, AnswerError> {
        match self.get(question.as_str()) {
            Some(AnswerValue::Number(n)) => Ok(*n),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "Number",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingAnswer(question.clone())),
        }
    }

    /// Get a multi-select answer.
    pub fn get_list(&self, question: &QuestionId) -> Result<&[String], AnswerError> {
        match self.get(question.as_str()) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "List",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingAnswer(question.clone())),
        }
    }
}

impl From<Vec<Answer>> for Answers {
    fn from(list: Vec<Answer>) -> Self {
        list.into_iter().collect()
    }
}

impl From<Answers> for Vec<Answer> {
    fn from(answers: Answers) -> Self {
        answers.to_list()
    }
}

impl FromIterator<Answer> for Answers {
    /// Later answers for the same question replace earlier ones.
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for answer in iter {
            answers.insert(answer.question_id, answer.value);
        }
        answers
    }
}

impl IntoIterator for Answers {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType;

    #[test]
    fn insert_replaces_previous_answer() {
        let mut answers = Answers::new();
        answers.insert("q1", "yes");
        let old = answers.insert("q1", "no");

        assert_eq!(old, Some(AnswerValue::from("yes")));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get_text(&QuestionId::new("q1")).unwrap(), "no");
    }

    #[test]
    fn answered_means_non_empty_and_right_shape() {
        let multi = QuestionNode::new("q1", "Pick", QuestionType::MultipleChoice);
        let text = QuestionNode::new("q2", "Say", QuestionType::Text);
        let mut answers = Answers::new();

        answers.insert("q1", AnswerValue::List(vec![]));
        answers.insert("q2", "");
        assert!(answers.contains("q1"));
        assert!(!answers.is_answered(&multi));
        assert!(answers.is_answered(&text));

        answers.insert("q1", "o1");
        assert!(!answers.is_answered(&multi));
        assert!(!answers.all_answered([&multi, &text]));

        answers.insert("q1", vec!["o1"]);
        assert!(answers.all_answered([&multi, &text]));

        answers.insert("q2", AnswerValue::Null);
        assert!(!answers.is_answered(&text));
    }

    #[test]
    fn from_list_keeps_last_answer_per_question() {
        let answers = Answers::from(vec![
            Answer::new("q1", "a"),
            Answer::new("q2", 3),
            Answer::new("q1", "b"),
        ]);

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("q1"), Some(&AnswerValue::from("b")));
    }

    #[test]
    fn deserializes_answer_list() {
        let json = r#"[{"questionId": "q1", "value": ["o1", "o2"]}, {"questionId": "q2", "value": 5}]"#;
        let answers: Answers = serde_json::from_str(json).unwrap();

        assert_eq!(
            answers.get_list(&QuestionId::new("q1")).unwrap(),
            ["o1".to_string(), "o2".to_string()]
        );
        assert_eq!(answers.get_number(&QuestionId::new("q2")).unwrap(), 5.0);
    }

    #[test]
    fn type_mismatch_error() {
        let mut answers = Answers::new();
        answers.insert("q1", 4);

        let result = answers.get_text(&QuestionId::new("q1"));
        assert!(matches!(result, Err(AnswerError::TypeMismatch { .. })));
    }
}
