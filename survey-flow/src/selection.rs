use std::collections::BTreeSet;

use survey_flow_types::{AnswerValue, ConditionType, QuestionNode, Route};

/// The option keys an answer selects on one question.
///
/// Single-choice and rating answers select one key, multiple-choice
/// answers select each listed key. Raw answer scalars are normalized
/// through [`QuestionNode::option_key`], so an answer given by option value
/// and a route written with option ids compare equal. Text answers and
/// answers of the wrong shape select nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: BTreeSet<String>,
}

impl Selection {
    pub fn from_answer(question: &QuestionNode, value: &AnswerValue) -> Self {
        if !question.question_type().is_branching() || !question.accepts(value) {
            return Self::default();
        }
        let keys = match value.as_list() {
            Some(items) => items.iter().map(|raw| question.option_key(raw)).collect(),
            None => value
                .scalar()
                .map(|raw| question.option_key(&raw))
                .into_iter()
                .collect(),
        };
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Evaluate a combinational condition against this selection.
    ///
    /// `And` holds when the selection is exactly `option_ids`, compared as
    /// sets. `Or` holds when they share at least one key.
    pub fn meets(&self, condition: ConditionType, option_ids: &BTreeSet<String>) -> bool {
        match condition {
            ConditionType::And => self.keys == *option_ids,
            ConditionType::Or => !self.keys.is_disjoint(option_ids),
        }
    }

    /// Whether `route` fires for this selection.
    pub fn satisfies(&self, route: &Route) -> bool {
        match route {
            Route::Simple { option_id, .. } => self.contains(option_id),
            Route::Combinational {
                condition,
                option_ids,
                ..
            } => self.meets(*condition, option_ids),
        }
    }
}
