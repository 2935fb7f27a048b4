use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId, Route, route};

/// The kind of question, determining answer shape and branching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick exactly one option.
    SingleChoice,

    /// Pick any number of options.
    MultipleChoice,

    /// A numeric scale, either modelled by options or by min/max bounds.
    Rating,

    /// Free text. Never branches.
    #[default]
    Text,
}

impl QuestionType {
    /// Map a backend type code to a question type.
    ///
    /// Accepts the API codes (`SingleChoice`, `MultiChoice`, `Scale`, `Text`)
    /// as well as the snake_case names. Anything else is treated as Text.
    pub fn from_code(code: &str) -> Self {
        match code {
            "SingleChoice" | "single_choice" => Self::SingleChoice,
            "MultiChoice" | "MultipleChoice" | "multiple_choice" => Self::MultipleChoice,
            "Scale" | "Rating" | "rating" => Self::Rating,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::Rating => "rating",
            Self::Text => "text",
        }
    }

    /// Whether answers of this type select from a set of keys and can branch.
    pub fn is_branching(&self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Whether `value` answers a question of this type.
    ///
    /// Multiple-choice questions take a non-empty list, every other type a
    /// scalar. Empty values answer nothing.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match value {
            AnswerValue::Null => false,
            AnswerValue::List(items) => *self == Self::MultipleChoice && !items.is_empty(),
            AnswerValue::Text(_) | AnswerValue::Number(_) => *self != Self::MultipleChoice,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combinator of a combinational branch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    /// The selection must be exactly the listed options.
    And,

    /// Any one of the listed options suffices.
    Or,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl FromStr for ConditionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(format!("unknown condition type '{other}'")),
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership of an option in a combinational branch group.
///
/// Present whenever the payload tagged the option with a condition or a
/// list of branch option ids, even if the tag is incomplete. A grouped
/// option never branches on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchGrouping {
    /// `None` when the tag was missing or unrecognized; such a group never matches.
    pub condition: Option<ConditionType>,

    /// The options that make up the condition.
    pub option_ids: Vec<String>,
}

impl BranchGrouping {
    pub fn new(condition: ConditionType, option_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            condition: Some(condition),
            option_ids: option_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A selectable choice belonging to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyOption {
    pub id: String,

    /// Display text.
    pub content: String,

    /// Answer-matching key. Defaults to the id.
    pub value: String,

    /// Follow-up question for simple branching, or the target of this
    /// option's branch group.
    pub next_question: Option<QuestionId>,

    /// Combinational group membership.
    pub grouping: Option<BranchGrouping>,
}

impl SurveyOption {
    /// Create an option whose value is its id.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            value: id.clone(),
            id,
            content: content.into(),
            next_question: None,
            grouping: None,
        }
    }

    /// Set the answer-matching value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Link this option to a follow-up question.
    pub fn with_next(mut self, next: impl Into<QuestionId>) -> Self {
        self.next_question = Some(next.into());
        self
    }

    /// Make this option a member of a combinational branch group.
    pub fn with_grouping(mut self, grouping: BranchGrouping) -> Self {
        self.grouping = Some(grouping);
        self
    }

    /// Whether this option belongs to a combinational branch group.
    pub fn is_grouped(&self) -> bool {
        self.grouping.is_some()
    }

    /// Whether this option matches the raw answer scalar `raw`.
    pub fn matches(&self, raw: &str) -> bool {
        self.id == raw || self.value == raw
    }
}

/// An explicit combinational branching rule, decoupled from any single option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub current_question_id: QuestionId,
    pub next_question_id: QuestionId,
    pub condition_type: ConditionType,
    pub option_ids: Vec<String>,
}

/// One survey question: a node of the survey tree.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionNode {
    id: QuestionId,
    text: String,
    question_type: QuestionType,
    required: bool,
    order: Option<i64>,
    options: Vec<SurveyOption>,
    min_rating: Option<i64>,
    max_rating: Option<i64>,
    branches: Vec<Branch>,

    /// Ordered branch decisions, derived from `options` and `branches`.
    routes: Vec<Route>,
}

impl QuestionNode {
    /// Create a new question with no options.
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            question_type,
            required: false,
            order: None,
            options: Vec::new(),
            min_rating: None,
            max_rating: None,
            branches: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Mark the question as required (or not).
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the authoring order among sibling roots.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the options. Rebuilds the routes.
    pub fn with_options(mut self, options: Vec<SurveyOption>) -> Self {
        self.options = options;
        self.routes = route::build_routes(&self.options, &self.branches);
        self
    }

    /// Set the explicit branch records. Rebuilds the routes.
    pub fn with_branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = branches;
        self.routes = route::build_routes(&self.options, &self.branches);
        self
    }

    /// Set the rating scale bounds.
    pub fn with_rating_bounds(mut self, min: i64, max: i64) -> Self {
        self.min_rating = Some(min);
        self.max_rating = Some(max);
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn order(&self) -> Option<i64> {
        self.order
    }

    pub fn options(&self) -> &[SurveyOption] {
        &self.options
    }

    pub fn min_rating(&self) -> Option<i64> {
        self.min_rating
    }

    pub fn max_rating(&self) -> Option<i64> {
        self.max_rating
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// The branch decisions of this question, in evaluation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the option matching a raw answer scalar (by id first, then by value).
    pub fn find_option(&self, raw: &str) -> Option<&SurveyOption> {
        self.options
            .iter()
            .find(|option| option.id == raw)
            .or_else(|| self.options.iter().find(|option| option.value == raw))
    }

    /// Normalize a raw answer scalar or branch option reference to an option id.
    ///
    /// Scalars that match no option (e.g. ratings without modelled options)
    /// are returned unchanged.
    pub fn option_key(&self, raw: &str) -> String {
        route::option_key(&self.options, raw)
    }

    /// Whether `value` has the right shape to answer this question.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        self.question_type.accepts(value)
    }

    /// Ids of all questions this question can branch to, in route order.
    pub fn targets(&self) -> impl Iterator<Item = &QuestionId> {
        self.routes.iter().map(Route::target)
    }

    /// Drop routes whose target is rejected by `keep`.
    ///
    /// Used by tree construction to discard links to questions that do not exist.
    pub fn retain_routes(&mut self, mut keep: impl FnMut(&QuestionId) -> bool) {
        self.routes.retain(|route| keep(route.target()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes() {
        assert_eq!(QuestionType::from_code("SingleChoice"), QuestionType::SingleChoice);
        assert_eq!(QuestionType::from_code("MultiChoice"), QuestionType::MultipleChoice);
        assert_eq!(QuestionType::from_code("Scale"), QuestionType::Rating);
        assert_eq!(QuestionType::from_code("Text"), QuestionType::Text);
        assert_eq!(QuestionType::from_code("Matrix"), QuestionType::Text);
        assert_eq!(QuestionType::from_code(""), QuestionType::Text);
    }

    #[test]
    fn answer_shapes_per_type() {
        let multi = QuestionType::MultipleChoice;
        assert!(multi.accepts(&vec!["1"].into()));
        assert!(!multi.accepts(&"1".into()));
        assert!(!multi.accepts(&AnswerValue::List(Vec::new())));

        for scalar in [QuestionType::SingleChoice, QuestionType::Rating, QuestionType::Text] {
            assert!(scalar.accepts(&"".into()), "{scalar}");
            assert!(scalar.accepts(&AnswerValue::Number(3.0)), "{scalar}");
            assert!(!scalar.accepts(&vec!["1"].into()), "{scalar}");
            assert!(!scalar.accepts(&AnswerValue::Null), "{scalar}");
        }
    }

    #[test]
    fn condition_type_parsing_is_case_insensitive() {
        assert_eq!("and".parse::<ConditionType>(), Ok(ConditionType::And));
        assert_eq!(" OR ".parse::<ConditionType>(), Ok(ConditionType::Or));
        assert!("XOR".parse::<ConditionType>().is_err());
    }

    #[test]
    fn option_value_defaults_to_id() {
        let option = SurveyOption::new("o1", "Yes");
        assert_eq!(option.value, "o1");
    }

    #[test]
    fn find_option_prefers_id_over_value() {
        let node = QuestionNode::new("q1", "Pick", QuestionType::SingleChoice).with_options(vec![
            SurveyOption::new("1", "First").with_value("2"),
            SurveyOption::new("2", "Second").with_value("x"),
        ]);

        assert_eq!(node.find_option("2").map(|o| o.id.as_str()), Some("2"));
        assert_eq!(node.find_option("x").map(|o| o.id.as_str()), Some("2"));
        assert!(node.find_option("nope").is_none());
        assert_eq!(node.option_key("nope"), "nope");
    }
}
