//! Turning raw survey payloads into a [`SurveyTree`].

use std::collections::HashSet;

use serde_json::Value;
use survey_flow_types::{
    Branch, BranchGrouping, ConditionType, QuestionId, QuestionNode, QuestionType, SurveyMeta,
    SurveyOption, SurveyStatus, SurveyTree,
};

use crate::payload::{RawObject, keys};

/// Error type for strict payload parsing.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Survey payload is empty")]
    Empty,

    #[error("Survey payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Survey payload must be an object or a list of questions, got {0}")]
    UnexpectedShape(&'static str),
}

/// Knobs for payload normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Deepest `nextQuestion` nesting that is followed. Anything below is
    /// dropped with a warning, and the option that pointed there stops
    /// branching.
    pub max_depth: usize,
}

impl NormalizeOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse a JSON payload, falling back to an empty survey on any failure.
///
/// Failures are logged; callers see a survey without questions.
pub fn parse_survey(text: &str) -> SurveyTree {
    match try_parse_survey(text, &NormalizeOptions::default()) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %err, "could not read survey payload, using an empty survey");
            SurveyTree::empty()
        }
    }
}

/// Parse a JSON payload, reporting why it could not be read.
pub fn try_parse_survey(text: &str, options: &NormalizeOptions) -> Result<SurveyTree, NormalizeError> {
    if text.trim().is_empty() {
        return Err(NormalizeError::Empty);
    }
    let payload: Value = serde_json::from_str(text)?;
    try_normalize_survey(&payload, options)
}

/// Normalize an already-decoded payload, falling back to an empty survey.
pub fn normalize_survey(payload: &Value, options: &NormalizeOptions) -> SurveyTree {
    match try_normalize_survey(payload, options) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %err, "could not normalize survey payload, using an empty survey");
            SurveyTree::empty()
        }
    }
}

/// Normalize an already-decoded payload.
///
/// Three shapes are understood:
/// * an object with `rootQuestions`: every listed question is a root,
///   follow-ups are nested under their options;
/// * an object with `questions`: a flat list where follow-ups are linked
///   by `nextQuestionId` and roots are discovered;
/// * a bare array, read like a flat `questions` list.
///
/// Survey metadata is read from a nested `survey` object, or from the top
/// level when there is none.
pub fn try_normalize_survey(payload: &Value, options: &NormalizeOptions) -> Result<SurveyTree, NormalizeError> {
    if let Value::Array(items) = payload {
        return Ok(flat_tree(items, options));
    }
    let Some(detail) = RawObject::new(payload) else {
        return Err(NormalizeError::UnexpectedShape(value_kind(payload)));
    };
    let survey = detail.nested(keys::SURVEY);
    let meta = read_meta(survey.unwrap_or(detail));

    let tree = if let Some(roots) = detail.array(keys::ROOT_QUESTIONS) {
        let collected = collect_questions(roots, options);
        SurveyTree::new(collected.nodes, collected.listed)
    } else if let Some(questions) = detail
        .array(keys::QUESTIONS)
        .or_else(|| survey.and_then(|s| s.array(keys::QUESTIONS)))
    {
        flat_tree(questions, options)
    } else {
        tracing::debug!("survey payload carries no questions");
        SurveyTree::empty()
    };

    tracing::debug!(
        roots = tree.root_count(),
        questions = tree.question_count(),
        "normalized survey payload"
    );
    Ok(tree.with_meta(meta))
}

/// Root ids of a flat question list.
///
/// A question is a root unless some option or branch record of any
/// question in the list points at it. Roots keep the list order here;
/// [`SurveyTree::new`] sorts them by `order` afterwards.
pub fn discover_roots(questions: &[QuestionNode]) -> Vec<QuestionId> {
    let referenced = referenced_ids(questions);
    questions
        .iter()
        .map(QuestionNode::id)
        .filter(|id| !referenced.contains(*id))
        .cloned()
        .collect()
}

fn referenced_ids(questions: &[QuestionNode]) -> HashSet<&QuestionId> {
    questions
        .iter()
        .flat_map(|q| {
            q.options()
                .iter()
                .filter_map(|o| o.next_question.as_ref())
                .chain(q.branches().iter().map(|b| &b.next_question_id))
        })
        .collect()
}

fn flat_tree(items: &[Value], options: &NormalizeOptions) -> SurveyTree {
    let collected = collect_questions(items, options);
    let listed: HashSet<&QuestionId> = collected.listed.iter().collect();
    let roots = discover_roots(&collected.nodes)
        .into_iter()
        .filter(|id| listed.contains(id))
        .collect();
    SurveyTree::new(collected.nodes, roots)
}

struct Collected {
    nodes: Vec<QuestionNode>,
    /// Ids of the questions listed at the top level, in payload order.
    listed: Vec<QuestionId>,
}

/// Walk a question list and everything nested below it.
///
/// Uses an explicit work stack, so payload depth never turns into call
/// depth. A question id seen before is not read again.
fn collect_questions(items: &[Value], options: &NormalizeOptions) -> Collected {
    let listed = items
        .iter()
        .filter_map(RawObject::new)
        .filter_map(|q| q.scalar(keys::ID))
        .map(QuestionId::new)
        .collect();

    let mut nodes = Vec::new();
    let mut seen: HashSet<QuestionId> = HashSet::new();
    let mut stack: Vec<(&Value, usize)> = items.iter().rev().map(|item| (item, 0)).collect();

    while let Some((item, depth)) = stack.pop() {
        let Some(raw) = RawObject::new(item) else {
            tracing::warn!(kind = value_kind(item), "skipping question that is not an object");
            continue;
        };
        let Some(id) = raw.scalar(keys::ID).map(QuestionId::new) else {
            tracing::warn!("skipping question without an id");
            continue;
        };
        if !seen.insert(id.clone()) {
            tracing::debug!(question = %id, "question already read, keeping the first copy");
            continue;
        }

        let mut survey_options = Vec::new();
        for raw_option in raw.array(keys::OPTIONS).unwrap_or_default() {
            let Some(option) = RawObject::new(raw_option) else {
                continue;
            };
            let Some((survey_option, nested)) = read_option(&id, option, depth, options) else {
                continue;
            };
            if let Some(nested) = nested {
                stack.push((nested, depth + 1));
            }
            survey_options.push(survey_option);
        }

        let branches = raw
            .array(keys::BRANCHES)
            .unwrap_or_default()
            .iter()
            .filter_map(RawObject::new)
            .filter_map(|branch| read_branch(&id, branch))
            .collect();

        let mut node = QuestionNode::new(
            id,
            raw.text(keys::CONTENT).unwrap_or_default(),
            read_question_type(raw),
        )
        .with_required(raw.flag(keys::REQUIRED))
        .with_options(survey_options)
        .with_branches(branches);
        if let Some(order) = raw.int(keys::ORDER) {
            node = node.with_order(order);
        }
        if let (Some(min), Some(max)) = (raw.int(keys::MIN_RATING), raw.int(keys::MAX_RATING)) {
            node = node.with_rating_bounds(min, max);
        }
        nodes.push(node);
    }

    Collected { nodes, listed }
}

/// Read one option. Returns the nested follow-up question, if any, so the
/// caller can queue it.
fn read_option<'a>(
    question: &QuestionId,
    raw: RawObject<'a>,
    depth: usize,
    options: &NormalizeOptions,
) -> Option<(SurveyOption, Option<&'a Value>)> {
    let Some(id) = raw.scalar(keys::ID) else {
        tracing::warn!(%question, "skipping option without an id");
        return None;
    };
    let value = raw.scalar(keys::VALUE).unwrap_or_else(|| id.clone());
    let content = raw.text(keys::CONTENT).unwrap_or_default();
    let mut option = SurveyOption::new(id, content).with_value(value);

    let mut nested = None;
    if let Some(child) = raw.object(keys::NEXT_QUESTION) {
        let child_id = RawObject::new(child).and_then(|c| c.scalar(keys::ID));
        match child_id {
            Some(_) if depth + 1 > options.max_depth => {
                tracing::warn!(
                    %question,
                    option = %option.id,
                    max_depth = options.max_depth,
                    "follow-up question nested too deeply, dropping it"
                );
            }
            Some(child_id) => {
                option = option.with_next(child_id);
                nested = Some(child);
            }
            None => {
                tracing::warn!(%question, option = %option.id, "follow-up question without an id");
            }
        }
    } else if let Some(next) = raw.scalar(keys::NEXT_QUESTION_ID) {
        option = option.with_next(next);
    }

    let condition = raw.scalar(keys::CONDITION_TYPE);
    let group_ids = raw.scalar_list(keys::BRANCH_OPTION_IDS);
    if condition.is_some() || group_ids.is_some() {
        let condition = condition.and_then(|c| match c.parse::<ConditionType>() {
            Ok(condition) => Some(condition),
            Err(err) => {
                tracing::warn!(%question, option = %option.id, "{err}");
                None
            }
        });
        option = option.with_grouping(BranchGrouping {
            condition,
            option_ids: group_ids.unwrap_or_default(),
        });
    }

    Some((option, nested))
}

fn read_branch(question: &QuestionId, raw: RawObject<'_>) -> Option<Branch> {
    let next = raw.scalar(keys::NEXT_QUESTION_ID);
    let condition = raw.scalar(keys::CONDITION_TYPE).map(|c| c.parse::<ConditionType>());
    let (Some(next), Some(Ok(condition_type))) = (next, condition) else {
        tracing::warn!(%question, "skipping branch without a target or a valid condition");
        return None;
    };
    let current = raw
        .scalar(keys::CURRENT_QUESTION_ID)
        .map(QuestionId::new)
        .unwrap_or_else(|| question.clone());
    if &current != question {
        tracing::debug!(%question, %current, "branch record names another question, attaching it here");
    }
    Some(Branch {
        id: raw.scalar(keys::ID).unwrap_or_default(),
        current_question_id: current,
        next_question_id: QuestionId::new(next),
        condition_type,
        option_ids: raw.scalar_list(keys::OPTION_IDS).unwrap_or_default(),
    })
}

fn read_question_type(raw: RawObject<'_>) -> QuestionType {
    let code = match raw.field(keys::QUESTION_TYPE) {
        Some(Value::Object(_)) => raw
            .nested(keys::QUESTION_TYPE)
            .and_then(|t| t.scalar(keys::TYPE_CODE)),
        Some(Value::String(s)) => Some(s.clone()),
        _ => raw.scalar(keys::TYPE_NAME),
    };
    code.map(|c| QuestionType::from_code(&c)).unwrap_or_default()
}

fn read_meta(raw: RawObject<'_>) -> SurveyMeta {
    SurveyMeta {
        id: raw.scalar(keys::ID),
        title: raw.text(keys::TITLE),
        description: raw.text(keys::DESCRIPTION),
        status: raw.int(keys::STATUS).and_then(SurveyStatus::from_code),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use survey_flow_types::Route;

    fn normalize(payload: Value) -> SurveyTree {
        normalize_survey(&payload, &NormalizeOptions::default())
    }

    #[test]
    fn nested_payload() {
        let tree = normalize(json!({
            "survey": { "id": 3, "title": "Ward survey", "status": 1 },
            "rootQuestions": [
                {
                    "id": 1,
                    "content": "Were you satisfied?",
                    "questionType": { "code": "SingleChoice" },
                    "isRequired": true,
                    "order": 1,
                    "options": [
                        { "id": 10, "content": "Yes" },
                        {
                            "id": 11,
                            "content": "No",
                            "nextQuestion": {
                                "id": 2,
                                "content": "What went wrong?",
                                "questionType": { "code": "Text" }
                            }
                        }
                    ]
                }
            ]
        }));

        assert_eq!(tree.root_ids(), &[QuestionId::new("1")]);
        assert_eq!(tree.question_count(), 2);
        assert_eq!(tree.meta().title.as_deref(), Some("Ward survey"));
        assert_eq!(tree.meta().status, Some(SurveyStatus::Active));

        let root = tree.get("1").unwrap();
        assert!(root.is_required());
        assert_eq!(root.question_type(), QuestionType::SingleChoice);
        assert_eq!(root.options()[0].value, "10");
        assert_eq!(root.options()[1].next_question, Some(QuestionId::new("2")));
        assert_eq!(tree.get("2").unwrap().question_type(), QuestionType::Text);
    }

    #[test]
    fn pascal_case_payload() {
        let tree = normalize(json!({
            "RootQuestions": [
                { "Id": "a", "Content": "First", "QuestionType": { "Code": "Scale" }, "IsRequired": true }
            ]
        }));
        let root = tree.root(0).unwrap();
        assert_eq!(root.id().as_str(), "a");
        assert_eq!(root.text(), "First");
        assert_eq!(root.question_type(), QuestionType::Rating);
        assert!(root.is_required());
    }

    #[test]
    fn unknown_question_type_reads_as_text() {
        let tree = normalize(json!({
            "rootQuestions": [{ "id": 1, "questionType": { "code": "Matrix" } }, { "id": 2 }]
        }));
        assert_eq!(tree.get("1").unwrap().question_type(), QuestionType::Text);
        assert_eq!(tree.get("2").unwrap().question_type(), QuestionType::Text);
    }

    #[test]
    fn flat_payload_discovers_roots() {
        let tree = normalize(json!({
            "questions": [
                {
                    "id": 1, "order": 2, "questionType": "SingleChoice",
                    "options": [{ "id": 10, "nextQuestionId": 3 }, { "id": 11 }]
                },
                {
                    "id": 2, "order": 1, "questionType": "MultiChoice",
                    "branches": [{ "id": 5, "nextQuestionId": 4, "conditionType": "and", "optionIds": [20, 21] }],
                    "options": [{ "id": 20 }, { "id": 21 }]
                },
                { "id": 3, "order": 3 },
                { "id": 4, "order": 4 }
            ]
        }));

        assert_eq!(tree.root_ids(), &[QuestionId::new("2"), QuestionId::new("1")]);
        let branch = &tree.get("2").unwrap().branches()[0];
        assert_eq!(branch.condition_type, ConditionType::And);
        assert_eq!(branch.current_question_id.as_str(), "2");
        assert_eq!(branch.option_ids, vec!["20", "21"]);
    }

    #[test]
    fn bare_array_reads_as_flat_list() {
        let tree = normalize(json!([
            { "id": 1, "options": [{ "id": 10, "nextQuestionId": 2 }] },
            { "id": 2 }
        ]));
        assert_eq!(tree.root_ids(), &[QuestionId::new("1")]);
        assert_eq!(tree.question_count(), 2);
    }

    #[test]
    fn option_grouping_is_read() {
        let tree = normalize(json!({
            "rootQuestions": [{
                "id": 1,
                "questionType": { "code": "MultiChoice" },
                "options": [
                    { "id": 1, "conditionType": "AND", "branchOptionIds": [1, 2], "nextQuestion": { "id": 9 } },
                    { "id": 2, "conditionType": "AND", "branchOptionIds": [2, 1] },
                    { "id": 3, "branchOptionIds": [] },
                    { "id": 4, "conditionType": "" }
                ]
            }]
        }));
        let root = tree.get("1").unwrap();
        assert!(root.options()[0].is_grouped());
        assert!(root.options()[2].is_grouped());
        assert!(!root.options()[3].is_grouped());
        assert_eq!(root.routes().len(), 1);
        assert!(matches!(
            &root.routes()[0],
            Route::Combinational { condition: ConditionType::And, target, .. } if target.as_str() == "9"
        ));
    }

    #[test]
    fn unrecognized_condition_keeps_option_grouped_but_inert() {
        let tree = normalize(json!({
            "rootQuestions": [{
                "id": 1,
                "questionType": { "code": "MultiChoice" },
                "options": [{ "id": 1, "conditionType": "XOR", "nextQuestion": { "id": 2 } }]
            }]
        }));
        let root = tree.get("1").unwrap();
        let grouping = root.options()[0].grouping.as_ref().unwrap();
        assert_eq!(grouping.condition, None);
        assert!(root.routes().is_empty());
    }

    #[test]
    fn depth_limit_cuts_nesting() {
        let mut payload = json!({ "id": "leaf" });
        for level in (0..5).rev() {
            payload = json!({
                "id": format!("q{level}"),
                "questionType": { "code": "SingleChoice" },
                "options": [{ "id": "go", "nextQuestion": payload }]
            });
        }
        let payload = json!({ "rootQuestions": [payload] });

        let full = normalize_survey(&payload, &NormalizeOptions::default());
        assert_eq!(full.question_count(), 6);

        let cut = normalize_survey(&payload, &NormalizeOptions::default().with_max_depth(2));
        assert_eq!(cut.question_count(), 3);
        assert!(cut.get("q2").unwrap().routes().is_empty());
        assert!(cut.get("q2").unwrap().options()[0].next_question.is_none());
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let mut payload = json!({ "id": "leaf" });
        for level in 0..100 {
            payload = json!({
                "id": level,
                "options": [{ "id": "go", "nextQuestion": payload }]
            });
        }
        let payload = json!({ "rootQuestions": [payload] });
        let tree = normalize_survey(&payload, &NormalizeOptions::default().with_max_depth(200));
        assert_eq!(tree.question_count(), 101);
    }

    #[test]
    fn repeated_ids_keep_first_copy() {
        let tree = normalize(json!({
            "rootQuestions": [
                { "id": 1, "content": "first" },
                { "id": 1, "content": "second" }
            ]
        }));
        assert_eq!(tree.root_count(), 1);
        assert_eq!(tree.get("1").unwrap().text(), "first");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let tree = normalize(json!({
            "rootQuestions": [
                "nonsense",
                { "content": "no id" },
                { "id": 1, "options": [null, { "content": "no id" }, { "id": 5 }] }
            ]
        }));
        assert_eq!(tree.root_count(), 1);
        assert_eq!(tree.get("1").unwrap().options().len(), 1);
    }

    #[test]
    fn missing_questions_yield_empty_tree() {
        assert!(normalize(json!({ "survey": { "id": 1 } })).is_empty());
        assert!(normalize(json!("text")).is_empty());
        assert!(parse_survey("").is_empty());
        assert!(parse_survey("{ not json").is_empty());
    }

    #[test]
    fn strict_parse_reports_errors() {
        let options = NormalizeOptions::default();
        assert!(matches!(try_parse_survey("  ", &options), Err(NormalizeError::Empty)));
        assert!(matches!(try_parse_survey("{", &options), Err(NormalizeError::Json(_))));
        assert!(matches!(
            try_parse_survey("42", &options),
            Err(NormalizeError::UnexpectedShape("a number"))
        ));
    }

    #[test]
    fn discover_roots_ignores_targets() {
        let questions = vec![
            QuestionNode::new("a", "A", QuestionType::SingleChoice)
                .with_options(vec![SurveyOption::new("x", "X").with_next("b")]),
            QuestionNode::new("b", "B", QuestionType::Text),
            QuestionNode::new("c", "C", QuestionType::Text),
        ];
        assert_eq!(discover_roots(&questions), vec![QuestionId::new("a"), QuestionId::new("c")]);
    }
}
