//! Authoring checks for survey trees.
//!
//! The flow engine tolerates overlapping branch conditions (first declared
//! wins) and loops (the path stops). Both usually mean the survey was
//! authored by mistake, so they are reported here for editors to fix.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use survey_flow_types::{ConditionType, QuestionId, QuestionNode, QuestionType, Route, SurveyTree};

/// A problem found in a survey's branching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    /// Two combinational routes of one question can match the same answer.
    AmbiguousRoutes {
        question: QuestionId,
        first: QuestionId,
        second: QuestionId,
    },

    /// Following routes from this question can lead back to it.
    Cycle { question: QuestionId },
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousRoutes {
                question,
                first,
                second,
            } => write!(
                f,
                "question {question}: routes to {first} and {second} can match the same answer"
            ),
            Self::Cycle { question } => write!(f, "question {question} can be reached from itself"),
        }
    }
}

/// Check a tree for ambiguous routes and cycles.
///
/// Warnings come out grouped by kind and sorted by question id.
pub fn lint(tree: &SurveyTree) -> Vec<LintWarning> {
    let mut questions: Vec<&QuestionNode> = tree.questions().collect();
    questions.sort_by(|a, b| a.id().cmp(b.id()));

    let mut warnings = Vec::new();
    for question in &questions {
        warnings.extend(ambiguous_routes(question));
    }
    for question in &questions {
        if reaches_itself(tree, question) {
            warnings.push(LintWarning::Cycle {
                question: question.id().clone(),
            });
        }
    }
    warnings
}

fn ambiguous_routes(question: &QuestionNode) -> Vec<LintWarning> {
    let single_key = !matches!(question.question_type(), QuestionType::MultipleChoice);
    let conditions: Vec<(ConditionType, &BTreeSet<String>, &QuestionId)> = question
        .routes()
        .iter()
        .filter_map(|route| match route {
            Route::Combinational {
                condition,
                option_ids,
                target,
            } => Some((*condition, option_ids, target)),
            Route::Simple { .. } => None,
        })
        // An AND over several options never holds for a one-key answer.
        .filter(|(condition, ids, _)| !(single_key && *condition == ConditionType::And && ids.len() > 1))
        .collect();

    let mut warnings = Vec::new();
    for (i, (c1, ids1, first)) in conditions.iter().enumerate() {
        for (c2, ids2, second) in &conditions[i + 1..] {
            if first != second && overlaps(*c1, ids1, *c2, ids2) {
                warnings.push(LintWarning::AmbiguousRoutes {
                    question: question.id().clone(),
                    first: (*first).clone(),
                    second: (*second).clone(),
                });
            }
        }
    }
    warnings
}

/// Whether some selection satisfies both conditions.
fn overlaps(c1: ConditionType, a: &BTreeSet<String>, c2: ConditionType, b: &BTreeSet<String>) -> bool {
    match (c1, c2) {
        (ConditionType::And, ConditionType::And) => a == b,
        _ => !a.is_disjoint(b),
    }
}

fn reaches_itself(tree: &SurveyTree, start: &QuestionNode) -> bool {
    let mut visited: HashSet<&QuestionId> = HashSet::new();
    let mut stack: Vec<&QuestionId> = start.targets().collect();
    while let Some(id) = stack.pop() {
        if id == start.id() {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(next) = tree.get(id.as_str()) {
            stack.extend(next.targets());
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_flow_types::{BranchGrouping, SurveyOption};

    fn grouped(id: &str, condition: ConditionType, ids: &[&str], next: Option<&str>) -> SurveyOption {
        let option = SurveyOption::new(id, id).with_grouping(BranchGrouping::new(condition, ids.iter().copied()));
        match next {
            Some(next) => option.with_next(next),
            None => option,
        }
    }

    #[test]
    fn overlapping_or_groups_are_ambiguous() {
        let tree = SurveyTree::new(
            vec![
                QuestionNode::new("q", "Q", QuestionType::MultipleChoice).with_options(vec![
                    grouped("1", ConditionType::Or, &["1", "2"], Some("x")),
                    grouped("2", ConditionType::Or, &["2", "3"], Some("y")),
                    SurveyOption::new("3", "3"),
                ]),
                QuestionNode::new("x", "X", QuestionType::Text),
                QuestionNode::new("y", "Y", QuestionType::Text),
            ],
            vec!["q".into()],
        );
        assert_eq!(
            lint(&tree),
            vec![LintWarning::AmbiguousRoutes {
                question: "q".into(),
                first: "x".into(),
                second: "y".into(),
            }]
        );
    }

    #[test]
    fn distinct_and_groups_are_fine() {
        let tree = SurveyTree::new(
            vec![
                QuestionNode::new("q", "Q", QuestionType::MultipleChoice).with_options(vec![
                    grouped("1", ConditionType::And, &["1", "2"], Some("x")),
                    grouped("2", ConditionType::And, &["1", "2"], None),
                    grouped("3", ConditionType::And, &["1", "3"], Some("y")),
                ]),
                QuestionNode::new("x", "X", QuestionType::Text),
                QuestionNode::new("y", "Y", QuestionType::Text),
            ],
            vec!["q".into()],
        );
        assert!(lint(&tree).is_empty());
    }

    #[test]
    fn cycles_are_reported_per_question() {
        let tree = SurveyTree::new(
            vec![
                QuestionNode::new("a", "A", QuestionType::SingleChoice)
                    .with_options(vec![SurveyOption::new("1", "1").with_next("b")]),
                QuestionNode::new("b", "B", QuestionType::SingleChoice)
                    .with_options(vec![SurveyOption::new("1", "1").with_next("a")]),
                QuestionNode::new("c", "C", QuestionType::Text),
            ],
            vec!["a".into(), "c".into()],
        );
        assert_eq!(
            lint(&tree),
            vec![
                LintWarning::Cycle { question: "a".into() },
                LintWarning::Cycle { question: "b".into() },
            ]
        );
    }
}
