//! Path computation over a [`SurveyTree`].
//!
//! A path starts at a root question and follows, one answer at a time, the
//! route each answer selects. It ends at the first unanswered question, or
//! at an answered question whose answer selects no route.

use survey_flow_types::{AnswerValue, Answers, QuestionId, QuestionNode, Route, SurveyTree};

use crate::Selection;

/// The route an answer takes out of `question`, if any.
///
/// Combinational routes are tried before simple ones. When several
/// combinational routes match, the first declared wins.
pub fn matching_route<'q>(question: &'q QuestionNode, selection: &Selection) -> Option<&'q Route> {
    if selection.is_empty() {
        return None;
    }
    let mut combinational = question
        .routes()
        .iter()
        .filter(|route| route.is_combinational() && selection.satisfies(route));
    if let Some(first) = combinational.next() {
        let others = combinational.count();
        if others > 0 {
            tracing::warn!(
                question = %question.id(),
                target = %first.target(),
                others,
                "several branch conditions match, following the first"
            );
        }
        return Some(first);
    }
    question
        .routes()
        .iter()
        .find(|route| !route.is_combinational() && selection.satisfies(route))
}

/// The question that follows `question` when it is answered with `value`.
///
/// Returns `None` when the answer selects no route. Empty values and
/// values of the wrong shape for the question never lead anywhere.
pub fn next_question<'t>(
    tree: &'t SurveyTree,
    question: &QuestionNode,
    value: &AnswerValue,
) -> Option<&'t QuestionNode> {
    if !question.accepts(value) {
        return None;
    }
    let selection = Selection::from_answer(question, value);
    let route = matching_route(question, &selection)?;
    let next = tree.get(route.target().as_str());
    if next.is_none() {
        tracing::warn!(question = %question.id(), target = %route.target(), "route leads to an unknown question");
    }
    next
}

/// Compute the path from `root` given the current answers.
///
/// The path always contains the root. A route leading back to a question
/// already on the path ends the path there.
pub fn build_path<'t>(tree: &'t SurveyTree, root: &'t QuestionNode, answers: &Answers) -> Vec<&'t QuestionNode> {
    let mut path = vec![root];
    let mut current = root;
    while let Some(value) = answers.get(current.id().as_str()) {
        let Some(next) = next_question(tree, current, value) else {
            break;
        };
        if path.iter().any(|seen| seen.id() == next.id()) {
            tracing::warn!(
                question = %current.id(),
                target = %next.id(),
                "branch loops back onto the path, stopping here"
            );
            break;
        }
        tracing::trace!(from = %current.id(), to = %next.id(), "following branch");
        path.push(next);
        current = next;
    }
    tracing::debug!(root = %root.id(), length = path.len(), "computed path");
    path
}

/// Compute the path of every root, in root order.
pub fn build_paths<'t>(tree: &'t SurveyTree, answers: &Answers) -> Vec<Vec<&'t QuestionNode>> {
    tree.roots().map(|root| build_path(tree, root, answers)).collect()
}

/// Truncate a path after an edit at `edited_index`.
///
/// Keeps positions `0..=edited_index`; an index past the end keeps the whole
/// path.
pub fn reset_path<T: Clone>(path: &[T], edited_index: usize) -> Vec<T> {
    path.iter().take(edited_index.saturating_add(1)).cloned().collect()
}

/// Whether a computed path is complete.
///
/// True when the last question on the path is answered and its answer
/// leads nowhere new: no route matches, or the route loops back onto the
/// path.
pub fn is_root_exhausted(tree: &SurveyTree, path: &[&QuestionNode], answers: &Answers) -> bool {
    let Some(last) = path.last() else {
        return false;
    };
    let Some(value) = answers.get(last.id().as_str()).filter(|v| last.accepts(v)) else {
        return false;
    };
    next_question(tree, last, value).is_none_or(|next| path.iter().any(|seen| seen.id() == next.id()))
}

/// Ids of the questions on a path.
pub fn path_ids(path: &[&QuestionNode]) -> Vec<QuestionId> {
    path.iter().map(|question| question.id().clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_flow_types::{QuestionType, SurveyOption};

    fn tree() -> SurveyTree {
        SurveyTree::new(
            vec![
                QuestionNode::new("a", "A", QuestionType::SingleChoice).with_options(vec![
                    SurveyOption::new("yes", "Yes").with_next("b"),
                    SurveyOption::new("no", "No"),
                ]),
                QuestionNode::new("b", "B", QuestionType::SingleChoice)
                    .with_options(vec![SurveyOption::new("again", "Again").with_next("a")]),
            ],
            vec!["a".into()],
        )
    }

    fn answers(pairs: &[(&str, &str)]) -> Answers {
        pairs
            .iter()
            .map(|(q, v)| survey_flow_types::Answer::new(*q, *v))
            .collect()
    }

    #[test]
    fn unanswered_root_is_its_own_path() {
        let tree = tree();
        let root = tree.root(0).unwrap();
        let path = build_path(&tree, root, &Answers::new());
        assert_eq!(path_ids(&path), vec![QuestionId::new("a")]);
        assert!(!is_root_exhausted(&tree, &path, &Answers::new()));
    }

    #[test]
    fn answer_without_route_exhausts_root() {
        let tree = tree();
        let answers = answers(&[("a", "no")]);
        let path = build_path(&tree, tree.root(0).unwrap(), &answers);
        assert_eq!(path.len(), 1);
        assert!(is_root_exhausted(&tree, &path, &answers));
    }

    #[test]
    fn loop_stops_path_and_counts_as_exhausted() {
        let tree = tree();
        let answers = answers(&[("a", "yes"), ("b", "again")]);
        let path = build_path(&tree, tree.root(0).unwrap(), &answers);
        assert_eq!(path_ids(&path), vec![QuestionId::new("a"), QuestionId::new("b")]);
        assert!(is_root_exhausted(&tree, &path, &answers));
    }

    #[test]
    fn empty_answer_does_not_advance() {
        let tree = tree();
        let mut answers = Answers::new();
        answers.insert("a", AnswerValue::Null);
        let path = build_path(&tree, tree.root(0).unwrap(), &answers);
        assert_eq!(path.len(), 1);
        assert!(!is_root_exhausted(&tree, &path, &answers));
    }

    #[test]
    fn wrong_shape_answer_does_not_advance() {
        let tree = tree();
        let answers: Answers = [survey_flow_types::Answer::new("a", vec!["yes"])].into_iter().collect();
        let path = build_path(&tree, tree.root(0).unwrap(), &answers);
        assert_eq!(path.len(), 1);
        assert!(!is_root_exhausted(&tree, &path, &answers));
    }

    #[test]
    fn reset_path_truncates_after_index() {
        let path = vec![1, 2, 3, 4];
        assert_eq!(reset_path(&path, 0), vec![1]);
        assert_eq!(reset_path(&path, 2), vec![1, 2, 3]);
        assert_eq!(reset_path(&path, 9), path);
        assert_eq!(reset_path(&path, usize::MAX), path);
        assert!(reset_path::<i32>(&[], 0).is_empty());
    }
}
