use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Branch, ConditionType, QuestionId, SurveyOption};

/// One branch decision of a question.
///
/// Both the per-option links of the payload and the combinational branch
/// groups (option-tagged or explicit `Branch` records) collapse into this
/// type. A question evaluates its routes in order; all combinational
/// routes come before all simple ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Route {
    /// Selecting `option_id` leads to `target`.
    Simple { option_id: String, target: QuestionId },

    /// A condition over a set of options leads to `target`.
    Combinational {
        condition: ConditionType,
        option_ids: BTreeSet<String>,
        target: QuestionId,
    },
}

impl Route {
    /// The question this route leads to.
    pub fn target(&self) -> &QuestionId {
        match self {
            Self::Simple { target, .. } | Self::Combinational { target, .. } => target,
        }
    }

    pub fn is_combinational(&self) -> bool {
        matches!(self, Self::Combinational { .. })
    }
}

pub(crate) fn option_key(options: &[SurveyOption], raw: &str) -> String {
    options
        .iter()
        .find(|option| option.id == raw)
        .or_else(|| options.iter().find(|option| option.value == raw))
        .map_or_else(|| raw.to_string(), |option| option.id.clone())
}

fn key_set(options: &[SurveyOption], ids: &[String]) -> BTreeSet<String> {
    ids.iter().map(|id| option_key(options, id)).collect()
}

/// Build the ordered routes of a question.
///
/// 1. Option-tagged groups, keyed by (option id set, condition), in order of
///    first appearance. The target is the first member carrying a next question;
///    groups without one produce no route.
/// 2. Explicit branch records not already covered by an option-tagged group.
/// 3. Simple links of ungrouped options, in option order.
pub(crate) fn build_routes(options: &[SurveyOption], branches: &[Branch]) -> Vec<Route> {
    let mut groups: Vec<(ConditionType, BTreeSet<String>, Option<QuestionId>)> = Vec::new();
    for option in options {
        let Some(grouping) = &option.grouping else {
            continue;
        };
        let Some(condition) = grouping.condition else {
            continue;
        };
        let ids = key_set(options, &grouping.option_ids);
        if ids.is_empty() {
            continue;
        }
        match groups
            .iter_mut()
            .find(|(c, group_ids, _)| *c == condition && *group_ids == ids)
        {
            Some((_, _, target)) => {
                if target.is_none() {
                    target.clone_from(&option.next_question);
                }
            }
            None => groups.push((condition, ids, option.next_question.clone())),
        }
    }

    let mut routes: Vec<Route> = groups
        .into_iter()
        .filter_map(|(condition, option_ids, target)| {
            target.map(|target| Route::Combinational {
                condition,
                option_ids,
                target,
            })
        })
        .collect();

    for branch in branches {
        let ids = key_set(options, &branch.option_ids);
        if ids.is_empty() {
            continue;
        }
        let covered = routes.iter().any(|route| {
            matches!(route, Route::Combinational { condition, option_ids, .. }
                if *condition == branch.condition_type && *option_ids == ids)
        });
        if !covered {
            routes.push(Route::Combinational {
                condition: branch.condition_type,
                option_ids: ids,
                target: branch.next_question_id.clone(),
            });
        }
    }

    routes.extend(options.iter().filter(|option| !option.is_grouped()).filter_map(
        |option| {
            option.next_question.as_ref().map(|target| Route::Simple {
                option_id: option.id.clone(),
                target: target.clone(),
            })
        },
    ));

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BranchGrouping;

    fn and_group(ids: &[&str]) -> BranchGrouping {
        BranchGrouping::new(ConditionType::And, ids.iter().copied())
    }

    #[test]
    fn grouped_options_merge_into_one_route() {
        let options = vec![
            SurveyOption::new("o1", "A").with_grouping(and_group(&["o2", "o1"])),
            SurveyOption::new("o2", "B")
                .with_grouping(and_group(&["o1", "o2"]))
                .with_next("q2"),
            SurveyOption::new("o3", "C"),
        ];

        let routes = build_routes(&options, &[]);
        assert_eq!(
            routes,
            vec![Route::Combinational {
                condition: ConditionType::And,
                option_ids: ["o1", "o2"].iter().map(|s| s.to_string()).collect(),
                target: QuestionId::new("q2"),
            }]
        );
    }

    #[test]
    fn grouped_option_never_produces_simple_route() {
        let options = vec![
            SurveyOption::new("o1", "A")
                .with_grouping(BranchGrouping {
                    condition: None,
                    option_ids: vec!["o1".into()],
                })
                .with_next("q2"),
            SurveyOption::new("o2", "B").with_next("q3"),
        ];

        let routes = build_routes(&options, &[]);
        assert_eq!(
            routes,
            vec![Route::Simple {
                option_id: "o2".into(),
                target: QuestionId::new("q3"),
            }]
        );
    }

    #[test]
    fn group_without_target_is_dropped() {
        let options = vec![SurveyOption::new("o1", "A").with_grouping(and_group(&["o1"]))];
        assert!(build_routes(&options, &[]).is_empty());
    }

    #[test]
    fn branch_records_follow_option_groups_and_skip_duplicates() {
        let options = vec![
            SurveyOption::new("o1", "A")
                .with_grouping(BranchGrouping::new(ConditionType::Or, ["o1"]))
                .with_next("q2"),
            SurveyOption::new("o2", "B"),
        ];
        let branches = vec![
            Branch {
                id: "b1".into(),
                current_question_id: "q1".into(),
                next_question_id: "q9".into(),
                condition_type: ConditionType::Or,
                option_ids: vec!["o1".into()],
            },
            Branch {
                id: "b2".into(),
                current_question_id: "q1".into(),
                next_question_id: "q3".into(),
                condition_type: ConditionType::And,
                option_ids: vec!["o1".into(), "o2".into()],
            },
        ];

        let targets: Vec<_> = build_routes(&options, &branches)
            .iter()
            .map(|route| route.target().as_str().to_string())
            .collect();
        assert_eq!(targets, vec!["q2", "q3"]);
    }

    #[test]
    fn branch_ids_resolve_through_option_values() {
        let options = vec![SurveyOption::new("17", "Poor").with_value("1")];
        let branches = vec![Branch {
            id: "b1".into(),
            current_question_id: "q1".into(),
            next_question_id: "q2".into(),
            condition_type: ConditionType::Or,
            option_ids: vec!["1".into()],
        }];

        let routes = build_routes(&options, &branches);
        assert!(matches!(
            &routes[0],
            Route::Combinational { option_ids, .. } if option_ids.contains("17")
        ));
    }
}
