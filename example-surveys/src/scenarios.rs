//! Small trees, one branching rule each.

use survey_flow::{
    Branch, BranchGrouping, ConditionType, QuestionNode, QuestionType, SurveyOption, SurveyTree,
};

/// Q1 single choice: "yes" leads to Q2, "no" ends the root.
pub fn simple_yes_no() -> SurveyTree {
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "Did you receive your medication on time?", QuestionType::SingleChoice)
                .with_required(true)
                .with_options(vec![
                    SurveyOption::new("o1", "Yes").with_value("yes").with_next("Q2"),
                    SurveyOption::new("o2", "No").with_value("no"),
                ]),
            QuestionNode::new("Q2", "Did the nurse explain what it was for?", QuestionType::Text),
        ],
        vec!["Q1".into()],
    )
}

/// Q1 multiple choice: selecting exactly o1 and o2 leads to Q2.
pub fn combinational_and() -> SurveyTree {
    let group = BranchGrouping::new(ConditionType::And, ["o1", "o2"]);
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "Which services did you use?", QuestionType::MultipleChoice)
                .with_options(vec![
                    SurveyOption::new("o1", "Radiology")
                        .with_grouping(group.clone())
                        .with_next("Q2"),
                    SurveyOption::new("o2", "Laboratory").with_grouping(group),
                    SurveyOption::new("o3", "Pharmacy"),
                ]),
            QuestionNode::new("Q2", "How long did you wait for results?", QuestionType::Text),
        ],
        vec!["Q1".into()],
    )
}

/// Q1 required multiple choice: picking either of o1, o2 leads to Q2.
pub fn combinational_or() -> SurveyTree {
    let group = BranchGrouping::new(ConditionType::Or, ["o1", "o2"]);
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "Who explained your discharge plan?", QuestionType::MultipleChoice)
                .with_required(true)
                .with_options(vec![
                    SurveyOption::new("o1", "Doctor")
                        .with_grouping(group.clone())
                        .with_next("Q2"),
                    SurveyOption::new("o2", "Nurse").with_grouping(group),
                    SurveyOption::new("o3", "Nobody"),
                ]),
            QuestionNode::new("Q2", "Was the explanation clear?", QuestionType::Text),
        ],
        vec!["Q1".into()],
    )
}

/// Q1 rating 1 to 5 without modelled options: a rating of 1 or 2 leads to Q2.
pub fn rating_or() -> SurveyTree {
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "How clean was your room?", QuestionType::Rating)
                .with_rating_bounds(1, 5)
                .with_branches(vec![Branch {
                    id: "b1".into(),
                    current_question_id: "Q1".into(),
                    next_question_id: "Q2".into(),
                    condition_type: ConditionType::Or,
                    option_ids: vec!["1".into(), "2".into()],
                }]),
            QuestionNode::new("Q2", "What should we clean more often?", QuestionType::Text),
        ],
        vec!["Q1".into()],
    )
}

/// A survey without questions.
pub fn no_questions() -> SurveyTree {
    SurveyTree::empty()
}

/// Options whose ids differ from their values; branch groups reference values.
pub fn values_as_keys() -> SurveyTree {
    let group = BranchGrouping::new(ConditionType::Or, ["morning", "evening"]);
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "When were you visited?", QuestionType::MultipleChoice)
                .with_options(vec![
                    SurveyOption::new("7", "Morning")
                        .with_value("morning")
                        .with_grouping(group.clone())
                        .with_next("Q2"),
                    SurveyOption::new("8", "Evening")
                        .with_value("evening")
                        .with_grouping(group),
                    SurveyOption::new("9", "Night").with_value("night").with_next("Q3"),
                ]),
            QuestionNode::new("Q2", "Were visits long enough?", QuestionType::Text),
            QuestionNode::new("Q3", "Were you woken up?", QuestionType::Text),
        ],
        vec!["Q1".into()],
    )
}

/// An option pointing at a question that does not exist.
pub fn unknown_target() -> SurveyTree {
    SurveyTree::new(
        vec![
            QuestionNode::new("Q1", "Pick one", QuestionType::SingleChoice)
                .with_options(vec![SurveyOption::new("o1", "Gone").with_next("Q404")]),
        ],
        vec!["Q1".into()],
    )
}
