use survey_flow_types::{AnswerValue, Answers, FlowError, QuestionId, QuestionNode, SurveyTree};

use crate::flow::{build_path, build_paths, is_root_exhausted, reset_path};
use crate::submission::{RespondentInfo, SubmissionPayload, SubmitError, WireId, map_answers};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The survey has no root questions.
    NoQuestions,
    /// The respondent is working through the root at `root_index`.
    InProgress { root_index: usize },
    /// The last root's path is complete.
    Finished,
}

/// What an answer did to the session besides storing the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Answers dropped because they belonged to questions after the edited
    /// one on the previous path.
    pub invalidated: Vec<QuestionId>,
    /// Set when the session moved on to another root or finished.
    pub advanced: Option<SessionState>,
}

/// Answered versus total questions along the computed paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Completion as a fraction in `0.0..=1.0`. Zero when there is nothing to answer.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }

    /// Completion as a whole percentage.
    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round() as u8
    }
}

/// One respondent's pass through a survey.
///
/// Holds the answers and the index of the active root. Roots are taken in
/// order: once the active root's path is complete the session moves to the
/// next root, and after the last one it is finished. All derived state
/// (paths, progress, readiness) is recomputed from the answers on demand.
#[derive(Debug, Clone)]
pub struct SurveySession<'t> {
    tree: &'t SurveyTree,
    answers: Answers,
    active_root: usize,
    finished: bool,
}

impl<'t> SurveySession<'t> {
    pub fn new(tree: &'t SurveyTree) -> Self {
        Self::with_answers(tree, Answers::new())
    }

    /// Resume a session from answers given earlier.
    ///
    /// The active root is the first one whose path is not yet complete.
    pub fn with_answers(tree: &'t SurveyTree, answers: Answers) -> Self {
        let mut session = Self {
            tree,
            answers,
            active_root: 0,
            finished: false,
        };
        session.settle();
        session
    }

    pub fn tree(&self) -> &'t SurveyTree {
        self.tree
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn into_answers(self) -> Answers {
        self.answers
    }

    pub fn state(&self) -> SessionState {
        if self.tree.is_empty() {
            SessionState::NoQuestions
        } else if self.finished {
            SessionState::Finished
        } else {
            SessionState::InProgress {
                root_index: self.active_root,
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    /// Index of the active root, or `None` for a survey without questions.
    pub fn active_root_index(&self) -> Option<usize> {
        (!self.tree.is_empty()).then_some(self.active_root)
    }

    pub fn active_root(&self) -> Option<&'t QuestionNode> {
        self.tree.root(self.active_root)
    }

    /// The computed path of the active root.
    pub fn active_path(&self) -> Vec<&'t QuestionNode> {
        self.active_root()
            .map(|root| build_path(self.tree, root, &self.answers))
            .unwrap_or_default()
    }

    /// The computed path of every root, in root order.
    pub fn paths(&self) -> Vec<Vec<&'t QuestionNode>> {
        build_paths(self.tree, &self.answers)
    }

    /// The first unanswered question on the active path.
    ///
    /// `None` once the session is finished.
    pub fn current_question(&self) -> Option<&'t QuestionNode> {
        if self.finished {
            return None;
        }
        self.active_path()
            .into_iter()
            .find(|question| !self.answers.is_answered(question))
    }

    /// Whether the active root's path is complete.
    pub fn is_root_exhausted(&self) -> bool {
        let path = self.active_path();
        is_root_exhausted(self.tree, &path, &self.answers)
    }

    /// Record an answer for a question on the active path.
    ///
    /// Answers to questions after it on the previous path are discarded
    /// first, since the new answer may route elsewhere. Afterwards the
    /// session advances past every root whose path is complete.
    pub fn answer(
        &mut self,
        question: impl Into<QuestionId>,
        value: impl Into<AnswerValue>,
    ) -> Result<AnswerOutcome, FlowError> {
        let question = question.into();
        if self.tree.is_empty() {
            return Err(FlowError::NoQuestions);
        }
        if self.tree.get(question.as_str()).is_none() {
            return Err(FlowError::UnknownQuestion(question));
        }
        let path = self.active_path();
        let Some(index) = path.iter().position(|node| *node.id() == question) else {
            return Err(FlowError::NotInActivePath(question));
        };

        let kept = reset_path(&path, index);
        let mut invalidated = Vec::new();
        for dropped in &path[kept.len()..] {
            if self.answers.remove(dropped.id().as_str()).is_some() {
                invalidated.push(dropped.id().clone());
            }
        }
        if !invalidated.is_empty() {
            tracing::debug!(%question, dropped = invalidated.len(), "discarded answers after edited question");
        }

        self.answers.insert(question, value);
        let before = self.state();
        self.settle();
        let after = self.state();
        Ok(AnswerOutcome {
            invalidated,
            advanced: (before != after).then_some(after),
        })
    }

    /// Clear the answer to a question on the active path, together with
    /// every answer after it on that path.
    pub fn clear(&mut self, question: impl Into<QuestionId>) -> Result<AnswerOutcome, FlowError> {
        let question = question.into();
        let outcome = self.answer(question.clone(), AnswerValue::Null)?;
        self.answers.remove(question.as_str());
        Ok(outcome)
    }

    /// Move the active root forward past complete paths, and set or reset
    /// the finished flag.
    fn settle(&mut self) {
        self.finished = false;
        let count = self.tree.root_count();
        while self.active_root < count {
            let path = self.active_path();
            if !is_root_exhausted(self.tree, &path, &self.answers) {
                return;
            }
            if self.active_root + 1 == count {
                tracing::debug!("all root paths complete");
                self.finished = true;
                return;
            }
            self.active_root += 1;
            tracing::debug!(root_index = self.active_root, "moving to next root");
        }
    }

    /// Answered versus total questions over the paths of all roots.
    pub fn progress(&self) -> Progress {
        let paths = self.paths();
        Progress {
            answered: paths
                .iter()
                .flatten()
                .filter(|q| self.answers.is_answered(q))
                .count(),
            total: paths.iter().map(Vec::len).sum(),
        }
    }

    /// Questions on any root's path without an answer of the right shape,
    /// in path order.
    pub fn missing_answers(&self) -> Vec<QuestionId> {
        self.paths()
            .iter()
            .flatten()
            .filter(|q| !self.answers.is_answered(q))
            .map(|q| q.id().clone())
            .collect()
    }

    /// Required questions on any root's path that have no answer yet.
    pub fn missing_required(&self) -> Vec<QuestionId> {
        self.paths()
            .iter()
            .flatten()
            .filter(|q| q.is_required() && !self.answers.is_answered(q))
            .map(|q| q.id().clone())
            .collect()
    }

    /// Whether every question on every root's path is answered.
    pub fn is_submit_ready(&self) -> bool {
        !self.tree.is_empty() && self.answers.all_answered(self.paths().into_iter().flatten())
    }

    /// Build the submission body for the current answers.
    ///
    /// Only answers on the computed paths are included; answers left over
    /// from abandoned branches are not sent.
    pub fn submission(&self, respondent: RespondentInfo) -> Result<SubmissionPayload, SubmitError> {
        if self.tree.is_empty() {
            return Err(SubmitError::NoQuestions);
        }
        if !self.tree.is_open() {
            return Err(SubmitError::Closed);
        }
        let missing = self.missing_answers();
        if !missing.is_empty() {
            return Err(SubmitError::Incomplete { missing });
        }
        let answers = map_answers(&self.paths(), &self.answers)?;
        tracing::info!(answers = answers.len(), "prepared survey submission");
        Ok(SubmissionPayload {
            survey_id: self.tree.meta().id.as_deref().map(WireId::parse),
            respondent,
            answers,
        })
    }
}
