use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, QuestionNode};

/// Publication status of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Draft,
    Active,
    Paused,
    Closed,
    Archived,
}

impl SurveyStatus {
    /// Map the backend's numeric status code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Active),
            2 => Some(Self::Paused),
            3 => Some(Self::Closed),
            4 => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Descriptive data carried alongside the question graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyMeta {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<SurveyStatus>,
}

/// The normalized question graph of one survey.
///
/// Questions are stored by id; branch routes refer to their targets by id.
/// The roots form an ordered forest: each root starts its own path.
/// Built once per survey load and treated as immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct SurveyTree {
    meta: SurveyMeta,
    nodes: HashMap<QuestionId, QuestionNode>,
    roots: Vec<QuestionId>,
}

impl SurveyTree {
    /// Create a tree from its questions and root ids.
    ///
    /// Root ids that name no question are dropped. Roots are ordered by
    /// their `order`; roots without one keep their relative position after
    /// all ordered roots. Routes pointing at unknown questions are removed.
    pub fn new(nodes: Vec<QuestionNode>, roots: Vec<QuestionId>) -> Self {
        let mut map: HashMap<QuestionId, QuestionNode> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            map.entry(node.id().clone()).or_insert(node);
        }

        let known: Vec<QuestionId> = map.keys().cloned().collect();
        for node in map.values_mut() {
            node.retain_routes(|target| known.contains(target));
        }

        let mut roots: Vec<QuestionId> = roots
            .into_iter()
            .filter(|id| map.contains_key(id))
            .fold(Vec::new(), |mut acc, id| {
                if !acc.contains(&id) {
                    acc.push(id);
                }
                acc
            });
        roots.sort_by_key(|id| map.get(id).and_then(QuestionNode::order).unwrap_or(i64::MAX));

        Self {
            meta: SurveyMeta::default(),
            nodes: map,
            roots,
        }
    }

    /// Create an empty tree (no survey content).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach survey metadata.
    pub fn with_meta(mut self, meta: SurveyMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn meta(&self) -> &SurveyMeta {
        &self.meta
    }

    /// Whether respondents may answer this survey.
    ///
    /// A survey without a status is treated as open.
    pub fn is_open(&self) -> bool {
        matches!(self.meta.status, None | Some(SurveyStatus::Active))
    }

    /// Look up a question by id.
    pub fn get(&self, id: &str) -> Option<&QuestionNode> {
        self.nodes.get(id)
    }

    /// The root ids, in presentation order.
    pub fn root_ids(&self) -> &[QuestionId] {
        &self.roots
    }

    /// The root questions, in presentation order.
    pub fn roots(&self) -> impl Iterator<Item = &QuestionNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Get the root at the given position.
    pub fn root(&self, index: usize) -> Option<&QuestionNode> {
        self.roots.get(index).and_then(|id| self.nodes.get(id))
    }

    /// Iterate over all questions, in no particular order.
    pub fn questions(&self) -> impl Iterator<Item = &QuestionNode> {
        self.nodes.values()
    }

    /// Check if the survey has no roots, i.e. no content to present.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Get the number of root sequences.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Get the total number of questions.
    pub fn question_count(&self) -> usize {
        self.nodes.len()
    }
}
