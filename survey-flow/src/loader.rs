use survey_flow_types::{RequestContext, SourceError, SurveySource, SurveyTree};

use crate::normalize::{NormalizeOptions, normalize_survey};

/// Identifies one load request issued by a [`SurveyLoader`].
///
/// Tickets are ordered by issue time; only the most recently issued one
/// may replace the loaded survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// A survey that finished loading.
#[derive(Debug, Clone)]
pub struct LoadedSurvey {
    pub ticket: RequestTicket,
    pub survey_id: String,
    pub tree: SurveyTree,
}

/// Fetches surveys through a [`SurveySource`] and keeps the latest one.
///
/// Loading is split into [`begin`](Self::begin), [`fetch`](Self::fetch) and
/// [`complete`](Self::complete) so that fetches can run elsewhere while
/// newer requests are issued. A completion is applied only if its ticket is
/// still the latest; responses to superseded requests are dropped.
#[derive(Debug)]
pub struct SurveyLoader {
    context: RequestContext,
    options: NormalizeOptions,
    issued: u64,
    current: Option<LoadedSurvey>,
}

impl SurveyLoader {
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            options: NormalizeOptions::default(),
            issued: 0,
            current: None,
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Issue a new request ticket, superseding all earlier ones.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Fetch and normalize one survey. Does not touch the loaded survey.
    pub fn fetch(&self, source: &impl SurveySource, survey_id: &str) -> Result<SurveyTree, SourceError> {
        tracing::debug!(survey_id, base_url = %self.context.base_url, "fetching survey");
        let payload = source.fetch(&self.context, survey_id)?;
        if payload.is_null() {
            return Err(SourceError::Empty(survey_id.to_string()));
        }
        let tree = normalize_survey(&payload, &self.options);
        if tree.is_empty() {
            tracing::info!(survey_id, "survey has no questions");
        }
        Ok(tree)
    }

    /// Apply the result of a fetch.
    ///
    /// Returns `Ok(true)` when the result was applied and `Ok(false)` when
    /// the ticket was superseded and the result dropped. A failed latest
    /// request clears the loaded survey and returns the error.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        survey_id: &str,
        result: Result<SurveyTree, SourceError>,
    ) -> Result<bool, SourceError> {
        if !self.is_latest(ticket) {
            tracing::debug!(?ticket, survey_id, "dropping response to superseded request");
            return Ok(false);
        }
        match result {
            Ok(tree) => {
                self.current = Some(LoadedSurvey {
                    ticket,
                    survey_id: survey_id.to_string(),
                    tree,
                });
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(survey_id, error = %err, "survey could not be loaded");
                self.current = None;
                Err(err)
            }
        }
    }

    /// Fetch a survey and make it the loaded one.
    pub fn load(&mut self, source: &impl SurveySource, survey_id: &str) -> Result<&SurveyTree, SourceError> {
        let ticket = self.begin();
        let result = self.fetch(source, survey_id);
        self.complete(ticket, survey_id, result)?;
        self.current
            .as_ref()
            .map(|loaded| &loaded.tree)
            .ok_or_else(|| SourceError::NotFound(survey_id.to_string()))
    }

    pub fn current(&self) -> Option<&LoadedSurvey> {
        self.current.as_ref()
    }
}
