use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use survey_flow_types::{RequestContext, SourceError, SurveySource};

/// Reads survey payloads from JSON files on disk.
///
/// A survey id `7` is looked up as `<dir>/7.json`. When the source points
/// at a single file instead of a directory, that file is returned for any id.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_for(&self, survey_id: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{survey_id}.json"))
        } else {
            self.path.clone()
        }
    }
}

impl SurveySource for JsonFileSource {
    fn fetch(&self, _context: &RequestContext, survey_id: &str) -> Result<Value, SourceError> {
        let file = self.file_for(survey_id);
        if !file.exists() {
            return Err(SourceError::NotFound(survey_id.to_string()));
        }
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("reading survey file {}", file.display()))?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty(survey_id.to_string()));
        }
        let payload = serde_json::from_str(&text)
            .with_context(|| format!("parsing survey file {}", file.display()))?;
        Ok(payload)
    }
}
