//! Pipeline record.

use serde::{Deserialize, Serialize};

use super::PipelineId;

/// A configured CI/CD pipeline.
///
/// Only the existence of a pipeline matters to the stage listing; the
/// remaining fields are carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Pipeline identifier.
    pub id: PipelineId,
    /// Human readable name, usually `owner/repo`.
    #[serde(default)]
    pub name: String,
    /// Source control URI the pipeline was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_uri: Option<String>,
}

impl Pipeline {
    /// Creates a pipeline record with the given id and name.
    #[must_use]
    pub fn new(id: PipelineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scm_uri: None,
        }
    }

    /// Sets the source control URI.
    #[must_use]
    pub fn with_scm_uri(mut self, uri: impl Into<String>) -> Self {
        self.scm_uri = Some(uri.into());
        self
    }
}
