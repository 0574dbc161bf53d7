//! Stage record and its serialized form.

use serde::{Deserialize, Serialize};

use super::{EventId, JobId, PipelineId, StageId};

/// A named grouping of jobs, scoped to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Stage identifier.
    pub id: StageId,
    /// Owning pipeline.
    pub pipeline_id: PipelineId,
    /// Event the stage belongs to.
    pub event_id: EventId,
    /// Stage name as written in the pipeline configuration.
    pub name: String,
    /// Jobs grouped under this stage.
    #[serde(default)]
    pub job_ids: Vec<JobId>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Job run before the stage's jobs.
    #[serde(default)]
    pub setup: Option<JobId>,
    /// Job run after the stage's jobs.
    #[serde(default)]
    pub teardown: Option<JobId>,
    /// Whether the stage was removed from the configuration.
    #[serde(default)]
    pub archived: bool,
}

impl Stage {
    /// Creates a stage with no jobs.
    #[must_use]
    pub fn new(
        id: StageId,
        pipeline_id: PipelineId,
        event_id: EventId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            pipeline_id,
            event_id,
            name: name.into(),
            job_ids: Vec::new(),
            description: None,
            setup: None,
            teardown: None,
            archived: false,
        }
    }

    /// Sets the grouped jobs.
    #[must_use]
    pub fn with_job_ids(mut self, job_ids: Vec<JobId>) -> Self {
        self.job_ids = job_ids;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the setup and teardown jobs.
    #[must_use]
    pub fn with_hooks(mut self, setup: Option<JobId>, teardown: Option<JobId>) -> Self {
        self.setup = setup;
        self.teardown = teardown;
        self
    }

    /// Marks the stage archived.
    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Converts the stage into its plain serialized record.
    #[must_use]
    pub fn to_record(&self) -> StageRecord {
        StageRecord {
            id: self.id,
            pipeline_id: self.pipeline_id,
            event_id: self.event_id,
            name: self.name.clone(),
            job_ids: self.job_ids.clone(),
            description: self.description.clone(),
            setup: self.setup,
            teardown: self.teardown,
            archived: self.archived,
        }
    }
}

/// Output shape of a stage in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    /// Stage identifier.
    pub id: StageId,
    /// Owning pipeline.
    pub pipeline_id: PipelineId,
    /// Event the stage belongs to.
    pub event_id: EventId,
    /// Stage name.
    pub name: String,
    /// Jobs grouped under this stage.
    pub job_ids: Vec<JobId>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Setup job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<JobId>,
    /// Teardown job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown: Option<JobId>,
    /// Whether the stage is archived.
    pub archived: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage() -> Stage {
        Stage::new(
            StageId::new(1).unwrap(),
            PipelineId::new(123).unwrap(),
            EventId::new(555).unwrap(),
            "build",
        )
    }

    #[test]
    fn test_record_json_shape() {
        let record = stage()
            .with_job_ids(vec![JobId::new(10).unwrap(), JobId::new(11).unwrap()])
            .to_record();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "id": 1,
                "pipelineId": 123,
                "eventId": 555,
                "name": "build",
                "jobIds": [10, 11],
                "archived": false
            })
        );
    }

    #[test]
    fn test_record_includes_optional_fields_when_set() {
        let record = stage()
            .with_description("compile everything")
            .with_hooks(JobId::new(7), JobId::new(8))
            .archived()
            .to_record();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["description"], "compile everything");
        assert_eq!(value["setup"], 7);
        assert_eq!(value["teardown"], 8);
        assert_eq!(value["archived"], true);
    }

    #[test]
    fn test_stage_deserialize_defaults() {
        let json = serde_json::json!({
            "id": 2,
            "pipelineId": 123,
            "eventId": 555,
            "name": "test"
        });
        let stage: Stage = serde_json::from_value(json).unwrap();

        assert!(stage.job_ids.is_empty());
        assert!(!stage.archived);
        assert_eq!(stage.setup, None);
    }
}
