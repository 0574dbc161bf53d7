//! Event record: one triggered execution of a pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EventId, PipelineId};

/// What triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Triggered by a commit to the pipeline's branch (or a manual start).
    #[default]
    Pipeline,
    /// Triggered by a pull request.
    Pr,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline => write!(f, "pipeline"),
            Self::Pr => write!(f, "pr"),
        }
    }
}

/// An event belonging to exactly one pipeline.
///
/// Top-level events have no parent; restarts and downstream triggers point
/// back at the event they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Owning pipeline.
    pub pipeline_id: PipelineId,
    /// Event this one was started from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_event_id: Option<EventId>,
    /// Trigger classification.
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Commit the event ran against.
    #[serde(default)]
    pub sha: String,
    /// When the event was created.
    pub create_time: DateTime<Utc>,
}

impl Event {
    /// Creates a top-level pipeline event created now.
    #[must_use]
    pub fn new(id: EventId, pipeline_id: PipelineId) -> Self {
        Self {
            id,
            pipeline_id,
            parent_event_id: None,
            event_type: EventType::Pipeline,
            sha: String::new(),
            create_time: Utc::now(),
        }
    }

    /// Sets the parent event.
    #[must_use]
    pub fn with_parent(mut self, parent: EventId) -> Self {
        self.parent_event_id = Some(parent);
        self
    }

    /// Sets the event type.
    #[must_use]
    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    /// Sets the commit sha.
    #[must_use]
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = sha.into();
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = create_time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u64) -> PipelineId {
        PipelineId::new(n).unwrap()
    }

    fn eid(n: u64) -> EventId {
        EventId::new(n).unwrap()
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(EventType::Pipeline.to_string(), "pipeline");
        assert_eq!(EventType::Pr.to_string(), "pr");
    }

    #[test]
    fn test_event_deserialize() {
        let json = serde_json::json!({
            "id": 555,
            "pipelineId": 123,
            "type": "pipeline",
            "sha": "abc123",
            "createTime": "2024-05-01T10:00:00Z"
        });
        let event: Event = serde_json::from_value(json).unwrap();

        assert_eq!(event.id, eid(555));
        assert_eq!(event.pipeline_id, pid(123));
        assert_eq!(event.parent_event_id, None);
        assert_eq!(event.event_type, EventType::Pipeline);
        assert_eq!(event.sha, "abc123");
    }

    #[test]
    fn test_event_serialize_uses_type_key() {
        let event = Event::new(eid(1), pid(2)).with_type(EventType::Pr);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "pr");
        assert!(value.get("parentEventId").is_none());
    }
}
