//! In-process lookup implementation.
//!
//! Backs tests, benches and local runs of the server. Records are kept in
//! insertion order; events are ranked by `create_time` with the larger id
//! winning ties.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::{
    EventListQuery, EventLookup, PipelineLookup, SortOrder, StageListQuery, StageLookup,
    StoreResult,
};
use crate::core::{Event, Pipeline, PipelineId, Stage};

/// Errors loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid seed document.
    #[error("Failed to parse seed file {path}: {source}")]
    Parse {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Records used to populate a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Pipelines.
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
    /// Events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Stages.
    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Default)]
struct Inner {
    pipelines: HashMap<PipelineId, Pipeline>,
    events: Vec<Event>,
    stages: Vec<Stage>,
}

/// Lookup store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the seed's records.
    #[must_use]
    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        store.apply_seed(seed);
        store
    }

    /// Reads a JSON seed document from disk.
    pub fn load_seed(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: display.clone(),
            source,
        })?;
        let seed: Seed = serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: display,
            source,
        })?;
        debug!(
            pipelines = seed.pipelines.len(),
            events = seed.events.len(),
            stages = seed.stages.len(),
            "Loaded seed data"
        );
        Ok(Self::from_seed(seed))
    }

    /// Adds every record of a seed.
    pub fn apply_seed(&self, seed: Seed) {
        let mut inner = self.inner.write();
        for pipeline in seed.pipelines {
            inner.pipelines.insert(pipeline.id, pipeline);
        }
        inner.events.extend(seed.events);
        inner.stages.extend(seed.stages);
    }

    /// Adds or replaces a pipeline.
    pub fn insert_pipeline(&self, pipeline: Pipeline) {
        self.inner.write().pipelines.insert(pipeline.id, pipeline);
    }

    /// Adds an event.
    pub fn insert_event(&self, event: Event) {
        self.inner.write().events.push(event);
    }

    /// Adds a stage.
    pub fn insert_stage(&self, stage: Stage) {
        self.inner.write().stages.push(stage);
    }

    /// Returns the number of stored pipelines, events and stages.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        let inner = self.inner.read();
        (inner.pipelines.len(), inner.events.len(), inner.stages.len())
    }
}

fn recency(a: &Event, b: &Event) -> Ordering {
    a.create_time
        .cmp(&b.create_time)
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl PipelineLookup for MemoryStore {
    async fn get(&self, id: PipelineId) -> StoreResult<Option<Pipeline>> {
        Ok(self.inner.read().pipelines.get(&id).cloned())
    }
}

#[async_trait]
impl EventLookup for MemoryStore {
    async fn list(&self, query: &EventListQuery) -> StoreResult<Vec<Event>> {
        let filter = &query.params;
        let mut events: Vec<Event> = self
            .inner
            .read()
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        let paginate = query.paginate.unwrap_or_default();
        match paginate.sort {
            SortOrder::Descending => events.sort_by(|a, b| recency(b, a)),
            SortOrder::Ascending => events.sort_by(recency),
        }

        Ok(events
            .into_iter()
            .skip(paginate.offset())
            .take(paginate.count)
            .collect())
    }
}

#[async_trait]
impl StageLookup for MemoryStore {
    async fn list(&self, query: &StageListQuery) -> StoreResult<Vec<Stage>> {
        Ok(self
            .inner
            .read()
            .stages
            .iter()
            .filter(|s| s.pipeline_id == query.pipeline_id && s.event_id == query.event_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventId, EventType, StageId};
    use crate::store::{EventFilter, Paginate, ParentFilter};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn pid(n: u64) -> PipelineId {
        PipelineId::new(n).unwrap()
    }

    fn eid(n: u64) -> EventId {
        EventId::new(n).unwrap()
    }

    fn event_at(id: u64, pipeline: u64, minute: u32) -> Event {
        Event::new(eid(id), pid(pipeline))
            .with_create_time(Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap())
    }

    fn ids(events: &[Event]) -> Vec<u64> {
        events.iter().map(|e| e.id.get()).collect()
    }

    fn populated() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_pipeline(Pipeline::new(pid(123), "screwdriver/api"));
        store.insert_event(event_at(550, 123, 0));
        store.insert_event(event_at(555, 123, 30));
        store.insert_event(event_at(560, 123, 40).with_parent(eid(555)));
        store.insert_event(event_at(561, 123, 45).with_type(EventType::Pr));
        store.insert_event(event_at(900, 124, 59));
        store
    }

    #[tokio::test]
    async fn test_get_pipeline() {
        let store = populated();
        assert!(store.get(pid(123)).await.unwrap().is_some());
        assert!(store.get(pid(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_top_level_skips_children_and_pr_events() {
        let store = populated();
        let events = EventLookup::list(&store, &EventListQuery::latest_top_level(pid(123)))
            .await
            .unwrap();

        assert_eq!(ids(&events), vec![555]);
    }

    #[tokio::test]
    async fn test_latest_top_level_empty_for_unknown_pipeline() {
        let store = populated();
        let events = EventLookup::list(&store, &EventListQuery::latest_top_level(pid(77)))
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_equal_create_time_prefers_larger_id() {
        let store = MemoryStore::new();
        store.insert_event(event_at(11, 1, 5));
        store.insert_event(event_at(10, 1, 5));

        let events = EventLookup::list(&store, &EventListQuery::latest_top_level(pid(1)))
            .await
            .unwrap();
        assert_eq!(ids(&events), vec![11]);
    }

    #[tokio::test]
    async fn test_list_all_ascending_with_paging() {
        let store = populated();
        let query = EventListQuery {
            params: EventFilter::for_pipeline(pid(123)),
            paginate: Some(Paginate {
                page: 2,
                count: 2,
                sort: SortOrder::Ascending,
            }),
        };

        let events = EventLookup::list(&store, &query).await.unwrap();
        assert_eq!(ids(&events), vec![560, 561]);
    }

    #[tokio::test]
    async fn test_list_children_of_event() {
        let store = populated();
        let query = EventListQuery {
            params: EventFilter {
                pipeline_id: pid(123),
                parent_event_id: ParentFilter::Equals(eid(555)),
                event_type: None,
            },
            paginate: None,
        };

        let events = EventLookup::list(&store, &query).await.unwrap();
        assert_eq!(ids(&events), vec![560]);
    }

    #[tokio::test]
    async fn test_stages_scoped_to_event_in_insertion_order() {
        let store = populated();
        let stage = |id: u64, event: u64, name: &str| {
            Stage::new(StageId::new(id).unwrap(), pid(123), eid(event), name)
        };
        store.insert_stage(stage(3, 550, "old"));
        store.insert_stage(stage(2, 555, "test"));
        store.insert_stage(stage(1, 555, "build"));

        let stages = StageLookup::list(&store, &StageListQuery::new(pid(123), eid(555)))
            .await
            .unwrap();
        let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["test", "build"]);
    }

    #[test]
    fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "pipelines": [{{"id": 123, "name": "screwdriver/api"}}],
                "events": [{{"id": 555, "pipelineId": 123, "type": "pipeline", "createTime": "2024-05-01T10:00:00Z"}}],
                "stages": [{{"id": 1, "pipelineId": 123, "eventId": 555, "name": "build"}}]
            }}"#
        )
        .unwrap();

        let store = MemoryStore::load_seed(file.path()).unwrap();
        assert_eq!(store.counts(), (1, 1, 1));
    }

    #[test]
    fn test_load_seed_errors() {
        let err = MemoryStore::load_seed("/nonexistent/seed.json").unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = MemoryStore::load_seed(file.path()).unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse seed file"));
    }

    #[test]
    fn test_apply_seed_from_blocking_context() {
        let store = MemoryStore::from_seed(Seed {
            pipelines: vec![Pipeline::new(pid(5), "a/b")],
            ..Seed::default()
        });

        let found = tokio_test::block_on(store.get(pid(5))).unwrap();
        assert_eq!(found.map(|p| p.name), Some("a/b".to_string()));
    }
}
