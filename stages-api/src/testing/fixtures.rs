//! Store fixtures.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::core::{Event, EventId, EventType, Pipeline, PipelineId, Stage, StageId};
use crate::store::{Lookups, MemoryStore};

/// Pipeline id from a literal. Panics on zero.
#[must_use]
pub fn pipeline_id(n: u64) -> PipelineId {
    PipelineId::new(n).expect("pipeline id must be non-zero")
}

/// Event id from a literal. Panics on zero.
#[must_use]
pub fn event_id(n: u64) -> EventId {
    EventId::new(n).expect("event id must be non-zero")
}

/// Stage id from a literal. Panics on zero.
#[must_use]
pub fn stage_id(n: u64) -> StageId {
    StageId::new(n).expect("stage id must be non-zero")
}

fn minute(m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single().unwrap_or_default()
        + chrono::Duration::minutes(i64::from(m))
}

fn fake_sha(id: u64) -> String {
    format!("{id:040x}")
}

/// Builder over a [`MemoryStore`].
#[derive(Debug, Default)]
pub struct StoreFixture {
    store: Arc<MemoryStore>,
}

impl StoreFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical dataset:
    ///
    /// - pipeline 123 with top-level events 550 (older) and 555 (latest), a
    ///   newer child event 560 and a newer PR event 561;
    /// - stages `build` (1) and `test` (2) on event 555, `stale` (3) on 550,
    ///   `child` (4) on 560;
    /// - pipeline 124 with no events.
    #[must_use]
    pub fn example() -> Self {
        Self::new()
            .with_pipeline(123, "screwdriver-cd/screwdriver")
            .with_pipeline(124, "screwdriver-cd/ui")
            .with_event(550, 123, 0)
            .with_event(555, 123, 30)
            .with_child_event(560, 123, 555, 40)
            .with_pr_event(561, 123, 45)
            .with_stage(3, 123, 550, "stale")
            .with_stage(1, 123, 555, "build")
            .with_stage(2, 123, 555, "test")
            .with_stage(4, 123, 560, "child")
    }

    /// Adds a pipeline.
    #[must_use]
    pub fn with_pipeline(self, id: u64, name: &str) -> Self {
        self.store.insert_pipeline(
            Pipeline::new(pipeline_id(id), name).with_scm_uri(format!("github.com:{id}:main")),
        );
        self
    }

    /// Adds a top-level commit event created `at_minute` minutes after the
    /// fixture epoch.
    #[must_use]
    pub fn with_event(self, id: u64, pipeline: u64, at_minute: u32) -> Self {
        self.store.insert_event(
            Event::new(event_id(id), pipeline_id(pipeline))
                .with_sha(fake_sha(id))
                .with_create_time(minute(at_minute)),
        );
        self
    }

    /// Adds an event started from `parent`.
    #[must_use]
    pub fn with_child_event(self, id: u64, pipeline: u64, parent: u64, at_minute: u32) -> Self {
        self.store.insert_event(
            Event::new(event_id(id), pipeline_id(pipeline))
                .with_parent(event_id(parent))
                .with_create_time(minute(at_minute)),
        );
        self
    }

    /// Adds a pull-request event.
    #[must_use]
    pub fn with_pr_event(self, id: u64, pipeline: u64, at_minute: u32) -> Self {
        self.store.insert_event(
            Event::new(event_id(id), pipeline_id(pipeline))
                .with_type(EventType::Pr)
                .with_create_time(minute(at_minute)),
        );
        self
    }

    /// Adds a stage.
    #[must_use]
    pub fn with_stage(self, id: u64, pipeline: u64, event: u64, name: &str) -> Self {
        self.store.insert_stage(Stage::new(
            stage_id(id),
            pipeline_id(pipeline),
            event_id(event),
            name,
        ));
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Returns lookups backed by the store.
    #[must_use]
    pub fn lookups(&self) -> Lookups {
        Lookups::from_store(self.store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EventListQuery, EventLookup, PipelineLookup};

    #[test]
    fn test_example_counts() {
        let fixture = StoreFixture::example();
        assert_eq!(fixture.store().counts(), (2, 4, 4));
    }

    #[tokio::test]
    async fn test_records_carry_scm_uri_and_sha() {
        let store = StoreFixture::example().store();

        let pipeline = PipelineLookup::get(store.as_ref(), pipeline_id(123))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pipeline.scm_uri.as_deref(), Some("github.com:123:main"));

        let query = EventListQuery::latest_top_level(pipeline_id(123));
        let events = EventLookup::list(store.as_ref(), &query).await.unwrap();
        assert_eq!(events[0].sha.len(), 40);
        assert!(events[0].sha.ends_with("22b"));
    }

    #[test]
    #[should_panic(expected = "pipeline id must be non-zero")]
    fn test_zero_id_panics() {
        let _ = pipeline_id(0);
    }
}
