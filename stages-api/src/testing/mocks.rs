//! Lookup doubles for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::core::{Event, Pipeline, PipelineId, Stage};
use crate::errors::StoreError;
use crate::store::{
    EventListQuery, EventLookup, Lookups, PipelineLookup, StageListQuery, StageLookup,
    StoreResult,
};

/// One call observed by [`RecordingLookups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    /// `PipelineLookup::get`.
    GetPipeline(PipelineId),
    /// `EventLookup::list`.
    ListEvents(EventListQuery),
    /// `StageLookup::list`.
    ListStages(StageListQuery),
}

/// Wraps real lookups and records every call, in order.
#[derive(Debug)]
pub struct RecordingLookups {
    inner: Lookups,
    calls: Mutex<Vec<LookupCall>>,
}

impl RecordingLookups {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Lookups) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Returns lookups that route through this recorder.
    #[must_use]
    pub fn lookups(self: &Arc<Self>) -> Lookups {
        Lookups::from_store(Arc::clone(self))
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clears the recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: LookupCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl PipelineLookup for RecordingLookups {
    async fn get(&self, id: PipelineId) -> StoreResult<Option<Pipeline>> {
        self.record(LookupCall::GetPipeline(id));
        self.inner.pipelines.get(id).await
    }
}

#[async_trait]
impl EventLookup for RecordingLookups {
    async fn list(&self, query: &EventListQuery) -> StoreResult<Vec<Event>> {
        self.record(LookupCall::ListEvents(*query));
        self.inner.events.list(query).await
    }
}

#[async_trait]
impl StageLookup for RecordingLookups {
    async fn list(&self, query: &StageListQuery) -> StoreResult<Vec<Stage>> {
        self.record(LookupCall::ListStages(*query));
        self.inner.stages.list(query).await
    }
}

/// A lookup that fails every call with the same error.
#[derive(Debug, Clone)]
pub struct FailingLookup {
    error: StoreError,
}

impl FailingLookup {
    /// Creates a lookup failing with `error`.
    #[must_use]
    pub fn new(error: StoreError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl PipelineLookup for FailingLookup {
    async fn get(&self, _id: PipelineId) -> StoreResult<Option<Pipeline>> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl EventLookup for FailingLookup {
    async fn list(&self, _query: &EventListQuery) -> StoreResult<Vec<Event>> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl StageLookup for FailingLookup {
    async fn list(&self, _query: &StageListQuery) -> StoreResult<Vec<Stage>> {
        Err(self.error.clone())
    }
}
