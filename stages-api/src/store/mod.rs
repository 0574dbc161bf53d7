//! Lookup collaborators for pipelines, events and stages.
//!
//! The handler only ever reads through these traits. Implementations own
//! storage, consistency and timeouts.

mod memory;
mod query;

pub use memory::{MemoryStore, Seed, SeedError};
pub use query::{EventFilter, EventListQuery, Paginate, ParentFilter, SortOrder, StageListQuery};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::core::{Event, Pipeline, PipelineId, Stage};
use crate::errors::StoreError;

/// Result alias for lookups.
pub type StoreResult<T> = Result<T, StoreError>;

/// Resolves pipeline identifiers to pipeline records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PipelineLookup: Send + Sync {
    /// Returns the pipeline, or `None` if it does not exist.
    async fn get(&self, id: PipelineId) -> StoreResult<Option<Pipeline>>;
}

/// Lists events matching a filter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLookup: Send + Sync {
    /// Returns matching events, most recent first unless the query says
    /// otherwise.
    async fn list(&self, query: &EventListQuery) -> StoreResult<Vec<Event>>;
}

/// Lists stages scoped to one event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageLookup: Send + Sync {
    /// Returns the stages of the queried event in store order.
    async fn list(&self, query: &StageListQuery) -> StoreResult<Vec<Stage>>;
}

/// The three lookups, injected together.
#[derive(Clone)]
pub struct Lookups {
    /// Pipeline lookup.
    pub pipelines: Arc<dyn PipelineLookup>,
    /// Event lookup.
    pub events: Arc<dyn EventLookup>,
    /// Stage lookup.
    pub stages: Arc<dyn StageLookup>,
}

impl fmt::Debug for Lookups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookups").finish_non_exhaustive()
    }
}

impl Lookups {
    /// Bundles three independent lookups.
    #[must_use]
    pub fn new(
        pipelines: Arc<dyn PipelineLookup>,
        events: Arc<dyn EventLookup>,
        stages: Arc<dyn StageLookup>,
    ) -> Self {
        Self {
            pipelines,
            events,
            stages,
        }
    }

    /// Uses one store for all three lookups.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PipelineLookup + EventLookup + StageLookup + 'static,
    {
        Self {
            pipelines: store.clone(),
            events: store.clone(),
            stages: store,
        }
    }
}
