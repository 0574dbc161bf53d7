//! Query types passed to the lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Event, EventId, EventType, PipelineId};

/// Sort direction, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

/// Page window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginate {
    /// One-based page number.
    pub page: usize,
    /// Page size.
    pub count: usize,
    /// Sort direction.
    #[serde(default)]
    pub sort: SortOrder,
}

impl Default for Paginate {
    fn default() -> Self {
        Self {
            page: 1,
            count: 50,
            sort: SortOrder::Descending,
        }
    }
}

impl Paginate {
    /// First page of the given size, newest first.
    #[must_use]
    pub fn first(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Number of records skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.count)
    }
}

/// Constraint on an event's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentFilter {
    /// Any parent, or none.
    #[default]
    Any,
    /// Only events without a parent.
    Absent,
    /// Only events started from the given event.
    Equals(EventId),
}

impl ParentFilter {
    /// Returns true if `parent` satisfies the filter.
    #[must_use]
    pub fn matches(&self, parent: Option<EventId>) -> bool {
        match self {
            Self::Any => true,
            Self::Absent => parent.is_none(),
            Self::Equals(id) => parent == Some(*id),
        }
    }
}

/// Field filter for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    /// Owning pipeline.
    pub pipeline_id: PipelineId,
    /// Parent constraint.
    pub parent_event_id: ParentFilter,
    /// Trigger type constraint.
    pub event_type: Option<EventType>,
}

impl EventFilter {
    /// All events of a pipeline.
    #[must_use]
    pub fn for_pipeline(pipeline_id: PipelineId) -> Self {
        Self {
            pipeline_id,
            parent_event_id: ParentFilter::Any,
            event_type: None,
        }
    }

    /// Parentless, commit-triggered events of a pipeline.
    #[must_use]
    pub fn top_level(pipeline_id: PipelineId) -> Self {
        Self {
            pipeline_id,
            parent_event_id: ParentFilter::Absent,
            event_type: Some(EventType::Pipeline),
        }
    }

    /// Returns true if `event` passes every constraint.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        event.pipeline_id == self.pipeline_id
            && self.parent_event_id.matches(event.parent_event_id)
            && self.event_type.map_or(true, |t| event.event_type == t)
    }
}

/// An event listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventListQuery {
    /// Which events.
    pub params: EventFilter,
    /// Which window of them.
    pub paginate: Option<Paginate>,
}

impl EventListQuery {
    /// The single most recent top-level event of a pipeline.
    #[must_use]
    pub fn latest_top_level(pipeline_id: PipelineId) -> Self {
        Self {
            params: EventFilter::top_level(pipeline_id),
            paginate: Some(Paginate::first(1)),
        }
    }
}

/// A stage listing request, always scoped to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageListQuery {
    /// Owning pipeline.
    pub pipeline_id: PipelineId,
    /// Event the stages belong to.
    pub event_id: EventId,
}

impl StageListQuery {
    /// Creates a stage query.
    #[must_use]
    pub fn new(pipeline_id: PipelineId, event_id: EventId) -> Self {
        Self {
            pipeline_id,
            event_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_top_level_query() {
        let pipeline_id = PipelineId::new(123).unwrap();
        let query = EventListQuery::latest_top_level(pipeline_id);

        assert_eq!(query.params.pipeline_id, pipeline_id);
        assert_eq!(query.params.parent_event_id, ParentFilter::Absent);
        assert_eq!(query.params.event_type, Some(EventType::Pipeline));
        assert_eq!(query.paginate.map(|p| p.count), Some(1));
        assert_eq!(query.paginate.map(|p| p.sort), Some(SortOrder::Descending));
    }

    #[test]
    fn test_parent_filter_matches() {
        let id = EventId::new(5).unwrap();
        let other = EventId::new(6).unwrap();

        assert!(ParentFilter::Any.matches(None));
        assert!(ParentFilter::Any.matches(Some(id)));
        assert!(ParentFilter::Absent.matches(None));
        assert!(!ParentFilter::Absent.matches(Some(id)));
        assert!(ParentFilter::Equals(id).matches(Some(id)));
        assert!(!ParentFilter::Equals(id).matches(Some(other)));
        assert!(!ParentFilter::Equals(id).matches(None));
    }

    #[test]
    fn test_top_level_filter_matches() {
        let pipeline_id = PipelineId::new(2).unwrap();
        let filter = EventFilter::top_level(pipeline_id);
        let event = Event::new(EventId::new(1).unwrap(), pipeline_id);

        assert!(filter.matches(&event));
        assert!(!filter.matches(&event.clone().with_parent(EventId::new(9).unwrap())));
        assert!(!filter.matches(&event.clone().with_type(EventType::Pr)));
        assert!(!filter.matches(&Event::new(
            EventId::new(1).unwrap(),
            PipelineId::new(3).unwrap()
        )));
        assert!(EventFilter::for_pipeline(pipeline_id).matches(&event.with_type(EventType::Pr)));
    }

    #[test]
    fn test_paginate_offset() {
        assert_eq!(Paginate::first(10).offset(), 0);
        let page3 = Paginate {
            page: 3,
            count: 10,
            sort: SortOrder::Ascending,
        };
        assert_eq!(page3.offset(), 20);
    }
}
