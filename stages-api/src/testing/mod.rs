//! Testing utilities for the stages API.
//!
//! This module provides:
//! - A populated in-memory store fixture
//! - Recording and failing lookup doubles
//! - Assertions on handler results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_not_found, assert_stage_ids, assert_stage_names};
pub use fixtures::{event_id, pipeline_id, stage_id, StoreFixture};
pub use mocks::{FailingLookup, LookupCall, RecordingLookups};
