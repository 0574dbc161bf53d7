//! Test assertions for handler results.

use crate::core::StageRecord;
use crate::errors::ApiError;

/// Asserts that the error is a not-found with the given message.
pub fn assert_not_found(err: &ApiError, expected_message: &str) {
    assert!(
        matches!(err, ApiError::NotFound(_)),
        "Expected not-found, got: {err:?}"
    );
    assert_eq!(
        err.to_string(),
        expected_message,
        "Unexpected not-found message"
    );
}

/// Asserts the stage names, in order.
pub fn assert_stage_names(records: &[StageRecord], expected: &[&str]) {
    let actual: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(actual, expected, "Stage names differ");
}

/// Asserts the stage ids, in order.
pub fn assert_stage_ids(records: &[StageRecord], expected: &[u64]) {
    let actual: Vec<u64> = records.iter().map(|r| r.id.get()).collect();
    assert_eq!(actual, expected, "Stage ids differ");
}
