//! Request validation for the stage listing route.
//!
//! Everything here runs before any lookup; a rejected request never reaches
//! the handler.

mod pagination;

pub use pagination::{Pagination, MAX_COUNT, MAX_SORT_BY_LEN};

use crate::core::PipelineId;
use crate::errors::{ApiError, ApiResult};

/// Validates the `id` path parameter.
pub fn parse_pipeline_id(raw: &str) -> ApiResult<PipelineId> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("\"id\" must be a positive integer"))
}
