//! Shared pagination query contract, with free-text search forbidden.

use std::collections::HashSet;

use crate::errors::{ApiError, ApiResult};
use crate::store::SortOrder;

/// Largest accepted page size.
pub const MAX_COUNT: usize = 50;

/// Longest accepted `sortBy` value, in characters.
pub const MAX_SORT_BY_LEN: usize = 100;

/// Validated pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// One-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub count: Option<usize>,
    /// Sort direction.
    pub sort: SortOrder,
    /// Field to sort by.
    pub sort_by: Option<String>,
    /// Whether the caller asked for a total count.
    pub get_count: bool,
}

impl Pagination {
    /// Validates raw query pairs.
    ///
    /// Unknown keys, repeated keys and `search` are rejected.
    pub fn from_pairs(pairs: &[(String, String)]) -> ApiResult<Self> {
        let mut seen = HashSet::new();
        let mut pagination = Self::default();

        for (key, value) in pairs {
            if !seen.insert(key.as_str()) {
                return Err(ApiError::bad_request(format!(
                    "\"{key}\" must be a single value"
                )));
            }

            match key.as_str() {
                "page" => pagination.page = Some(parse_page(value)?),
                "count" => pagination.count = Some(parse_count(value)?),
                "sort" => pagination.sort = parse_sort(value)?,
                "sortBy" => pagination.sort_by = Some(parse_sort_by(value)?),
                "getCount" => pagination.get_count = parse_bool(key, value)?,
                _ => {
                    return Err(ApiError::bad_request(format!("\"{key}\" is not allowed")));
                }
            }
        }

        Ok(pagination)
    }
}

fn parse_page(value: &str) -> ApiResult<usize> {
    match value.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::bad_request(
            "\"page\" must be greater than or equal to 1",
        )),
    }
}

fn parse_count(value: &str) -> ApiResult<usize> {
    match value.parse::<usize>() {
        Ok(count) if (1..=MAX_COUNT).contains(&count) => Ok(count),
        _ => Err(ApiError::bad_request(format!(
            "\"count\" must be between 1 and {MAX_COUNT}"
        ))),
    }
}

fn parse_sort(value: &str) -> ApiResult<SortOrder> {
    match value.to_ascii_lowercase().as_str() {
        "ascending" => Ok(SortOrder::Ascending),
        "descending" => Ok(SortOrder::Descending),
        _ => Err(ApiError::bad_request(
            "\"sort\" must be one of [ascending, descending]",
        )),
    }
}

fn parse_sort_by(value: &str) -> ApiResult<String> {
    if value.is_empty() {
        return Err(ApiError::bad_request(
            "\"sortBy\" is not allowed to be empty",
        ));
    }
    if value.chars().count() > MAX_SORT_BY_LEN {
        return Err(ApiError::bad_request(format!(
            "\"sortBy\" length must be less than or equal to {MAX_SORT_BY_LEN} characters long"
        )));
    }
    Ok(value.to_string())
}

fn parse_bool(key: &str, value: &str) -> ApiResult<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ApiError::bad_request(format!("\"{key}\" must be a boolean")))
    }
}
