//! `GET /pipelines/{id}/stages`: stages of a pipeline's latest commit event.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::core::{PipelineId, StageRecord};
use crate::errors::{ApiError, ApiResult};
use crate::server::AppState;
use crate::store::{EventListQuery, Lookups, StageListQuery};
use crate::validation::{parse_pipeline_id, Pagination};

/// Resolves a pipeline's latest top-level event and lists its stages.
///
/// Lookups run strictly in sequence and the first failure ends the request.
/// The handler holds no state of its own beyond the injected lookups.
#[derive(Debug, Clone)]
pub struct StageListHandler {
    lookups: Lookups,
}

impl StageListHandler {
    /// Creates a handler over the given lookups.
    #[must_use]
    pub fn new(lookups: Lookups) -> Self {
        Self { lookups }
    }

    /// Lists the serialized stages of the pipeline's latest top-level event.
    ///
    /// Pagination has already been validated; it is accepted for the route
    /// contract but the stage query is never windowed.
    ///
    /// # Errors
    ///
    /// Not-found when the pipeline or its latest event is missing; any
    /// lookup failure is returned unchanged.
    #[instrument(
        name = "list_stages",
        skip(self, pipeline_id, pagination),
        fields(pipeline_id = %pipeline_id)
    )]
    pub async fn list(
        &self,
        pipeline_id: PipelineId,
        pagination: Option<&Pagination>,
    ) -> ApiResult<Vec<StageRecord>> {
        let started = Instant::now();
        debug!(?pagination, "Looking up pipeline");

        if self.lookups.pipelines.get(pipeline_id).await?.is_none() {
            return Err(ApiError::pipeline_not_found(pipeline_id));
        }

        let events = self
            .lookups
            .events
            .list(&EventListQuery::latest_top_level(pipeline_id))
            .await?;
        let latest = events
            .first()
            .ok_or_else(|| ApiError::latest_event_not_found(pipeline_id))?;
        debug!(event_id = %latest.id, "Resolved latest event");

        let stages = self
            .lookups
            .stages
            .list(&StageListQuery::new(pipeline_id, latest.id))
            .await?;

        let records: Vec<StageRecord> = stages.iter().map(|s| s.to_record()).collect();
        info!(
            event_id = %latest.id,
            stage_count = records.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Listed stages"
        );
        Ok(records)
    }
}

/// Axum adapter: validates the path and query, then runs the handler.
pub async fn list_stages(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Vec<StageRecord>>> {
    let Path(raw_id) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Query(pairs) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let pipeline_id = parse_pipeline_id(&raw_id)?;
    let pagination = Pagination::from_pairs(&pairs)?;

    let records = state.stages.list(pipeline_id, Some(&pagination)).await?;
    Ok(Json(records))
}
