//! HMO benefits endpoints (read side).

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::models::{HmoPlan, HmoSummary};
use crate::AppState;

/// GET /api/hmo/plans
pub async fn list_hmo_plans(State(state): State<AppState>) -> ApiResult<Vec<HmoPlan>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_plans().await {
        Ok(plans) => success(plans, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/hmo/summary - Enrollment and claim counts grouped by status.
pub async fn hmo_summary(State(state): State<AppState>) -> ApiResult<HmoSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.hmo_summary().await {
        Ok(summary) => success(summary, revision_id),
        Err(e) => error(e, revision_id),
    }
}
