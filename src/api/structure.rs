//! Org structure API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{OrgStructure, RevisionInfo, StaffingRow, StructureView};
use crate::AppState;

/// Query parameters for `GET /api/org-structure`.
#[derive(Debug, Deserialize)]
pub struct StructureQuery {
    #[serde(default)]
    pub view: Option<String>,
}

/// Either the full structure or the flat rows of a row view.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StructurePayload {
    Full(OrgStructure),
    Rows(Vec<StaffingRow>),
}

/// GET /api/org-structure - Divisions, departments, roles and coordinators,
/// or staffing rows when `view=functional|paygrade`.
pub async fn get_org_structure(
    State(state): State<AppState>,
    Query(params): Query<StructureQuery>,
) -> ApiResult<StructurePayload> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(view) = params.view.as_deref().filter(|v| !v.is_empty()) else {
        return match state.repo.get_org_structure().await {
            Ok(structure) => success(StructurePayload::Full(structure), revision_id),
            Err(e) => error(e, revision_id),
        };
    };

    let Some(view) = StructureView::parse(view) else {
        return error(
            AppError::BadRequest(format!("Unknown structure view '{}'", view)),
            revision_id,
        );
    };

    match state.repo.list_staffing(view).await {
        Ok(rows) => success(StructurePayload::Rows(rows), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/org-structure/revision - Current revision for staleness checks.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| crate::errors::AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    success(revision_info.clone(), revision_info.revision_id)
}

/// Result of seeding the default structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResult {
    pub departments_created: usize,
}

/// POST /api/org-structure/setup - Seed the default hospital structure.
pub async fn setup_structure(State(state): State<AppState>) -> ApiResult<SetupResult> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.setup_default_structure().await {
        Ok(departments_created) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(SetupResult { departments_created }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
