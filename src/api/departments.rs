//! Department API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::hierarchy::DepartmentNode;
use crate::models::{Department, DepartmentForm, ReorderRequest};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub message: String,
}

fn validate_form(form: &DepartmentForm) -> Result<(), AppError> {
    if form.department_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Department name is required".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/departments - Create a department.
pub async fn create_department(
    State(state): State<AppState>,
    Json(form): Json<DepartmentForm>,
) -> ApiResult<Department> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate_form(&form) {
        return error(e, revision_id);
    }

    match state.repo.create_department(&form).await {
        Ok(department) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(department, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/departments/:id - Update a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<DepartmentForm>,
) -> ApiResult<Department> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate_form(&form) {
        return error(e, revision_id);
    }

    match state.repo.update_department(id, &form).await {
        Ok(department) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(department, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/departments/reorder - Move departments under new parents.
pub async fn reorder_departments(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> ApiResult<ReorderResult> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if body.moves.is_empty() {
        return error(
            AppError::Validation("No moves provided".to_string()),
            revision_id,
        );
    }

    match state
        .repo
        .reorder_departments(&body.moves, body.expected_revision)
        .await
    {
        Ok(new_revision) => success(
            ReorderResult {
                message: format!("Moved {} department(s)", body.moves.len()),
            },
            new_revision,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/departments/:id/subtree - A department with all of its descendants.
pub async fn get_department_subtree(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DepartmentNode> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let forest = match state.repo.department_forest().await {
        Ok(forest) => forest,
        Err(e) => return error(e, revision_id),
    };

    match forest.find(id) {
        Some(node) => success(node.clone(), revision_id),
        None => error(
            AppError::NotFound(format!("Department {} not found", id)),
            revision_id,
        ),
    }
}
