//! Employee API endpoints.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::Employee;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeQuery {
    pub department_id: Option<i64>,
}

/// GET /api/employees?department_id= - Employees assigned to a department.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeQuery>,
) -> ApiResult<Vec<Employee>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(department_id) = params.department_id else {
        return error(
            AppError::BadRequest("department_id is required".to_string()),
            revision_id,
        );
    };

    match state.repo.list_employees(department_id).await {
        Ok(employees) => success(employees, revision_id),
        Err(e) => error(e, revision_id),
    }
}
