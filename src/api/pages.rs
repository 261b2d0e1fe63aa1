//! Server-rendered org structure pages.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};

use crate::errors::{AppError, AppErrorWithRevision};
use crate::interaction::{handle_action, ActionError, ActionOutput, TreeAction};
use crate::views::{self, View, ViewState};
use crate::AppState;

/// GET /org - The hierarchy tab.
pub async fn org_page(State(state): State<AppState>) -> Response {
    render_page(&state, View::Hierarchy.as_str()).await
}

/// GET /org/:view - Any of the structure tabs.
pub async fn org_view_page(State(state): State<AppState>, Path(view): Path<String>) -> Response {
    render_page(&state, &view).await
}

/// GET /org/departments/:id/:action - Details panel, employee list or subtree export.
pub async fn department_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(i64, String)>,
) -> Response {
    let Some(action) = TreeAction::from_name(&action, id) else {
        return page_error(&state, AppError::NotFound(format!("Unknown action '{}'", action)))
            .await;
    };

    let forest = match state.repo.department_forest().await {
        Ok(forest) => forest,
        Err(e) => return page_error(&state, e).await,
    };

    match handle_action(action, &forest, state.repo.as_ref()).await {
        Ok(ActionOutput::Panel(html)) => Html(html).into_response(),
        Ok(ActionOutput::Download { file_name, json }) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            json,
        )
            .into_response(),
        Err(e @ ActionError::UnknownDepartment(_)) => {
            page_error(&state, AppError::NotFound(e.to_string())).await
        }
        Err(e) => page_error(&state, AppError::Internal(e.to_string())).await,
    }
}

async fn render_page(state: &AppState, view: &str) -> Response {
    match views::show(ViewState::default(), view, state.repo.as_ref()).await {
        Ok((_, body)) => Html(page(&body)).into_response(),
        Err(e) => page_error(state, AppError::NotFound(e.to_string())).await,
    }
}

async fn page_error(state: &AppState, error: AppError) -> Response {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    AppErrorWithRevision { error, revision_id }.into_response()
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Organizational Structure</title></head><body><main id=\"org-structure\">{}</main></body></html>",
        body
    )
}
