//! Hospital HRIS backend
//!
//! Department hierarchy builder, org chart renderer and a REST backend with SQLite
//! persistence for the organizational structure and HMO records.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod hierarchy;
pub mod interaction;
pub mod models;
pub mod paygrade;
pub mod render;
pub mod views;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Org structure
        .route("/org-structure", get(api::get_org_structure))
        .route("/org-structure/revision", get(api::get_revision))
        .route("/org-structure/setup", post(api::setup_structure))
        // Departments
        .route("/departments", post(api::create_department))
        .route("/departments/reorder", post(api::reorder_departments))
        .route("/departments/{id}", put(api::update_department))
        .route("/departments/{id}/subtree", get(api::get_department_subtree))
        // Employees
        .route("/employees", get(api::list_employees))
        // HMO
        .route("/hmo/plans", get(api::list_hmo_plans))
        .route("/hmo/summary", get(api::hmo_summary));

    // Rendered pages
    let page_routes = Router::new()
        .route("/org", get(api::org_page))
        .route("/org/{view}", get(api::org_view_page))
        .route("/org/departments/{id}/{action}", get(api::department_action));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
