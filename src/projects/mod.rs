pub mod engine;
pub mod handlers;
pub mod storage;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use engine::ProjectEngine;
pub use storage::{DieselProjectStore, ProjectStore};

pub fn configure_project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects/create", post(handlers::handle_project_create))
        .route("/projects/list", get(handlers::handle_project_list))
}
