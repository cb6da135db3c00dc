use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::core::middleware::AuthenticatedUser;
use crate::shared::error::ApiError;
use crate::shared::models::Project;
use crate::shared::state::AppState;

use super::types::{CreateProjectRequest, ProjectWithTasks};

pub async fn handle_project_create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state
        .project_engine
        .create_project(&req.title, req.description, user.user_id)
        .await?;

    log::info!("Project created successfully: ID={}", project.id);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn handle_project_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ProjectWithTasks>>, ApiError> {
    let projects = state
        .project_engine
        .find_projects_with_tasks(user.user_id)
        .await?;

    Ok(Json(projects))
}
