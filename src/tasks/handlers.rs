use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::middleware::AuthenticatedUser;
use crate::shared::error::ApiError;
use crate::shared::models::Task;
use crate::shared::state::AppState;

use super::types::{
    AssignTaskRequest, CreateTaskRequest, DeveloperWorkTimeResponse, ProjectWorkTimeResponse,
    UpdateTaskStatusRequest, WorkTimeFilterQuery, WorkTimeWindowQuery,
};

pub async fn handle_task_create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .task_engine
        .create_task(
            &req.title,
            req.description,
            req.deadline,
            req.project_id,
            user.user_id,
        )
        .await?;

    log::info!("Task created successfully: ID={}", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn handle_task_assign(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<AssignTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .task_engine
        .assign_task_assignee(req.task_id, user.user_id)
        .await?;

    log::info!(
        "Task successfully assigned to user: TaskID={}, UserID={}",
        task.id,
        user.user_id
    );
    Ok(Json(task))
}

pub async fn handle_task_status_update(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .task_engine
        .update_task_status(req.task_id, user.user_id, &req.status)
        .await?;

    log::info!(
        "Task status updated successfully: ID={}, Status={}",
        task.id,
        task.status
    );
    Ok(Json(task))
}

pub async fn handle_developer_work_time(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DeveloperWorkTimeResponse>, ApiError> {
    let total = state.task_engine.developer_work_time(user.user_id).await?;

    Ok(Json(DeveloperWorkTimeResponse {
        user_id: user.user_id,
        total_work_time: total,
    }))
}

pub async fn handle_developer_work_time_filtered(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<WorkTimeFilterQuery>,
) -> Result<Json<DeveloperWorkTimeResponse>, ApiError> {
    let total = state
        .task_engine
        .developer_work_time_with_filters(
            user.user_id,
            query.project_id,
            query.start_date,
            query.end_date,
        )
        .await?;

    Ok(Json(DeveloperWorkTimeResponse {
        user_id: user.user_id,
        total_work_time: total,
    }))
}

pub async fn handle_project_tasks(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.task_engine.find_tasks_by_project(project_id).await?;
    Ok(Json(tasks))
}

pub async fn handle_project_work_time(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<WorkTimeWindowQuery>,
) -> Result<Json<ProjectWorkTimeResponse>, ApiError> {
    let total = state
        .task_engine
        .total_project_work_time(project_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(ProjectWorkTimeResponse {
        project_id,
        total_work_time: total,
    }))
}
