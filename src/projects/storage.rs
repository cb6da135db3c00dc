use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::schema::{projects, tasks, users};
use crate::shared::models::{Project, Task};
use crate::shared::utils::DbPool;

use super::types::{ProjectWithTasks, TaskSummary};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(
        &self,
        title: String,
        description: Option<String>,
        owner_id: Uuid,
    ) -> Result<Project, ApiError>;

    async fn find_projects_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, ApiError>;

    async fn find_projects_with_tasks(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ProjectWithTasks>, ApiError>;

    /// Direct ownership predicate: does `project_id` belong to `owner_id`?
    async fn project_owned_by(&self, project_id: Uuid, owner_id: Uuid) -> Result<bool, ApiError>;
}

pub struct DieselProjectStore {
    pool: DbPool,
}

impl DieselProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for DieselProjectStore {
    async fn create_project(
        &self,
        title: String,
        description: Option<String>,
        owner_id: Uuid,
    ) -> Result<Project, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let project = Project {
                id: Uuid::new_v4(),
                title,
                description,
                user_id: owner_id,
                created_at: Utc::now(),
            };

            diesel::insert_into(projects::table)
                .values(&project)
                .get_result(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_projects_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            projects::table
                .filter(projects::user_id.eq(owner_id))
                .order(projects::created_at.desc())
                .load::<Project>(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_projects_with_tasks(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ProjectWithTasks>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let owned: Vec<Project> = projects::table
                .filter(projects::user_id.eq(owner_id))
                .order(projects::created_at.desc())
                .load(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))?;

            let mut result = Vec::with_capacity(owned.len());
            for project in owned {
                let project_tasks: Vec<Task> = tasks::table
                    .filter(tasks::project_id.eq(project.id))
                    .load(&mut conn)
                    .unwrap_or_default();

                let summaries = project_tasks
                    .into_iter()
                    .map(|task| {
                        let assignee = task.assigned_to.and_then(|uid| {
                            users::table
                                .find(uid)
                                .select(users::name)
                                .first::<String>(&mut conn)
                                .ok()
                        });
                        TaskSummary {
                            id: task.id,
                            title: task.title,
                            status: task.status,
                            assigned_to: task.assigned_to,
                            assignee,
                        }
                    })
                    .collect();

                result.push(ProjectWithTasks {
                    id: project.id,
                    title: project.title,
                    description: project.description,
                    user_id: project.user_id,
                    created_at: project.created_at,
                    tasks: summaries,
                });
            }

            Ok(result)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn project_owned_by(&self, project_id: Uuid, owner_id: Uuid) -> Result<bool, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let count: i64 = projects::table
                .filter(projects::id.eq(project_id))
                .filter(projects::user_id.eq(owner_id))
                .count()
                .get_result(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))?;

            Ok(count > 0)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}
