use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::schema::{projects, tasks};
use crate::shared::models::{Project, Task};
use crate::shared::utils::DbPool;

use super::types::TaskStatus;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(
        &self,
        title: String,
        description: Option<String>,
        deadline: DateTime<Utc>,
        project_id: Uuid,
    ) -> Result<Task, ApiError>;

    /// Task together with its parent project, or None.
    async fn find_task_by_id(&self, task_id: Uuid)
        -> Result<Option<(Task, Project)>, ApiError>;

    async fn find_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError>;

    async fn update_task_assignee(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, ApiError>;

    async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Task, ApiError>;

    /// Tasks assigned to the user that are in progress or completed.
    async fn find_tasks_by_assignee(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError>;

    async fn find_tasks_by_assignee_with_filters(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Task>, ApiError>;
}

pub struct DieselTaskStore {
    pool: DbPool,
}

impl DieselTaskStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_update_error(e: diesel::result::Error) -> ApiError {
    match e {
        diesel::result::Error::NotFound => ApiError::NotFound("Task not found".to_string()),
        e => ApiError::Database(e.to_string()),
    }
}

#[async_trait]
impl TaskStore for DieselTaskStore {
    async fn create_task(
        &self,
        title: String,
        description: Option<String>,
        deadline: DateTime<Utc>,
        project_id: Uuid,
    ) -> Result<Task, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let task = Task {
                id: Uuid::new_v4(),
                title,
                description,
                deadline,
                project_id,
                status: TaskStatus::Created.as_str().to_string(),
                assigned_to: None,
                created_at: Utc::now(),
                updated_at: None,
                completed_at: None,
            };

            diesel::insert_into(tasks::table)
                .values(&task)
                .get_result(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_task_by_id(
        &self,
        task_id: Uuid,
    ) -> Result<Option<(Task, Project)>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            tasks::table
                .inner_join(projects::table)
                .filter(tasks::id.eq(task_id))
                .first::<(Task, Project)>(&mut conn)
                .optional()
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            tasks::table
                .filter(tasks::project_id.eq(project_id))
                .order(tasks::created_at.desc())
                .load::<Task>(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn update_task_assignee(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Task, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            diesel::update(tasks::table.find(task_id))
                .set((
                    tasks::assigned_to.eq(Some(user_id)),
                    tasks::updated_at.eq(Some(Utc::now())),
                ))
                .get_result(&mut conn)
                .map_err(map_update_error)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Task, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            diesel::update(tasks::table.find(task_id))
                .set((
                    tasks::status.eq(status.as_str()),
                    tasks::completed_at.eq(completed_at),
                    tasks::updated_at.eq(Some(Utc::now())),
                ))
                .get_result(&mut conn)
                .map_err(map_update_error)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_tasks_by_assignee(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            tasks::table
                .filter(tasks::assigned_to.eq(user_id))
                .filter(tasks::status.eq_any(vec![
                    TaskStatus::InProgress.as_str(),
                    TaskStatus::Completed.as_str(),
                ]))
                .load::<Task>(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_tasks_by_assignee_with_filters(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Task>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let mut query = tasks::table
                .filter(tasks::assigned_to.eq(user_id))
                .into_boxed();

            if let Some(project_id) = project_id {
                query = query.filter(tasks::project_id.eq(project_id));
            }
            if let Some(from) = created_from {
                query = query.filter(tasks::created_at.ge(from));
            }
            if let Some(to) = created_to {
                query = query.filter(tasks::created_at.le(to));
            }

            query
                .load::<Task>(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}
