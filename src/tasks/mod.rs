pub mod engine;
pub mod handlers;
pub mod storage;
pub mod types;
pub mod worktime;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use engine::TaskEngine;
pub use storage::{DieselTaskStore, TaskStore};
pub use types::TaskStatus;

pub fn configure_task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks/create", post(handlers::handle_task_create))
        .route("/tasks/assign", put(handlers::handle_task_assign))
        .route("/tasks/status", put(handlers::handle_task_status_update))
        .route("/tasks/worktime", get(handlers::handle_developer_work_time))
        .route(
            "/tasks/worktime/filtered",
            get(handlers::handle_developer_work_time_filtered),
        )
        .route(
            "/projects/{id}/tasks",
            get(handlers::handle_project_tasks),
        )
        .route(
            "/projects/{id}/worktime",
            get(handlers::handle_project_work_time),
        )
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::shared::error::ApiError;
    use crate::shared::models::{Project, Task};

    use super::storage::TaskStore;
    use super::types::TaskStatus;

    /// In-memory stand-in for the task storage gateway. Parent projects are
    /// registered explicitly so lookups can emulate the join.
    pub struct MockTaskStore {
        tasks: Mutex<Vec<Task>>,
        projects: Mutex<Vec<Project>>,
        project_queries: Mutex<Vec<Uuid>>,
    }

    impl MockTaskStore {
        pub fn new() -> Self {
            Self {
                tasks: Mutex::new(vec![]),
                projects: Mutex::new(vec![]),
                project_queries: Mutex::new(vec![]),
            }
        }

        pub fn add_project(&self, project: Project) {
            self.projects.lock().unwrap().push(project);
        }

        pub fn set_assignee(&self, task_id: Uuid, user_id: Uuid) {
            let mut tasks = self.tasks.lock().unwrap();
            if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
                task.assigned_to = Some(user_id);
            }
        }

        pub fn project_queries(&self) -> Vec<Uuid> {
            self.project_queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskStore for MockTaskStore {
        async fn create_task(
            &self,
            title: String,
            description: Option<String>,
            deadline: DateTime<Utc>,
            project_id: Uuid,
        ) -> Result<Task, ApiError> {
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
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn find_task_by_id(
            &self,
            task_id: Uuid,
        ) -> Result<Option<(Task, Project)>, ApiError> {
            let task = match self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == task_id)
                .cloned()
            {
                Some(task) => task,
                None => return Ok(None),
            };
            let project = self
                .projects
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == task.project_id)
                .cloned();
            Ok(project.map(|p| (task, p)))
        }

        async fn find_tasks_by_project(
            &self,
            project_id: Uuid,
        ) -> Result<Vec<Task>, ApiError> {
            self.project_queries.lock().unwrap().push(project_id);
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.project_id == project_id)
                .cloned()
                .collect())
        }

        async fn update_task_assignee(
            &self,
            task_id: Uuid,
            user_id: Uuid,
        ) -> Result<Task, ApiError> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
            task.assigned_to = Some(user_id);
            task.updated_at = Some(Utc::now());
            Ok(task.clone())
        }

        async fn update_task_status(
            &self,
            task_id: Uuid,
            status: TaskStatus,
            completed_at: Option<DateTime<Utc>>,
        ) -> Result<Task, ApiError> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
            task.status = status.as_str().to_string();
            task.completed_at = completed_at;
            task.updated_at = Some(Utc::now());
            Ok(task.clone())
        }

        async fn find_tasks_by_assignee(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    t.assigned_to == Some(user_id)
                        && (t.status == "in_progress" || t.status == "completed")
                })
                .cloned()
                .collect())
        }

        async fn find_tasks_by_assignee_with_filters(
            &self,
            user_id: Uuid,
            project_id: Option<Uuid>,
            created_from: Option<DateTime<Utc>>,
            created_to: Option<DateTime<Utc>>,
        ) -> Result<Vec<Task>, ApiError> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.assigned_to == Some(user_id))
                .filter(|t| project_id.map_or(true, |p| t.project_id == p))
                .filter(|t| created_from.map_or(true, |from| t.created_at >= from))
                .filter(|t| created_to.map_or(true, |to| t.created_at <= to))
                .cloned()
                .collect())
        }
    }
}
