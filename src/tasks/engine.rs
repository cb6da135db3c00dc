use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::projects::storage::ProjectStore;
use crate::shared::error::ApiError;
use crate::shared::models::Task;

use super::storage::TaskStore;
use super::types::TaskStatus;
use super::worktime;

/// Task rules: caller-gated creation, assignment, and status transitions,
/// plus the work-time aggregation entry points.
pub struct TaskEngine {
    tasks: Arc<dyn TaskStore>,
    projects: Arc<dyn ProjectStore>,
}

impl TaskEngine {
    pub fn new(tasks: Arc<dyn TaskStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self { tasks, projects }
    }

    pub async fn create_task(
        &self,
        title: &str,
        description: Option<String>,
        deadline: DateTime<Utc>,
        project_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Task, ApiError> {
        if title.trim().is_empty() {
            return Err(ApiError::Validation("Task title is required".to_string()));
        }

        if !self.projects.project_owned_by(project_id, caller_id).await? {
            return Err(ApiError::Unauthorized(
                "Project not found or access denied".to_string(),
            ));
        }

        self.tasks
            .create_task(title.to_string(), description, deadline, project_id)
            .await
    }

    /// Assign the task to the caller. Only the project owner may assign,
    /// and the assignee is always the caller performing the assignment.
    pub async fn assign_task_assignee(
        &self,
        task_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Task, ApiError> {
        let (_, project) = self
            .tasks
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        if project.user_id != caller_id {
            return Err(ApiError::Unauthorized(
                "You do not have permission to assign this task".to_string(),
            ));
        }

        self.tasks.update_task_assignee(task_id, caller_id).await
    }

    /// Transition the task status. The assignee and the project owner are
    /// both authorized; `completed_at` is set only on the transition to
    /// completed and cleared otherwise.
    pub async fn update_task_status(
        &self,
        task_id: Uuid,
        caller_id: Uuid,
        new_status: &str,
    ) -> Result<Task, ApiError> {
        let status: TaskStatus = new_status
            .parse()
            .map_err(|_| ApiError::Validation("Invalid task status".to_string()))?;

        let (task, project) = self
            .tasks
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        let is_assignee = task.assigned_to == Some(caller_id);
        let is_owner = project.user_id == caller_id;
        if !is_assignee && !is_owner {
            return Err(ApiError::Unauthorized(
                "You are not authorized to change the status of this task".to_string(),
            ));
        }

        let completed_at = if status == TaskStatus::Completed {
            Some(Utc::now())
        } else {
            None
        };

        self.tasks
            .update_task_status(task_id, status, completed_at)
            .await
    }

    pub async fn find_tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.tasks.find_tasks_by_project(project_id).await
    }

    pub async fn developer_work_time(&self, user_id: Uuid) -> Result<f64, ApiError> {
        let tasks = self.tasks.find_tasks_by_assignee(user_id).await?;
        Ok(worktime::developer_work_time(&tasks, Utc::now()))
    }

    pub async fn developer_work_time_with_filters(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<f64, ApiError> {
        let tasks = self
            .tasks
            .find_tasks_by_assignee_with_filters(user_id, project_id, start_date, end_date)
            .await?;
        Ok(worktime::windowed_work_time(
            &tasks, start_date, end_date, Utc::now(),
        ))
    }

    /// The storage query is by project id alone; the date window is
    /// applied only in the aggregation pass.
    pub async fn total_project_work_time(
        &self,
        project_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<f64, ApiError> {
        let tasks = self.tasks.find_tasks_by_project(project_id).await?;
        Ok(worktime::windowed_work_time(
            &tasks, start_date, end_date, Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::testing::MockProjectStore;
    use crate::tasks::testing::MockTaskStore;
    use chrono::Duration;

    fn engine_with_project() -> (TaskEngine, Arc<MockTaskStore>, Uuid, Uuid) {
        let owner = Uuid::new_v4();
        let (project_store, project_id) = MockProjectStore::with_project(owner);
        let project = project_store.projects.lock().unwrap()[0].clone();

        let task_store = Arc::new(MockTaskStore::new());
        task_store.add_project(project);

        let engine = TaskEngine::new(task_store.clone(), Arc::new(project_store));
        (engine, task_store, project_id, owner)
    }

    #[tokio::test]
    async fn creates_task_in_owned_project() {
        let (engine, _, project_id, owner) = engine_with_project();

        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");

        assert_eq!(task.project_id, project_id);
        assert_eq!(task.status, "created");
        assert!(task.assigned_to.is_none());
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn create_rejects_empty_title_before_ownership() {
        let (engine, _, _, _) = engine_with_project();

        // Unowned project and blank title: validation must win.
        let err = engine
            .create_task("   ", None, Utc::now(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn create_denies_project_not_owned_by_caller() {
        let (engine, _, project_id, _) = engine_with_project();

        let err = engine
            .create_task("Task 1", None, Utc::now(), project_id, Uuid::new_v4())
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn create_denies_unknown_project() {
        let (engine, _, _, owner) = engine_with_project();

        let err = engine
            .create_task("Task 1", None, Utc::now(), Uuid::new_v4(), owner)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn deadline_survives_create_and_lookup() {
        let (engine, store, project_id, owner) = engine_with_project();
        let deadline = Utc::now() + Duration::days(7);

        let task = engine
            .create_task("Task 1", None, deadline, project_id, owner)
            .await
            .expect("task");

        let (fetched, _) = store
            .find_task_by_id(task.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(fetched.deadline, deadline);
    }

    #[tokio::test]
    async fn owner_assigns_task_to_self() {
        let (engine, _, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");

        let updated = engine
            .assign_task_assignee(task.id, owner)
            .await
            .expect("assign");

        assert_eq!(updated.assigned_to, Some(owner));
    }

    #[tokio::test]
    async fn assign_fails_for_missing_task() {
        let (engine, _, _, owner) = engine_with_project();

        let err = engine
            .assign_task_assignee(Uuid::new_v4(), owner)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn assign_denies_non_owner() {
        let (engine, _, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");

        let err = engine
            .assign_task_assignee(task.id, Uuid::new_v4())
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn status_update_rejects_unknown_status() {
        let (engine, _, _, owner) = engine_with_project();

        let err = engine
            .update_task_status(Uuid::new_v4(), owner, "invalid_status")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn status_update_fails_for_missing_task() {
        let (engine, _, _, owner) = engine_with_project();

        let err = engine
            .update_task_status(Uuid::new_v4(), owner, "completed")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn assignee_updates_status() {
        let (engine, _, project_id, owner) = engine_with_project();
        let assignee = owner;
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");
        engine
            .assign_task_assignee(task.id, assignee)
            .await
            .expect("assign");

        let updated = engine
            .update_task_status(task.id, assignee, "in_progress")
            .await
            .expect("status");

        assert_eq!(updated.status, "in_progress");
        assert!(updated.completed_at.is_none());
    }

    #[tokio::test]
    async fn owner_updates_status_of_task_assigned_to_someone_else() {
        let (engine, store, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");
        store.set_assignee(task.id, Uuid::new_v4());

        let updated = engine
            .update_task_status(task.id, owner, "in_progress")
            .await
            .expect("owner may transition");

        assert_eq!(updated.status, "in_progress");
    }

    #[tokio::test]
    async fn status_update_denies_unrelated_caller() {
        let (engine, store, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");
        store.set_assignee(task.id, Uuid::new_v4());

        let err = engine
            .update_task_status(task.id, Uuid::new_v4(), "completed")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn completing_sets_completed_at_and_reopening_clears_it() {
        let (engine, _, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");

        let done = engine
            .update_task_status(task.id, owner, "completed")
            .await
            .expect("complete");
        assert_eq!(done.status, "completed");
        assert!(done.completed_at.is_some());

        let reopened = engine
            .update_task_status(task.id, owner, "in_progress")
            .await
            .expect("reopen");
        assert_eq!(reopened.status, "in_progress");
        assert!(reopened.completed_at.is_none());
    }

    #[tokio::test]
    async fn empty_project_yields_empty_task_list_not_error() {
        let (engine, _, project_id, _) = engine_with_project();

        let tasks = engine
            .find_tasks_by_project(project_id)
            .await
            .expect("list");
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn work_time_is_zero_for_developer_without_tasks() {
        let (engine, _, _, _) = engine_with_project();

        let hours = engine
            .developer_work_time(Uuid::new_v4())
            .await
            .expect("sum");
        assert_eq!(hours, 0.0);

        let hours = engine
            .developer_work_time_with_filters(Uuid::new_v4(), None, None, None)
            .await
            .expect("sum");
        assert_eq!(hours, 0.0);
    }

    #[tokio::test]
    async fn project_work_time_queries_store_by_project_id_alone() {
        let (engine, store, project_id, _) = engine_with_project();
        let start = Some(Utc::now() - Duration::days(1));
        let end = Some(Utc::now() + Duration::days(1));

        let hours = engine
            .total_project_work_time(project_id, start, end)
            .await
            .expect("sum");

        assert_eq!(hours, 0.0);
        assert_eq!(store.project_queries(), vec![project_id]);
    }

    #[tokio::test]
    async fn completed_task_contributes_to_developer_work_time() {
        let (engine, store, project_id, owner) = engine_with_project();
        let task = engine
            .create_task("Task 1", None, Utc::now(), project_id, owner)
            .await
            .expect("task");
        engine
            .assign_task_assignee(task.id, owner)
            .await
            .expect("assign");
        engine
            .update_task_status(task.id, owner, "completed")
            .await
            .expect("complete");

        let hours = engine.developer_work_time(owner).await.expect("sum");
        assert!(hours >= 0.0);

        // Tasks still in `created` state never reach the sum.
        let extra = engine
            .create_task("Task 2", None, Utc::now(), project_id, owner)
            .await
            .expect("task");
        store.set_assignee(extra.id, owner);
        let again = engine.developer_work_time(owner).await.expect("sum");
        assert!((again - hours).abs() < 0.01);
    }
}
