use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::Project;

use super::storage::ProjectStore;
use super::types::ProjectWithTasks;

/// Project rules: title validation and exclusive creator ownership.
pub struct ProjectEngine {
    projects: Arc<dyn ProjectStore>,
}

impl ProjectEngine {
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self { projects }
    }

    pub async fn create_project(
        &self,
        title: &str,
        description: Option<String>,
        caller_id: Uuid,
    ) -> Result<Project, ApiError> {
        if title.trim().is_empty() {
            return Err(ApiError::Validation(
                "Project title is required".to_string(),
            ));
        }

        self.projects
            .create_project(title.to_string(), description, caller_id)
            .await
    }

    pub async fn find_projects_with_tasks(
        &self,
        caller_id: Uuid,
    ) -> Result<Vec<ProjectWithTasks>, ApiError> {
        self.projects.find_projects_with_tasks(caller_id).await
    }
}
