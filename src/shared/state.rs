use std::sync::Arc;

use crate::config::AppConfig;
use crate::projects::engine::ProjectEngine;
use crate::shared::utils::DbPool;
use crate::tasks::engine::TaskEngine;
use crate::users::UserService;

pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    pub user_service: Arc<UserService>,
    pub project_engine: Arc<ProjectEngine>,
    pub task_engine: Arc<TaskEngine>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            config: self.config.clone(),
            user_service: Arc::clone(&self.user_service),
            project_engine: Arc::clone(&self.project_engine),
            task_engine: Arc::clone(&self.task_engine),
        }
    }
}
