use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task lifecycle status. Stored as text; parsed here so the service layer
/// rejects anything outside the allowed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Created,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignTaskRequest {
    pub task_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub task_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkTimeFilterQuery {
    pub project_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkTimeWindowQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct DeveloperWorkTimeResponse {
    pub user_id: Uuid,
    pub total_work_time: f64,
}

#[derive(Debug, Serialize)]
pub struct ProjectWorkTimeResponse {
    pub project_id: Uuid,
    pub total_work_time: f64,
}
