use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, Identifiable)]
#[diesel(table_name = schema::users)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, Identifiable)]
#[diesel(table_name = schema::projects)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Matches the tasks schema exactly; status stays text in the row and is
// validated through TaskStatus at the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, Identifiable)]
#[diesel(table_name = schema::tasks)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    pub project_id: Uuid,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub mod schema {
    diesel::table! {
        users (id) {
            id -> Uuid,
            name -> Text,
            email -> Text,
            created_at -> Timestamptz,
        }
    }

    diesel::table! {
        projects (id) {
            id -> Uuid,
            title -> Text,
            description -> Nullable<Text>,
            user_id -> Uuid,
            created_at -> Timestamptz,
        }
    }

    diesel::table! {
        tasks (id) {
            id -> Uuid,
            title -> Text,
            description -> Nullable<Text>,
            deadline -> Timestamptz,
            project_id -> Uuid,
            status -> Text,
            assigned_to -> Nullable<Uuid>,
            created_at -> Timestamptz,
            updated_at -> Nullable<Timestamptz>,
            completed_at -> Nullable<Timestamptz>,
        }
    }

    diesel::joinable!(projects -> users (user_id));
    diesel::joinable!(tasks -> projects (project_id));

    diesel::allow_tables_to_appear_in_same_query!(users, projects, tasks);
}

pub use schema::*;
