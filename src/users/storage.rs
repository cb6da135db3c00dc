use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::schema::users;
use crate::shared::models::User;
use crate::shared::utils::DbPool;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, name: String, email: String) -> Result<User, ApiError>;
    async fn find_user_by_email(&self, email: String) -> Result<Option<User>, ApiError>;
}

pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn create_user(&self, name: String, email: String) -> Result<User, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            let user = User {
                id: Uuid::new_v4(),
                name,
                email,
                created_at: Utc::now(),
            };

            diesel::insert_into(users::table)
                .values(&user)
                .get_result(&mut conn)
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }

    async fn find_user_by_email(&self, email: String) -> Result<Option<User>, ApiError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| ApiError::Database(e.to_string()))?;

            users::table
                .filter(users::email.eq(&email))
                .first::<User>(&mut conn)
                .optional()
                .map_err(|e| ApiError::Database(e.to_string()))
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}
