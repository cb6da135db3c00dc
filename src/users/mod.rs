pub mod storage;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::generate_token;
use crate::config::AuthConfig;
use crate::shared::error::ApiError;
use crate::shared::models::User;
use crate::shared::state::AppState;

pub use storage::{DieselUserStore, UserStore};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub token: String,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    auth: AuthConfig,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, auth: AuthConfig) -> Self {
        Self { users, auth }
    }

    pub async fn register(&self, name: &str, email: &str) -> Result<(User, String), ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("User name is required".to_string()));
        }
        if email.trim().is_empty() {
            return Err(ApiError::Validation("User email is required".to_string()));
        }

        let existing = self.users.find_user_by_email(email.to_string()).await?;
        if existing.is_some() {
            return Err(ApiError::Validation(
                "A user with this email already exists".to_string(),
            ));
        }

        let user = self
            .users
            .create_user(name.to_string(), email.to_string())
            .await?;
        let token = generate_token(user.id, &self.auth)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok((user, token))
    }
}

pub async fn handle_register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (user, token) = state.user_service.register(&req.name, &req.email).await?;

    log::info!("User registered successfully: ID={}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { id: user.id, token }),
    ))
}

/// Configure user routes (registration is the only unauthenticated route)
pub fn configure_user_routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/register", post(handle_register))
}
