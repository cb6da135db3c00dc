use axum::{middleware, Router};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use trackserver::config::AppConfig;
use trackserver::core::middleware::{
    authentication_middleware, require_authentication_middleware,
};
use trackserver::projects::{self, DieselProjectStore, ProjectEngine};
use trackserver::shared::state::AppState;
use trackserver::shared::utils::{create_conn, run_migrations};
use trackserver::tasks::{self, DieselTaskStore, TaskEngine};
use trackserver::users::{self, DieselUserStore, UserService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::from_env();
    if config.auth.jwt_secret.is_empty() {
        warn!("JWT_SECRET is empty; issued tokens are unsigned-secret tokens");
    }

    let pool = create_conn()?;
    run_migrations(&pool).map_err(|e| anyhow::anyhow!("{e}"))?;
    info!("Database ready");

    let user_store = Arc::new(DieselUserStore::new(pool.clone()));
    let project_store = Arc::new(DieselProjectStore::new(pool.clone()));
    let task_store = Arc::new(DieselTaskStore::new(pool.clone()));

    let state = Arc::new(AppState {
        conn: pool.clone(),
        config: config.clone(),
        user_service: Arc::new(UserService::new(user_store, config.auth.clone())),
        project_engine: Arc::new(ProjectEngine::new(project_store.clone())),
        task_engine: Arc::new(TaskEngine::new(task_store, project_store)),
    });

    let protected = Router::new()
        .merge(projects::configure_project_routes())
        .merge(tasks::configure_task_routes())
        .layer(middleware::from_fn(require_authentication_middleware));

    let app = Router::new()
        .merge(users::configure_user_routes())
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down HTTP server...");
    }
}
