//! # Taskboard API Server
//!
//! HTTP backend for project and task tracking: users own projects, projects
//! carry members and tasks, tasks carry comments.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Bearer-token authentication (JWT access/refresh pair)
//! - CRUD controllers for users, projects, tasks, and comments
//! - Store-enforced cascade/nullify delete semantics
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use axum::{extract::Request, ServiceExt};
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let state = AppState::new(pool, config.clone());

    // Routes are spelled with trailing slashes on the wire; normalize so
    // both forms land on the same handler.
    let app = NormalizePathLayer::trim_trailing_slash().layer(build_router(state));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
