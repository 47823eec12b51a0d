//! # TeamTask API Server
//!
//! HTTP server for TeamTask: user registration and login, teams with
//! role-based memberships, and creator-owned projects and tasks.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p teamtask-api
//! ```

use std::sync::Arc;

use teamtask_api::app::{build_router, AppState};
use teamtask_api::config::Config;
use teamtask_shared::store::{create_pool, run_migrations, PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamtask_api=debug,teamtask_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TeamTask API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    run_migrations(&pool).await?;

    let state = AppState::new(Arc::new(PgStore::new(pool)), config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
