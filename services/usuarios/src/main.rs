use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool};

use crate::{
    config::{ServiceConfig, ServiceInfo},
    repositories::PgUsuarioRepository,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting usuarios service");

    let service_config = ServiceConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let app_state = AppState::new(
        Arc::new(PgUsuarioRepository::new(pool)),
        ServiceInfo::default(),
    );

    let app = routes::create_router(app_state);

    let address = service_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Servidor API REST escuchando en {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
