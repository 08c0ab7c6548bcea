//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use encyclomedia::inbound::http::health::HealthState;
use encyclomedia::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use encyclomedia::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Apply migrations and open the pool when a database is configured.
async fn attach_database(
    config: ServerConfig,
    database_url: Option<&str>,
) -> std::io::Result<ServerConfig> {
    let Some(url) = database_url else {
        warn!("ENCYCLOMEDIA_DATABASE_URL unset; data will not survive a restart");
        return Ok(config);
    };
    run_pending_migrations(url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let config = ServerConfig::from_settings(&settings)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let config = attach_database(config, settings.database_url()).await?;
    info!(
        bind_addr = %config.bind_addr(),
        persistent = config.has_db_pool(),
        cors_origins = config.cors_origins().len(),
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
