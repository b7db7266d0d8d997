//! Accreditation server: application entry point.
//!
//! Loads configuration, initialises JSON logging, connects to SurrealDB,
//! applies schema migrations and wires the workflow components. Request
//! transports attach to [`services::Services`].

mod config;
mod error;
mod services;

use accredit_db::DbManager;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::ServerError;
use crate::services::Services;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| ServerError::LogFilter(e.to_string()))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting accreditation server...");

    let db = DbManager::connect(&config.database).await?;
    accredit_db::run_migrations(db.client()).await?;

    let _services = Services::new(db.client(), &config.workflow)?;
    info!(portal = %config.workflow.portal_name, "Workflow services ready");

    tokio::signal::ctrl_c().await?;

    info!("Accreditation server stopped.");
    Ok(())
}
