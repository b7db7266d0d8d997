//! Server configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `accredit.toml` in the working directory, then `ACCREDIT__*`
//! environment variables (e.g. `ACCREDIT__DATABASE__URL`).

use accredit_db::DbConfig;
use accredit_workflow::WorkflowConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub workflow: WorkflowConfig,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig::default(),
            workflow: WorkflowConfig::default(),
            log_filter: "accredit=info".into(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("accredit").required(false))
            .add_source(
                config::Environment::with_prefix("ACCREDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
