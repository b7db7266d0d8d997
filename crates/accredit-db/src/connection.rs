//! SurrealDB connection management.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Where the accreditation store lives.
///
/// The server reads this from the `[database]` table of `accredit.toml`
/// or from `ACCREDIT__DATABASE__URL`, `ACCREDIT__DATABASE__NAMESPACE`,
/// `ACCREDIT__DATABASE__DATABASE`, `ACCREDIT__DATABASE__USERNAME` and
/// `ACCREDIT__DATABASE__PASSWORD`. Unset keys keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// WebSocket address without scheme, e.g. `127.0.0.1:8000`.
    pub url: String,
    /// One namespace per deployment (e.g. per school).
    pub namespace: String,
    /// One database per environment within the namespace.
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "accredit".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Namespace and database names must be plain identifiers so they can be
/// selected without quoting.
fn check_identifier(field: &str, value: &str) -> Result<(), DbError> {
    if value.is_empty() {
        return Err(DbError::Config(format!("{field} must not be empty")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DbError::Config(format!(
            "{field} '{value}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

impl DbConfig {
    pub fn validate(&self) -> Result<(), DbError> {
        if self.url.trim().is_empty() {
            return Err(DbError::Config("url must not be empty".into()));
        }
        if self.url.contains("://") {
            return Err(DbError::Config(format!(
                "url '{}' must not include a scheme; the WebSocket engine adds it",
                self.url
            )));
        }
        check_identifier("namespace", &self.namespace)?;
        check_identifier("database", &self.database)?;
        if self.username.is_empty() {
            return Err(DbError::Config("username must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Validate `config`, sign in as root and select the accreditation
    /// namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        config.validate()?;
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to accreditation store"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(namespace = %config.namespace, "Accreditation store ready");
        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
