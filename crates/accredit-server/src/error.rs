use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid log filter: {0}")]
    LogFilter(String),

    #[error("workflow setup failed: {0}")]
    Workflow(#[from] accredit_core::error::AccreditError),

    #[error("database error: {0}")]
    Database(#[from] accredit_db::DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
