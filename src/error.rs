use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

impl AppError {
    /// Message suitable for showing inline next to the form that failed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound => "Task not found".to_string(),
            AppError::NotAuthenticated => "Please log in first".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Http(e) => {
                error!("http error: {}", e);
                GENERIC_FAILURE.to_string()
            }
            AppError::Database(e) => {
                error!("database error: {}", e);
                GENERIC_FAILURE.to_string()
            }
            AppError::Migration(e) => {
                error!("migration error: {}", e);
                GENERIC_FAILURE.to_string()
            }
            AppError::Json(e) => {
                error!("decode error: {}", e);
                GENERIC_FAILURE.to_string()
            }
        }
    }
}
