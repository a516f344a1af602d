use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://taskmate-backend.onrender.com/";
pub const DEFAULT_SESSION_DB: &str = "sqlite://taskmate-session.db?mode=rwc";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub session_db_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_db_url: DEFAULT_SESSION_DB.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `TASKMATE_*` variables, falling back to defaults for anything unset.
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("TASKMATE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "TASKMATE_BASE_URL must be an http(s) URL, got {:?}",
                base_url
            )));
        }

        let session_db_url =
            env::var("TASKMATE_SESSION_DB").unwrap_or_else(|_| DEFAULT_SESSION_DB.to_string());

        let timeout_secs = match env::var("TASKMATE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("TASKMATE_TIMEOUT_SECS must be a number, got {:?}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            session_db_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Joins an endpoint path onto the base URL, tolerating slashes on either side.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        let with_slash = ClientConfig::new("http://localhost:5000/");
        let without = ClientConfig::new("http://localhost:5000");
        assert_eq!(with_slash.endpoint("/tasks"), "http://localhost:5000/tasks");
        assert_eq!(without.endpoint("tasks/3"), "http://localhost:5000/tasks/3");
    }
}
