use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};

use super::{SESSION_KEY, SessionStore};
use crate::error::AppError;
use crate::models::Session;

/// Key-value table in a local sqlite file.
pub struct SqliteSessionStore {
    db: SqlitePool,
}

impl SqliteSessionStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        // a single connection keeps `sqlite::memory:` pointing at one database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;
        Self::new(pool).await
    }

    pub async fn new(db: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations").run(&db).await?;
        Ok(Self { db })
    }

    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM key_value WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO key_value (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM key_value WHERE key = ?1")
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Stores an arbitrary raw value; used to seed storage in tests.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.write(key, value).await
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self) -> Result<Option<Session>, AppError> {
        let Some(raw) = self.read(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable stored session: {}", e);
                self.delete(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn set(&self, session: &Session) -> Result<(), AppError> {
        let raw = serde_json::to_string(session)?;
        self.write(SESSION_KEY, &raw).await?;
        info!("Session saved for user {}", session.user.id);
        Ok(())
    }

    async fn remove(&self) -> Result<(), AppError> {
        self.delete(SESSION_KEY).await
    }
}
