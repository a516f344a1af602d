//! Local persistence for the signed-in session.
//!
//! The session is stored as one JSON value under [`SESSION_KEY`]. It is read
//! once on start to skip the login screen and removed on logout.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::Session;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

pub const SESSION_KEY: &str = "userData";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self) -> Result<Option<Session>, AppError>;
    async fn set(&self, session: &Session) -> Result<(), AppError>;
    async fn remove(&self) -> Result<(), AppError>;
}
