use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SessionStore;
use crate::error::AppError;
use crate::models::Session;

#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<Option<Session>, AppError> {
        Ok(self.session.read().await.clone())
    }

    async fn set(&self, session: &Session) -> Result<(), AppError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), AppError> {
        *self.session.write().await = None;
        Ok(())
    }
}
