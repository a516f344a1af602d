use std::sync::Arc;

use tracing::{info, warn};

use crate::api::TaskMateClient;
use crate::error::AppError;
use crate::models::{Session, User};
use crate::session::SessionStore;
use crate::validation;

/// Login, sign-up and logout, plus restoring a saved session on start.
pub struct AuthService {
    client: Arc<dyn TaskMateClient>,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(client: Arc<dyn TaskMateClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    /// Returns the saved session, if any, so the caller can skip the login step.
    pub async fn restore(&self) -> Result<Option<Session>, AppError> {
        let session = self.store.get().await?;
        match &session {
            Some(s) => info!("Restored session for {} ({})", s.user.email, s.user.role),
            None => info!("No saved session"),
        }
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let req = validation::login(email, password)?;
        let session = self.client.login(&req).await.map_err(|e| {
            warn!("Login failed for {}: {}", req.email, e);
            e
        })?;
        self.store.set(&session).await?;
        info!("Logged in as {} ({})", session.user.email, session.user.role);
        Ok(session)
    }

    /// Registers a new account. Does not log in.
    pub async fn sign_up(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AppError> {
        let req = validation::sign_up(user_name, email, password, role)?;
        let user = self.client.create_user(&req).await?;
        info!("Created {} account {}", user.role, user.email);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.remove().await?;
        info!("Logged out");
        Ok(())
    }
}
