pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::AppError;
use crate::models::{
    Completion, LoginRequest, LoginResponse, NewCompletionRequest, NewTaskRequest,
    NewUserRequest, Session, Task, UpdateTaskRequest, User,
};

pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// The remote TaskMate backend.
#[async_trait]
pub trait TaskMateClient: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<Session, AppError>;
    async fn create_user(&self, req: &NewUserRequest) -> Result<User, AppError>;
    async fn fetch_users(&self) -> Result<Vec<User>, AppError>;
    async fn fetch_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn create_task(&self, req: &NewTaskRequest) -> Result<Task, AppError>;
    async fn update_task(&self, id: i64, req: &UpdateTaskRequest) -> Result<Task, AppError>;
    async fn delete_task(&self, id: i64) -> Result<(), AppError>;
    async fn create_completion(&self, req: &NewCompletionRequest) -> Result<Completion, AppError>;
}

pub struct TaskMateHttpClient {
    client: Client,
    config: ClientConfig,
    token: Option<String>,
}

impl TaskMateHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request when set.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        warn!("TaskMate API error {}: {}", status, body);
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse TaskMate response: {} body={}", e, body);
            AppError::Json(e)
        })
    }
}

impl TaskMateHttpClient {
    /// Decodes a JSON array item by item; unreadable records are logged and
    /// skipped so one bad row does not hide the rest.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, kind: &str) -> Result<Vec<T>, AppError> {
        let raw: Vec<serde_json::Value> = self.send_json(self.request(Method::GET, path)).await?;
        let mut items = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<T>(value) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping unreadable {}: {}", kind, e),
            }
        }
        Ok(items)
    }
}

/// Picks the most useful message out of an error response body.
pub fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<dto::ErrorBody>(body) {
        if let Some(message) = parsed.into_message() {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl TaskMateClient for TaskMateHttpClient {
    async fn login(&self, req: &LoginRequest) -> Result<Session, AppError> {
        let resp: LoginResponse = self
            .send_json(self.request(Method::POST, "login").json(req))
            .await?;
        Ok(resp.into())
    }

    async fn create_user(&self, req: &NewUserRequest) -> Result<User, AppError> {
        self.send_json(self.request(Method::POST, "users/create").json(req))
            .await
    }

    async fn fetch_users(&self) -> Result<Vec<User>, AppError> {
        self.fetch_list("users", "user").await
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.fetch_list("tasks", "task").await
    }

    async fn create_task(&self, req: &NewTaskRequest) -> Result<Task, AppError> {
        self.send_json(self.request(Method::POST, "tasks/create").json(req))
            .await
    }

    async fn update_task(&self, id: i64, req: &UpdateTaskRequest) -> Result<Task, AppError> {
        let path = format!("tasks/{}", id);
        self.send_json(self.request(Method::PATCH, &path).json(req))
            .await
    }

    async fn delete_task(&self, id: i64) -> Result<(), AppError> {
        let path = format!("tasks/{}", id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn create_completion(&self, req: &NewCompletionRequest) -> Result<Completion, AppError> {
        self.send_json(self.request(Method::POST, "completeTasks/create").json(req))
            .await
    }
}
