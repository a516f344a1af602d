use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::TaskMateClient;
use crate::error::AppError;
use crate::models::{NewCompletionRequest, NewTaskRequest, Role, Session, Task, UpdateTaskRequest, User};
use crate::partition::{self, TaskPartition};
use crate::points;
use crate::validation::{self, TaskForm};

/// State behind the home and completed-task screens.
///
/// Data is fetched by [`TaskBoard::load`] only; mutations refresh afterwards.
/// A refresh that fails after a successful mutation leaves the board stale
/// instead of failing the mutation.
pub struct TaskBoard {
    client: Arc<dyn TaskMateClient>,
    session: Session,
    tasks: Option<Vec<Task>>,
    users: Option<Vec<User>>,
    stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSummary {
    pub active: usize,
    pub completed: usize,
    pub active_points: i64,
    pub completed_points: i64,
    pub overdue: usize,
}

impl TaskBoard {
    pub fn new(client: Arc<dyn TaskMateClient>, session: Session) -> Self {
        Self {
            client,
            session,
            tasks: None,
            users: None,
            stale: false,
        }
    }

    pub fn user(&self) -> &User {
        &self.session.user
    }

    fn is_teacher(&self) -> bool {
        self.session.user.role.is_teacher()
    }

    /// Fetches tasks (and, for teachers, the user list). Call again to refresh.
    ///
    /// Nothing is replaced unless every fetch succeeds.
    pub async fn load(&mut self) -> Result<(), AppError> {
        match self.fetch().await {
            Ok((tasks, users)) => {
                self.tasks = Some(tasks);
                if users.is_some() {
                    self.users = users;
                }
                self.stale = false;
                Ok(())
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<(Vec<Task>, Option<Vec<User>>), AppError> {
        let tasks = self.client.fetch_tasks().await?;
        info!("Loaded {} tasks", tasks.len());

        let users = if self.is_teacher() {
            let users = self.client.fetch_users().await?;
            info!("Loaded {} users", users.len());
            Some(users)
        } else {
            None
        };
        Ok((tasks, users))
    }

    async fn refresh_after(&mut self, action: &str) {
        if let Err(e) = self.load().await {
            warn!("{} succeeded but refreshing the board failed: {}", action, e);
        }
    }

    /// True when the last load failed, so the cached views may be out of date.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn tasks(&self) -> Option<&[Task]> {
        self.tasks.as_deref()
    }

    pub fn partition(&self) -> TaskPartition {
        partition::partition(self.tasks(), Some(&self.session.user))
    }

    /// Students a teacher can assign work to.
    pub fn students(&self) -> Vec<User> {
        self.users
            .iter()
            .flatten()
            .filter(|u| u.role == Role::Student)
            .cloned()
            .collect()
    }

    pub fn summary(&self, now: DateTime<Utc>) -> BoardSummary {
        let view = self.partition();
        BoardSummary {
            active: view.active.len(),
            completed: view.completed.len(),
            active_points: points::total_points(&view.active, now),
            completed_points: points::total_points(&view.completed, now),
            overdue: view.active.iter().filter(|t| points::is_overdue(t, now)).count(),
        }
    }

    pub async fn create_task(&mut self, form: &TaskForm) -> Result<Task, AppError> {
        if !self.is_teacher() {
            return Err(AppError::Forbidden("Only teachers can create tasks".to_string()));
        }
        let valid = validation::task(form)?;
        let req = NewTaskRequest {
            title: valid.title,
            description: valid.description,
            creator_id: self.session.user.id,
            assignee_id: valid.assignee_id,
            deadline: valid.deadline,
            points: valid.points,
        };

        let task = self.client.create_task(&req).await?;
        info!("Created task {} for user {}", task.id, req.assignee_id);
        self.refresh_after("Creating a task").await;
        Ok(task)
    }

    /// Marks one of the caller's active tasks as completed.
    pub async fn complete_task(&mut self, id: i64) -> Result<Task, AppError> {
        if self.tasks.is_none() {
            self.load().await?;
        }
        if !self.partition().active.iter().any(|t| t.id == id) {
            return Err(AppError::NotFound);
        }

        let task = self
            .client
            .update_task(id, &UpdateTaskRequest::complete())
            .await?;

        let record = NewCompletionRequest {
            task_id: id,
            user_id: self.session.user.id,
        };
        if let Err(e) = self.client.create_completion(&record).await {
            warn!("Task {} completed but the completion record failed: {}", id, e);
        }

        info!("Task {} completed by user {}", id, self.session.user.id);
        self.refresh_after("Completing a task").await;
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<(), AppError> {
        if !self.is_teacher() {
            return Err(AppError::Forbidden("Only teachers can delete tasks".to_string()));
        }
        self.client.delete_task(id).await?;
        info!("Deleted task {}", id);
        self.refresh_after("Deleting a task").await;
        Ok(())
    }
}
