//! Form checks run before any request leaves the client. The first failing
//! field wins, mirroring how the forms report one message at a time.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{LoginRequest, NewUserRequest, Role, wire::DEFAULT_POINTS};

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

pub fn login(email: &str, password: &str) -> Result<LoginRequest, AppError> {
    require(email, "Please enter email")?;
    require(password, "Please enter password")?;
    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn sign_up(
    user_name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<NewUserRequest, AppError> {
    require(user_name, "Please enter username")?;
    require(email, "Please enter email")?;
    require(password, "Please enter password")?;
    require(role, "Please enter role")?;
    let role = role
        .parse::<Role>()
        .map_err(|_| AppError::Validation("Role must be TEACHER or STUDENT".to_string()))?;

    Ok(NewUserRequest {
        user_name: user_name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        role,
    })
}

/// Raw task form input as typed by a teacher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub assignee_id: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub points: String,
}

/// A task form that passed validation; the creator is filled in by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTask {
    pub title: String,
    pub description: String,
    pub assignee_id: i64,
    pub deadline: DateTime<Utc>,
    pub points: i64,
}

pub fn task(form: &TaskForm) -> Result<ValidTask, AppError> {
    require(&form.title, "Please enter task title")?;
    require(&form.description, "Please enter description")?;
    let assignee_id = form.assignee_id.ok_or_else(|| {
        AppError::Validation("Please select a student to assign the task".to_string())
    })?;
    let deadline = form
        .deadline
        .ok_or_else(|| AppError::Validation("Please set a deadline".to_string()))?;

    let points = match form.points.trim() {
        "" => DEFAULT_POINTS,
        raw => raw
            .parse::<i64>()
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| AppError::Validation("Points must be a whole number".to_string()))?,
    };

    Ok(ValidTask {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        assignee_id,
        deadline,
        points,
    })
}
