use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::wire;

/// Canonical task status. The backend has used both a string enum and a
/// boolean flag for this; both are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        self == TaskStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Flag(bool),
    Text(String),
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = match Option::<RawStatus>::deserialize(deserializer)? {
            Some(RawStatus::Flag(true)) => TaskStatus::Completed,
            Some(RawStatus::Text(s)) if s.trim().eq_ignore_ascii_case("completed") => {
                TaskStatus::Completed
            }
            _ => TaskStatus::Pending,
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTask")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub creator_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub points: i64,
    pub status: TaskStatus,
}

/// Task as the backend sends it. Older records spell the assignee and the
/// status differently, and some carry both spellings at once.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    #[serde(deserialize_with = "wire::id")]
    id: i64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "wire::opt_id")]
    creator_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::opt_id")]
    assignee_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::opt_id")]
    assign_user: Option<i64>,
    #[serde(default, deserialize_with = "wire::opt_datetime")]
    deadline: Option<DateTime<Utc>>,
    #[serde(default = "wire::default_points", deserialize_with = "wire::points")]
    points: i64,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    complete_task_status: Option<TaskStatus>,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        Task {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            creator_id: raw.creator_id,
            assignee_id: raw.assignee_id.or(raw.assign_user),
            deadline: raw.deadline,
            points: raw.points,
            status: raw
                .status
                .or(raw.complete_task_status)
                .unwrap_or_default(),
        }
    }
}

impl Task {
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assignee_id == Some(user_id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskRequest {
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    pub assignee_id: i64,
    pub deadline: DateTime<Utc>,
    pub points: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompletionRequest {
    pub task_id: i64,
    pub user_id: i64,
}

/// Audit record linking a task to the user who completed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "wire::id")]
    pub task_id: i64,
    #[serde(deserialize_with = "wire::id")]
    pub user_id: i64,
}
