use chrono::{DateTime, Utc};

use crate::models::Task;

pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.deadline {
        Some(deadline) => !task.status.is_completed() && now > deadline,
        None => false,
    }
}

/// Completed tasks earn their points, overdue open tasks cost them. The sum
/// saturates since points come straight from the server.
pub fn total_points(tasks: &[Task], now: DateTime<Utc>) -> i64 {
    tasks.iter().fold(0, |total, task| {
        if task.status.is_completed() {
            total.saturating_add(task.points)
        } else if is_overdue(task, now) {
            total.saturating_sub(task.points)
        } else {
            total
        }
    })
}
