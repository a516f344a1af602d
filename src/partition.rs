//! Splits the flat task list from the backend into the views a screen shows.
//!
//! Teachers see every task, split by status. Students see only the tasks
//! assigned to them. Input order is preserved and the input is never touched.

use crate::models::{Role, Task, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPartition {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskPartition {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}

fn select<F>(tasks: &[Task], keep: F) -> Vec<Task>
where
    F: Fn(&Task) -> bool,
{
    tasks.iter().filter(|t| keep(*t)).cloned().collect()
}

pub fn active_for_teacher(tasks: &[Task]) -> Vec<Task> {
    select(tasks, |t| !t.status.is_completed())
}

pub fn completed_for_teacher(tasks: &[Task]) -> Vec<Task> {
    select(tasks, |t| t.status.is_completed())
}

pub fn active_for_student(tasks: &[Task], user_id: i64) -> Vec<Task> {
    select(tasks, |t| !t.status.is_completed() && t.is_assigned_to(user_id))
}

pub fn completed_for_student(tasks: &[Task], user_id: i64) -> Vec<Task> {
    select(tasks, |t| t.status.is_completed() && t.is_assigned_to(user_id))
}

/// Returns the active/completed pair relevant to `user`'s role.
///
/// While either input is still loading the result is two empty lists.
pub fn partition(tasks: Option<&[Task]>, user: Option<&User>) -> TaskPartition {
    let (Some(tasks), Some(user)) = (tasks, user) else {
        return TaskPartition::default();
    };

    match user.role {
        Role::Teacher => TaskPartition {
            active: active_for_teacher(tasks),
            completed: completed_for_teacher(tasks),
        },
        Role::Student => TaskPartition {
            active: active_for_student(tasks, user.id),
            completed: completed_for_student(tasks, user.id),
        },
    }
}
