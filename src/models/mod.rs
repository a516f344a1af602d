pub mod task;
pub mod user;
pub mod wire;

pub use task::{Completion, NewCompletionRequest, NewTaskRequest, Task, TaskStatus, UpdateTaskRequest};
pub use user::{LoginRequest, LoginResponse, NewUserRequest, Role, Session, User};
