/// Database models for Taskboard
///
/// # Models
///
/// - `user`: Users and the user-centric join rows
/// - `status`: The closed status vocabulary and its lookup table
/// - `task`: Tasks and the task-centric join rows

pub mod status;
pub mod task;
pub mod user;

pub use status::{Status, StatusTaskCount, TaskStatus, UnknownStatus};
pub use task::{CreateTask, NewTask, Task, TaskSummary, TaskWithOwner, TaskWithStatus};
pub use user::{CreateUser, User, UserTaskCount, UserTaskInProgress};
