pub mod log_entry;
pub mod project;
pub mod task;
pub mod user;

pub use log_entry::{CreateLogEntry, LogEntry, UpdateLogEntry};
pub use project::{CreateProject, Project, UpdateProject};
pub use task::{CreateTask, Task, TaskStatus, UpdateTask};
pub use user::{LoginRequest, RegisterRequest, User};
