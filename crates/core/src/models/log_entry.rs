//! Log entry model and DTOs.
//!
//! `task_id` and `project_id` are independent optional references: an
//! entry may point at neither, either, or both.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, LogDate, Timestamp};

/// A dated work-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    pub content: String,
    #[serde(with = "crate::log_date")]
    pub log_date: LogDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    pub content: String,
    /// Server uses its own current day when omitted.
    #[serde(
        default,
        with = "crate::log_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_date: Option<LogDate>,
}

/// DTO for updating a log entry. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        with = "crate::log_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_date: Option<LogDate>,
}
