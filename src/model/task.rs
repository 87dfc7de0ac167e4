use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Task type given to tasks created from the project screen
pub const DEFAULT_TASK_KIND: &str = "Разработка";

/// Format of the `modified` stamp (local time)
pub const MODIFIED_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Task status. Anything outside the known set is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    New,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::New => "Новая",
            TaskStatus::InProgress => "В работе",
            TaskStatus::Completed => "Завершена",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Новая" => TaskStatus::New,
            "В работе" => TaskStatus::InProgress,
            "Завершена" => TaskStatus::Completed,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(s: TaskStatus) -> Self {
        match s {
            TaskStatus::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// A unit of work inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Creation timestamp in milliseconds
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Last-modified local date-time, `DD.MM.YYYY HH:MM`
    #[serde(default)]
    pub modified: String,
}

fn default_kind() -> String {
    DEFAULT_TASK_KIND.to_string()
}

impl Task {
    /// A fresh task as created from the add-task form
    pub fn new(id: i64, title: String, now: DateTime<Local>) -> Self {
        Task {
            id,
            title,
            description: String::new(),
            status: TaskStatus::New,
            kind: default_kind(),
            modified: format_modified(now),
        }
    }
}

pub fn format_modified(at: DateTime<Local>) -> String {
    at.format(MODIFIED_FORMAT).to_string()
}
