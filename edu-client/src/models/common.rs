use serde::{Deserialize, Serialize};

/// Lifecycle of a path or quiz assigned to a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

impl AssignmentStatus {
    /// Lenient parse of the backend status string; unknown values count as not started.
    pub fn from_backend(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "in_progress" | "started" | "active" => AssignmentStatus::InProgress,
            "completed" | "done" | "finished" => AssignmentStatus::Completed,
            "overdue" | "expired" => AssignmentStatus::Overdue,
            _ => AssignmentStatus::NotStarted,
        }
    }
}

/// Backend ids arrive as either numbers or strings.
pub fn id_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn opt_id_to_string(value: &Option<serde_json::Value>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.is_null())
        .map(id_to_string)
}
