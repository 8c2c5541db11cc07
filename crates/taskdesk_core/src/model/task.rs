//! Per-user task record.
//!
//! The task UI itself lives outside core; this shape exists so the task
//! store, admin cascade and backup paths agree on one persisted format.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Urgency bucket rendered by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Two-state task lifecycle; toggling between the states is the only
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// One task row as persisted under `tasks_<username>`.
///
/// Field names follow the persisted JSON of existing backup artifacts
/// (`dueDate`, `createdAt`), so exported snapshots stay interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: TaskPriority,
    #[serde(rename = "dueDate", default)]
    pub due_date: String,
    pub status: TaskStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Creates a pending task with a generated id and a creation stamp.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            priority,
            due_date: due_date.into(),
            status: TaskStatus::Pending,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Flips pending <-> completed.
    pub fn toggle_status(&mut self) {
        self.status = match self.status {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        };
    }
}

/// Counters recomputed by the UI after every task mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn for_tasks(tasks: &[Task]) -> Self {
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        Self {
            total: tasks.len(),
            pending: tasks.len() - completed,
            completed,
        }
    }
}
