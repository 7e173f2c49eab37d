use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task priority, ordered from least to most urgent.
///
/// Persisted as an integer tag (0 = low, 1 = medium, 2 = high) so data files
/// survive a rename of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            _ => Err(format!("unknown priority tag: {}", tag)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Stable identity of a task, minted once at creation and never reassigned.
/// Store lookup and equality go through this, never through field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> TaskId {
        TaskId(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        TaskId::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Title text; must be non-empty by the time the task is committed.
    pub title: String,
    /// Free-form description, may be empty.
    pub description: String,
    /// Due date. `None` means "no deadline", distinct from any concrete date.
    /// Time of day is not significant for deadline comparisons.
    pub deadline: Option<NaiveDate>,
    /// When the task was last committed; re-stamped on every commit.
    pub create_date: DateTime<Utc>,
    pub priority: Priority,
    pub is_done: bool,
}

impl Task {
    /// Create a transient task with a fresh id. The task does not exist as
    /// far as any view is concerned until it is committed to a store.
    pub fn new(title: impl Into<String>) -> Task {
        Task {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            deadline: None,
            create_date: Utc::now(),
            priority: Priority::default(),
            is_done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priority_serializes_as_integer_tag() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "2");

        let p: Priority = serde_json::from_str("2").unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn priority_rejects_unknown_tag() {
        let result: Result<Priority, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("Water the plants");
        assert_eq!(task.title, "Water the plants");
        assert_eq!(task.description, "");
        assert_eq!(task.deadline, None);
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.is_done);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = Task::new("a");
        let b = Task::new("b");
        assert_ne!(a.id, b.id);
    }
}
