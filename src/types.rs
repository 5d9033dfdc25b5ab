//! Core types for the task ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for both persisted records and user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task as persisted in the task record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub assignee: String,
    pub title: String,
    pub description: String,
    pub assigned_date: NaiveDate,
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl TaskRecord {
    /// Incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}

/// Input for creating a task. The assigned date and completion flag are
/// filled in by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub assignee: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// A username/password pair from the credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

/// Editable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Assignee,
    DueDate,
}

impl TaskField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Assignee => "assignee",
            TaskField::DueDate => "due_date",
        }
    }
}

/// The subsequence of tasks last shown to a caller. Task numbers given back
/// by the caller are 1-based positions within this view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewScope {
    All,
    Owner(String),
}

impl ViewScope {
    pub fn includes(&self, task: &TaskRecord) -> bool {
        match self {
            ViewScope::All => true,
            ViewScope::Owner(name) => task.assignee == *name,
        }
    }
}

/// Outcome of a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Completed,
    AlreadyComplete,
}

/// Parse a `YYYY-MM-DD` date. Unpadded forms such as `2024-1-5` are rejected.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
