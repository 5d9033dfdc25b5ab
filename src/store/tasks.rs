//! Task record store.

use super::codec;
use super::{append_line, read_optional, rewrite_lines};
use crate::error::{TrackerError, TrackerResult};
use crate::types::{Completion, NewTask, TaskField, TaskRecord, ViewScope, parse_date};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A line that could not be decoded during a load. The raw text is kept so
/// rewrites put it back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the task file.
    pub line: usize,
    pub reason: String,
    pub raw: String,
}

/// Position of a non-blank line in the file.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Record(usize),
    Skipped(usize),
}

/// Result of loading the task file.
#[derive(Debug, Clone, Default)]
pub struct TaskLoad {
    pub records: Vec<TaskRecord>,
    pub skipped: Vec<SkippedLine>,
    order: Vec<Slot>,
}

impl TaskLoad {
    /// Lines to write back: decoded records re-encoded, skipped lines as read.
    fn lines(&self) -> TrackerResult<Vec<String>> {
        self.order
            .iter()
            .map(|slot| match *slot {
                Slot::Record(i) => codec::encode(&self.records[i]),
                Slot::Skipped(i) => Ok(self.skipped[i].raw.clone()),
            })
            .collect()
    }
}

/// Handle to the task record file.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every decodable record. Malformed lines are skipped and reported
    /// rather than failing the load. A missing file is an empty store.
    pub fn load(&self) -> TrackerResult<TaskLoad> {
        let Some(content) = read_optional(&self.path)? else {
            debug!(path = %self.path.display(), "Task file absent, treating as empty");
            return Ok(TaskLoad::default());
        };

        let mut load = TaskLoad::default();
        for (idx, line) in content.lines().enumerate() {
            match codec::decode(line) {
                Ok(Some(record)) => {
                    load.order.push(Slot::Record(load.records.len()));
                    load.records.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "Skipping malformed task record");
                    load.order.push(Slot::Skipped(load.skipped.len()));
                    load.skipped.push(SkippedLine {
                        line: idx + 1,
                        reason: e.to_string(),
                        raw: line.to_string(),
                    });
                }
            }
        }
        Ok(load)
    }

    /// Load records only, discarding the skipped-line report.
    pub fn records(&self) -> TrackerResult<Vec<TaskRecord>> {
        Ok(self.load()?.records)
    }

    /// Create a task assigned today and append it to the file.
    pub fn add(&self, task: NewTask, today: NaiveDate) -> TrackerResult<TaskRecord> {
        let record = TaskRecord {
            assignee: task.assignee,
            title: task.title,
            description: task.description,
            assigned_date: today,
            due_date: task.due_date,
            completed: false,
        };
        let line = codec::encode(&record)?;
        append_line(&self.path, &line)?;
        info!(assignee = %record.assignee, title = %record.title, "Task added");
        Ok(record)
    }

    /// Tasks assigned to `username`, in file order.
    pub fn list_by_owner(&self, username: &str) -> TrackerResult<Vec<TaskRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|t| t.assignee == username)
            .collect())
    }

    /// The tasks a caller sees for `scope`, paired with their position in the
    /// full record sequence.
    pub fn view(&self, scope: &ViewScope) -> TrackerResult<Vec<(usize, TaskRecord)>> {
        Ok(self
            .records()?
            .into_iter()
            .enumerate()
            .filter(|(_, t)| scope.includes(t))
            .collect())
    }

    /// Mark the task at 1-based `index` within `scope` as complete.
    pub fn complete(&self, scope: &ViewScope, index: usize) -> TrackerResult<Completion> {
        let mut load = self.load()?;
        let pos = resolve_index(&load.records, scope, index)?;

        if load.records[pos].completed {
            debug!(index, "Task already complete");
            return Ok(Completion::AlreadyComplete);
        }

        load.records[pos].completed = true;
        self.persist(&load)?;
        info!(index, assignee = %load.records[pos].assignee, "Task marked complete");
        Ok(Completion::Completed)
    }

    /// Replace the assignee or due date of the task at 1-based `index`
    /// within `scope`. Completed tasks are locked.
    pub fn edit(
        &self,
        scope: &ViewScope,
        index: usize,
        field: TaskField,
        new_value: &str,
    ) -> TrackerResult<TaskRecord> {
        let mut load = self.load()?;
        let pos = resolve_index(&load.records, scope, index)?;

        if load.records[pos].completed {
            return Err(TrackerError::TaskLocked { index });
        }

        let task = &mut load.records[pos];
        match field {
            TaskField::Assignee => {
                let assignee = new_value.trim();
                if assignee.is_empty() {
                    return Err(TrackerError::invalid_field(field.as_str(), "must not be empty"));
                }
                codec::check_field(field.as_str(), assignee)?;
                task.assignee = assignee.to_string();
            }
            TaskField::DueDate => {
                task.due_date = parse_date(new_value.trim()).ok_or_else(|| {
                    TrackerError::invalid_field(field.as_str(), "expected YYYY-MM-DD")
                })?;
            }
        }

        let updated = task.clone();
        self.persist(&load)?;
        info!(index, field = field.as_str(), "Task updated");
        Ok(updated)
    }

    fn persist(&self, load: &TaskLoad) -> TrackerResult<()> {
        if !load.skipped.is_empty() {
            debug!(kept = load.skipped.len(), "Rewriting with undecodable lines preserved");
        }
        rewrite_lines(&self.path, &load.lines()?)
    }
}

/// Translate a 1-based position within `scope` into a position in `records`.
fn resolve_index(records: &[TaskRecord], scope: &ViewScope, index: usize) -> TrackerResult<usize> {
    let visible: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, t)| scope.includes(t))
        .map(|(pos, _)| pos)
        .collect();

    index
        .checked_sub(1)
        .and_then(|i| visible.get(i).copied())
        .ok_or(TrackerError::TaskNotFound {
            index,
            len: visible.len(),
        })
}
