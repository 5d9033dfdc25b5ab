//! Aggregate task statistics and report artifacts.

use crate::error::{TrackerError, TrackerResult};
use crate::format;
use crate::session::{Capability, Session};
use crate::store::{TaskStore, UserDirectory};
use crate::types::{TaskRecord, UserRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Counts over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub incomplete: usize,
    pub overdue: usize,
}

impl TaskSummary {
    /// Completed tasks are never counted as overdue.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a TaskRecord>, today: NaiveDate) -> Self {
        let mut summary = TaskSummary::default();
        for task in tasks {
            summary.total += 1;
            if task.completed {
                summary.completed += 1;
            } else if task.is_overdue(today) {
                summary.overdue += 1;
            }
        }
        summary.incomplete = summary.total - summary.completed;
        summary
    }

    pub fn percent_completed(&self) -> f64 {
        percentage(self.completed, self.total)
    }

    pub fn percent_incomplete(&self) -> f64 {
        percentage(self.incomplete, self.total)
    }

    pub fn percent_overdue(&self) -> f64 {
        percentage(self.overdue, self.total)
    }
}

/// Per-user breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub tasks: TaskSummary,
    /// Share of the grand total, in percent.
    pub percent_of_total: f64,
}

/// Full report as of a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub as_of: NaiveDate,
    pub total_users: usize,
    pub tasks: TaskSummary,
    pub users: Vec<UserSummary>,
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Build the report. Every directory user appears, in directory order, even
/// with no tasks. Tasks assigned to unknown users count only in the totals.
pub fn compute(tasks: &[TaskRecord], users: &[UserRecord], today: NaiveDate) -> Report {
    let overall = TaskSummary::from_tasks(tasks, today);
    let users = users
        .iter()
        .map(|user| {
            let own = TaskSummary::from_tasks(
                tasks.iter().filter(|t| t.assignee == user.username),
                today,
            );
            UserSummary {
                username: user.username.clone(),
                percent_of_total: percentage(own.total, overall.total),
                tasks: own,
            }
        })
        .collect::<Vec<_>>();

    Report {
        as_of: today,
        total_users: users.len(),
        tasks: overall,
        users,
    }
}

/// Where report artifacts are written.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub task_overview: PathBuf,
    pub user_overview: PathBuf,
}

/// Load both stores and compute the report for an authorized caller.
pub fn statistics(
    session: &Session,
    store: &TaskStore,
    directory: &UserDirectory,
    today: NaiveDate,
) -> TrackerResult<Report> {
    session.require(Capability::ViewStatistics)?;
    let tasks = store.records()?;
    let users = directory.load()?;
    Ok(compute(&tasks, &users, today))
}

/// Compute the report and overwrite both artifacts.
pub fn generate_reports(
    session: &Session,
    store: &TaskStore,
    directory: &UserDirectory,
    paths: &ReportPaths,
    today: NaiveDate,
) -> TrackerResult<Report> {
    session.require(Capability::GenerateReports)?;
    let tasks = store.records()?;
    let users = directory.load()?;
    let report = compute(&tasks, &users, today);

    write_artifact(&paths.task_overview, &format::render_task_overview(&report))?;
    write_artifact(&paths.user_overview, &format::render_user_overview(&report))?;
    info!(
        total = report.tasks.total,
        users = report.total_users,
        "Reports generated"
    );
    Ok(report)
}

fn write_artifact(path: &Path, content: &str) -> TrackerResult<()> {
    fs::write(path, content).map_err(|e| TrackerError::storage(path, e))
}
