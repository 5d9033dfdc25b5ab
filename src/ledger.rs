//! Session-aware entry points over the task store, user directory and
//! reporting engine. Both the interactive menu and the one-shot subcommands
//! go through here so access checks live in one place.

use crate::config::Config;
use crate::error::TrackerResult;
use crate::report::{self, Report, ReportPaths};
use crate::session::{Capability, Role, Session};
use crate::store::{LoginError, SkippedLine, TaskStore, UserDirectory};
use crate::types::{Completion, NewTask, TaskField, TaskRecord, ViewScope};
use chrono::NaiveDate;
use tracing::debug;

/// Tasks visible in a scope, plus the lines that could not be read.
#[derive(Debug, Clone, Default)]
pub struct TaskView {
    pub tasks: Vec<TaskRecord>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    pub tasks: TaskStore,
    pub users: UserDirectory,
    pub reports: ReportPaths,
    admins: Vec<String>,
}

impl Ledger {
    pub fn new(
        tasks: TaskStore,
        users: UserDirectory,
        reports: ReportPaths,
        admins: Vec<String>,
    ) -> Self {
        Self {
            tasks,
            users,
            reports,
            admins,
        }
    }

    /// Build from configuration, creating the credential file if needed.
    pub fn open(config: &Config) -> TrackerResult<Self> {
        let storage = &config.storage;
        let users = UserDirectory::open(storage.users_path())?;
        debug!(
            tasks = %storage.tasks_path().display(),
            users = %users.path().display(),
            "Ledger opened"
        );
        Ok(Self::new(
            TaskStore::new(storage.tasks_path()),
            users,
            storage.report_paths(),
            config.access.admins.clone(),
        ))
    }

    /// Check credentials and open a session with the user's role.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> TrackerResult<Result<Session, LoginError>> {
        Ok(self
            .users
            .authenticate(username, password)?
            .map(|()| Session::new(username, Role::for_user(username, &self.admins))))
    }

    pub fn add_task(
        &self,
        session: &Session,
        task: NewTask,
        today: NaiveDate,
    ) -> TrackerResult<TaskRecord> {
        session.require(Capability::AddTask)?;
        self.tasks.add(task, today)
    }

    /// The tasks in `scope`, numbered as the caller will see them.
    pub fn view(&self, session: &Session, scope: &ViewScope) -> TrackerResult<TaskView> {
        match scope {
            ViewScope::All => session.require(Capability::ViewAllTasks)?,
            ViewScope::Owner(name) if *name != session.username => {
                session.require(Capability::ViewAllTasks)?
            }
            ViewScope::Owner(_) => {}
        }
        let load = self.tasks.load()?;
        Ok(TaskView {
            tasks: load
                .records
                .into_iter()
                .filter(|t| scope.includes(t))
                .collect(),
            skipped: load.skipped,
        })
    }

    pub fn complete(
        &self,
        session: &Session,
        scope: &ViewScope,
        index: usize,
    ) -> TrackerResult<Completion> {
        require_edit(session, scope)?;
        self.tasks.complete(scope, index)
    }

    pub fn edit(
        &self,
        session: &Session,
        scope: &ViewScope,
        index: usize,
        field: TaskField,
        new_value: &str,
    ) -> TrackerResult<TaskRecord> {
        require_edit(session, scope)?;
        self.tasks.edit(scope, index, field, new_value)
    }

    pub fn register(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> TrackerResult<()> {
        session.require(Capability::RegisterUser)?;
        self.users.register(username, password, confirm)
    }

    pub fn generate_reports(&self, session: &Session, today: NaiveDate) -> TrackerResult<Report> {
        report::generate_reports(session, &self.tasks, &self.users, &self.reports, today)
    }

    pub fn statistics(&self, session: &Session, today: NaiveDate) -> TrackerResult<Report> {
        report::statistics(session, &self.tasks, &self.users, today)
    }
}

/// Editing through one's own view needs only `EditOwnTasks`; any other view
/// can reach other users' records.
fn require_edit(session: &Session, scope: &ViewScope) -> TrackerResult<()> {
    session.require(Capability::EditOwnTasks)?;
    match scope {
        ViewScope::Owner(name) if *name == session.username => Ok(()),
        _ => session.require(Capability::EditAnyTask),
    }
}
