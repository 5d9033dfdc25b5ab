//! Interactive login prompt and command menu.
//!
//! Input and output are injected so the whole flow can be driven from tests.
//! End of input at any prompt ends the session.

use crate::error::TrackerError;
use crate::format;
use crate::ledger::Ledger;
use crate::session::Session;
use crate::store::SkippedLine;
use crate::types::{Completion, NewTask, TaskField, ViewScope, parse_date};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "\nPlease choose one of the following options:
a - Add a new task
va - View all tasks
vm - View my tasks
gr - Generate reports
ds - Display statistics
r - Register a new user
e - Exit the program";

/// Interactive session over a ledger.
pub struct Menu<'a, R, W> {
    ledger: &'a Ledger,
    input: R,
    output: W,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(ledger: &'a Ledger, input: R, output: W, today: NaiveDate) -> Self {
        Self {
            ledger,
            input,
            output,
            today,
        }
    }

    /// Consume the menu and hand back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompt and read one line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn report_error(&mut self, err: &TrackerError) -> Result<()> {
        debug!(code = ?err.code(), error = %err, "Operation refused");
        self.say(&format!("Error: {}", err))
    }

    fn warn_skipped(&mut self, skipped: &[SkippedLine]) -> Result<()> {
        write!(self.output, "{}", format::format_skipped_warnings(skipped))?;
        Ok(())
    }

    /// Log in then run the menu until exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        if let Some(session) = self.login()? {
            self.main_loop(&session)?;
        }
        Ok(())
    }

    /// Prompt for credentials until they check out.
    pub fn login(&mut self) -> Result<Option<Session>> {
        loop {
            self.say("LOGIN")?;
            let Some(username) = self.ask("Username: ")? else {
                return Ok(None);
            };
            let Some(password) = self.ask("Password: ")? else {
                return Ok(None);
            };
            match self.ledger.login(username.trim(), &password)? {
                Ok(session) => {
                    self.say("Login Successful!")?;
                    return Ok(Some(session));
                }
                Err(reason) => self.say(&reason.to_string())?,
            }
        }
    }

    /// Dispatch menu choices for a logged-in session.
    pub fn main_loop(&mut self, session: &Session) -> Result<()> {
        loop {
            self.say(MENU)?;
            let Some(choice) = self.ask("Enter your choice: ")? else {
                return Ok(());
            };
            let keep_going = match choice.trim().to_lowercase().as_str() {
                "a" => self.add_task(session)?,
                "va" => self.view_all(session)?,
                "vm" => self.view_mine(session)?,
                "gr" => self.generate_reports(session)?,
                "ds" => self.display_statistics(session)?,
                "r" => self.register_user(session)?,
                "e" => {
                    self.say("Goodbye!!!")?;
                    return Ok(());
                }
                _ => {
                    self.say("Invalid option, please try again.")?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    // Each action returns `false` when input ran out mid-flow.

    fn add_task(&mut self, session: &Session) -> Result<bool> {
        let Some(title) = self.ask("Enter the title of the task: ")? else {
            return Ok(false);
        };
        let Some(description) = self.ask("Enter the description of the task: ")? else {
            return Ok(false);
        };
        let due_date = loop {
            let Some(raw) = self.ask("Enter the due date of the task (YYYY-MM-DD): ")? else {
                return Ok(false);
            };
            match parse_date(raw.trim()) {
                Some(date) => break date,
                None => self.say("Invalid date format. Please use YYYY-MM-DD.")?,
            }
        };
        let assignee = loop {
            let Some(name) =
                self.ask("Enter the username of the person this task is assigned to: ")?
            else {
                return Ok(false);
            };
            let name = name.trim().to_string();
            if self.ledger.users.exists(&name)? {
                break name;
            }
            self.say("User does not exist. Please enter a valid username.")?;
        };

        let task = NewTask {
            assignee,
            title,
            description,
            due_date,
        };
        match self.ledger.add_task(session, task, self.today) {
            Ok(_) => self.say("Task added successfully.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn view_all(&mut self, session: &Session) -> Result<bool> {
        match self.ledger.view(session, &ViewScope::All) {
            Ok(view) => {
                self.warn_skipped(&view.skipped)?;
                if view.tasks.is_empty() {
                    self.say("No tasks recorded.")?;
                } else {
                    self.say("All tasks:\n")?;
                    self.say(&format::format_task_list(&view.tasks))?;
                }
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn view_mine(&mut self, session: &Session) -> Result<bool> {
        let scope = ViewScope::Owner(session.username.clone());
        let tasks = match self.ledger.view(session, &scope) {
            Ok(view) => {
                self.warn_skipped(&view.skipped)?;
                view.tasks
            }
            Err(e) => {
                self.report_error(&e)?;
                return Ok(true);
            }
        };
        if tasks.is_empty() {
            self.say("You have no tasks assigned.")?;
            return Ok(true);
        }
        self.say(&format::format_task_list(&tasks))?;

        let Some(raw) = self.ask(
            "Enter the number of the task you want to view or edit, or '-1' to return to the main menu: ",
        )?
        else {
            return Ok(false);
        };
        let index = match raw.trim().parse::<i64>() {
            Ok(-1) => return Ok(true),
            Ok(n) if n >= 1 && (n as usize) <= tasks.len() => n as usize,
            _ => {
                self.say("Invalid task number. Please try again.")?;
                return Ok(true);
            }
        };

        if tasks[index - 1].completed {
            self.say("This task has already been completed and cannot be edited.")?;
            return Ok(true);
        }

        self.say("Do you want to:\n1. Mark this task as complete\n2. Edit this task")?;
        let Some(choice) = self.ask("Enter your choice (1 or 2): ")? else {
            return Ok(false);
        };
        match choice.trim() {
            "1" => match self.ledger.complete(session, &scope, index) {
                Ok(Completion::Completed) => self.say("Task marked as complete.")?,
                Ok(Completion::AlreadyComplete) => self.say("Task was already complete.")?,
                Err(e) => self.report_error(&e)?,
            },
            "2" => return self.edit_task(session, &scope, index),
            _ => self.say("Invalid choice. Please enter 1 or 2.")?,
        }
        Ok(true)
    }

    fn edit_task(&mut self, session: &Session, scope: &ViewScope, index: usize) -> Result<bool> {
        self.say("Edit the task:\n1. Assignee username\n2. Due date")?;
        let Some(choice) = self.ask("Enter your choice (1 or 2): ")? else {
            return Ok(false);
        };
        let (field, prompt) = match choice.trim() {
            "1" => (TaskField::Assignee, "Enter new username: "),
            "2" => (TaskField::DueDate, "Enter new due date (YYYY-MM-DD): "),
            _ => {
                self.say("Invalid choice. Please enter 1 or 2.")?;
                return Ok(true);
            }
        };
        let Some(value) = self.ask(prompt)? else {
            return Ok(false);
        };
        if field == TaskField::Assignee && !self.ledger.users.exists(value.trim())? {
            self.say("User does not exist.")?;
            return Ok(true);
        }
        match self.ledger.edit(session, scope, index, field, &value) {
            Ok(_) => self.say("Task updated successfully.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn register_user(&mut self, session: &Session) -> Result<bool> {
        let Some(username) = self.ask("Enter new username: ")? else {
            return Ok(false);
        };
        let Some(password) = self.ask("Enter new password: ")? else {
            return Ok(false);
        };
        let Some(confirm) = self.ask("Confirm password: ")? else {
            return Ok(false);
        };
        match self
            .ledger
            .register(session, username.trim(), &password, &confirm)
        {
            Ok(()) => self.say("New user registered successfully.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn generate_reports(&mut self, session: &Session) -> Result<bool> {
        match self.ledger.generate_reports(session, self.today) {
            Ok(_) => {
                let paths = &self.ledger.reports;
                let msg = format!(
                    "Reports generated successfully: {}, {}",
                    paths.task_overview.display(),
                    paths.user_overview.display()
                );
                self.say(&msg)?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn display_statistics(&mut self, session: &Session) -> Result<bool> {
        match self.ledger.statistics(session, self.today) {
            Ok(report) => self.say(&format::render_statistics(&report))?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }
}
