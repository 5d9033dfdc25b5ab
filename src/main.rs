//! Task Ledger
//!
//! File-backed task tracker with an interactive menu and one-shot
//! subcommands.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::{self, Write};
use task_ledger::cli::menu::Menu;
use task_ledger::cli::{AddArgs, Cli, Command, EditArgs, ListArgs, RegisterArgs, StatsArgs, TaskRef};
use task_ledger::config::Config;
use task_ledger::format::{self, OutputFormat};
use task_ledger::ledger::Ledger;
use task_ledger::logging::{self, LogTarget};
use task_ledger::session::Session;
use task_ledger::types::{Completion, NewTask, TaskField, ViewScope, parse_date};
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Command::Menu));
    logging::init(&LogTarget::parse(&cli.log), cli.verbose, interactive)?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    config.ensure_data_dir()?;
    debug!(data_dir = %config.storage.data_dir.display(), "Configuration resolved");

    let ledger = Ledger::open(&config)?;
    let today = Local::now().date_naive();

    match cli.command {
        Some(Command::Menu) | None => {
            let stdin = io::stdin();
            let mut menu = Menu::new(&ledger, stdin.lock(), io::stdout(), today);
            menu.run()?;
        }
        Some(command) => {
            let session = login(&ledger, cli.user.as_deref(), cli.password.as_deref())?;
            info!(user = %session.username, role = ?session.role, "Authenticated");
            run_command(&ledger, &session, command, today)?;
        }
    }

    Ok(())
}

/// Authenticate one-shot subcommands from `--user`/`--password`.
fn login(ledger: &Ledger, user: Option<&str>, password: Option<&str>) -> Result<Session> {
    let (Some(user), Some(password)) = (user, password) else {
        bail!("--user and --password are required for this command");
    };
    match ledger.login(user, password)? {
        Ok(session) => Ok(session),
        Err(reason) => bail!("login failed: {}", reason),
    }
}

fn scope_for(session: &Session, mine: bool) -> ViewScope {
    if mine {
        ViewScope::Owner(session.username.clone())
    } else {
        ViewScope::All
    }
}

fn run_command(ledger: &Ledger, session: &Session, command: Command, today: NaiveDate) -> Result<()> {
    let mut out = io::stdout().lock();
    match command {
        // Started from main before any login.
        Command::Menu => {}
        Command::Add(AddArgs {
            assignee,
            title,
            description,
            due,
        }) => {
            let due_date = parse_date(due.trim())
                .with_context(|| format!("invalid due date '{}', expected YYYY-MM-DD", due))?;
            if !ledger.users.exists(&assignee)? {
                bail!("User does not exist: {}", assignee);
            }
            let task = ledger.add_task(
                session,
                NewTask {
                    assignee,
                    title,
                    description,
                    due_date,
                },
                today,
            )?;
            writeln!(out, "Task added successfully.")?;
            write!(out, "{}", format::format_task_block(1, &task))?;
        }
        Command::List(ListArgs { mine, format: output }) => {
            let view = ledger.view(session, &scope_for(session, mine))?;
            // Warnings on stderr; stdout carries only the listing.
            eprint!("{}", format::format_skipped_warnings(&view.skipped));
            let tasks = view.tasks;
            match OutputFormat::from(output) {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?,
                OutputFormat::Text if tasks.is_empty() => writeln!(out, "No tasks to show.")?,
                OutputFormat::Text => writeln!(out, "{}", format::format_task_list(&tasks))?,
            }
        }
        Command::Complete(TaskRef { index, mine }) => {
            match ledger.complete(session, &scope_for(session, mine), index)? {
                Completion::Completed => writeln!(out, "Task marked as complete.")?,
                Completion::AlreadyComplete => writeln!(out, "Task was already complete.")?,
            }
        }
        Command::Edit(EditArgs {
            task: TaskRef { index, mine },
            assignee,
            due,
        }) => {
            let (field, value) = match (assignee, due) {
                (Some(name), _) => {
                    if !ledger.users.exists(name.trim())? {
                        bail!("User does not exist: {}", name);
                    }
                    (TaskField::Assignee, name)
                }
                (None, Some(due)) => (TaskField::DueDate, due),
                (None, None) => bail!("nothing to edit: pass --assignee or --due"),
            };
            let task = ledger.edit(session, &scope_for(session, mine), index, field, &value)?;
            writeln!(out, "Task updated successfully.")?;
            write!(out, "{}", format::format_task_block(index, &task))?;
        }
        Command::Register(RegisterArgs {
            username,
            new_password,
            confirm,
        }) => {
            ledger.register(session, username.trim(), &new_password, &confirm)?;
            writeln!(out, "New user registered successfully.")?;
        }
        Command::Report => {
            ledger.generate_reports(session, today)?;
            writeln!(
                out,
                "Reports generated successfully: {}, {}",
                ledger.reports.task_overview.display(),
                ledger.reports.user_overview.display()
            )?;
        }
        Command::Stats(StatsArgs { format: output }) => {
            let report = ledger.statistics(session, today)?;
            match OutputFormat::from(output) {
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    serde_json::to_string_pretty(&format::statistics_json(&report))?
                )?,
                OutputFormat::Text => write!(out, "{}", format::render_statistics(&report))?,
            }
        }
    }
    Ok(())
}
