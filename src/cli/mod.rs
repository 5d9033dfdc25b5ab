//! CLI command definitions for task-ledger
//!
//! This module defines the CLI structure using clap's derive macros.
//! Running without a subcommand starts the interactive menu; the other
//! subcommands perform one operation and exit.

pub mod menu;

use crate::format::OutputFormat;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for listing and statistics subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// File-backed task tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding tasks.txt and user.txt (overrides config)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Username for one-shot subcommands
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Password for one-shot subcommands
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and run the interactive menu (default if no subcommand given)
    Menu,

    /// Add a task assigned to a user
    Add(AddArgs),

    /// List all tasks, or only your own with --mine
    List(ListArgs),

    /// Mark a task complete
    Complete(TaskRef),

    /// Change a task's assignee or due date
    Edit(EditArgs),

    /// Register a new user
    Register(RegisterArgs),

    /// Regenerate task_overview.txt and user_overview.txt (admin only)
    Report,

    /// Print task and user statistics (admin only)
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Username the task is assigned to
    #[arg(short, long)]
    pub assignee: String,

    /// Task title
    #[arg(short, long)]
    pub title: String,

    /// Task description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only tasks assigned to you
    #[arg(long)]
    pub mine: bool,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

/// A task number as shown by `list` (or `list --mine`).
#[derive(Args, Debug)]
pub struct TaskRef {
    /// 1-based task number from the listing
    pub index: usize,

    /// The number refers to the `list --mine` listing
    #[arg(long)]
    pub mine: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("change").required(true).args(["assignee", "due"])))]
pub struct EditArgs {
    #[command(flatten)]
    pub task: TaskRef,

    /// New assignee username
    #[arg(long)]
    pub assignee: Option<String>,

    /// New due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username to create
    pub username: String,

    /// Password for the new user
    #[arg(long)]
    pub new_password: String,

    /// Password confirmation
    #[arg(long)]
    pub confirm: String,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["task-ledger"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn test_edit_requires_a_change() {
        assert!(Cli::try_parse_from(["task-ledger", "edit", "1"]).is_err());

        let cli = Cli::try_parse_from(["task-ledger", "edit", "2", "--mine", "--due", "2030-01-01"])
            .unwrap();
        match cli.command {
            Some(Command::Edit(args)) => {
                assert_eq!(args.task.index, 2);
                assert!(args.task.mine);
                assert_eq!(args.due.as_deref(), Some("2030-01-01"));
                assert!(args.assignee.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_credentials() {
        let cli = Cli::try_parse_from([
            "task-ledger",
            "stats",
            "--user",
            "admin",
            "--password",
            "password",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("admin"));
        match cli.command {
            Some(Command::Stats(args)) => assert_eq!(args.format, FormatArg::Json),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
