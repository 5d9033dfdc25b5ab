//! Integration tests for the interactive menu, driven through in-memory
//! input and output buffers.

use chrono::NaiveDate;
use std::fs;
use std::io::Cursor;
use task_ledger::cli::menu::Menu;
use task_ledger::ledger::Ledger;
use task_ledger::report::ReportPaths;
use task_ledger::store::{TaskStore, UserDirectory};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn setup_ledger(dir: &TempDir) -> Ledger {
    let root = dir.path();
    Ledger::new(
        TaskStore::new(root.join("tasks.txt")),
        UserDirectory::open(root.join("user.txt")).expect("bootstrap users"),
        ReportPaths {
            task_overview: root.join("task_overview.txt"),
            user_overview: root.join("user_overview.txt"),
        },
        vec!["admin".to_string()],
    )
}

/// Run a full session with the given input lines and return the output.
fn run_session(ledger: &Ledger, lines: &[&str]) -> String {
    let mut input = lines.join("\n");
    input.push('\n');
    let mut menu = Menu::new(ledger, Cursor::new(input), Vec::new(), today());
    menu.run().expect("menu run");
    String::from_utf8(menu.into_output()).expect("utf8 output")
}

#[test]
fn login_retries_until_success() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);

    let out = run_session(
        &ledger,
        &["ghost", "x", "admin", "wrong", "admin", "password", "e"],
    );

    assert!(out.contains("User does not exist"));
    assert!(out.contains("Wrong password"));
    assert!(out.contains("Login Successful!"));
    assert!(out.contains("Goodbye!!!"));
}

#[test]
fn end_of_input_during_login_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);

    let out = run_session(&ledger, &["admin"]);

    assert!(!out.contains("Login Successful!"));
}

#[test]
fn add_task_reprompts_for_date_and_user() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);

    let out = run_session(
        &ledger,
        &[
            "admin", "password", "a", "Title", "Desc", "tomorrow", "2099-01-01", "nobody",
            "admin", "e",
        ],
    );

    assert!(out.contains("Invalid date format"));
    assert!(out.contains("User does not exist. Please enter a valid username."));
    assert!(out.contains("Task added successfully."));
    assert_eq!(
        fs::read_to_string(ledger.tasks.path()).unwrap(),
        "admin;Title;Desc;2024-06-01;2099-01-01;No\n"
    );
}

#[test]
fn view_mine_complete_then_locked() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);
    fs::write(
        ledger.tasks.path(),
        "carl;C;D;2024-01-01;2024-02-01;No\nadmin;A;D;2024-01-01;2024-02-01;No\n",
    )
    .unwrap();

    let out = run_session(
        &ledger,
        &[
            "admin", "password", "vm", "1", "1", "vm", "1", "e",
        ],
    );

    assert!(out.contains("Task marked as complete."));
    assert!(out.contains("This task has already been completed and cannot be edited."));
    let records = ledger.tasks.records().unwrap();
    assert!(!records[0].completed);
    assert!(records[1].completed);
}

#[test]
fn view_mine_edit_due_date() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);
    fs::write(
        ledger.tasks.path(),
        "admin;A;D;2024-01-01;2024-02-01;No\n",
    )
    .unwrap();

    let out = run_session(
        &ledger,
        &["admin", "password", "vm", "1", "2", "2", "2030-05-05", "e"],
    );

    assert!(out.contains("Task updated successfully."));
    assert_eq!(
        fs::read_to_string(ledger.tasks.path()).unwrap(),
        "admin;A;D;2024-01-01;2030-05-05;No\n"
    );
}

#[test]
fn member_sees_access_denied_for_statistics() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);
    ledger.users.register("bob", "pw", "pw").unwrap();

    let out = run_session(&ledger, &["bob", "pw", "ds", "gr", "e"]);

    assert!(out.contains("Error: access denied: display statistics is available to admin only"));
    assert!(out.contains("Error: access denied: generate reports is available to admin only"));
    assert!(!ledger.reports.task_overview.exists());
}

#[test]
fn register_and_invalid_option() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);

    let out = run_session(
        &ledger,
        &[
            "admin", "password", "r", "alice", "p1", "p1", "r", "alice", "p2", "p2", "zz", "e",
        ],
    );

    assert!(out.contains("New user registered successfully."));
    assert!(out.contains("Error: username already exists: alice"));
    assert!(out.contains("Invalid option, please try again."));
    assert!(ledger.users.verify("alice", "p1").unwrap());
}

#[test]
fn admin_generates_reports_from_menu() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);

    let out = run_session(&ledger, &["admin", "password", "gr", "ds", "e"]);

    assert!(out.contains("Reports generated successfully"));
    assert!(out.contains("Number of users: \t\t 1"));
    assert!(ledger.reports.task_overview.exists());
    assert!(ledger.reports.user_overview.exists());
}

#[test]
fn views_warn_about_unreadable_lines_and_keep_them() {
    let dir = TempDir::new().unwrap();
    let ledger = setup_ledger(&dir);
    fs::write(
        ledger.tasks.path(),
        "carl;C;D;2024-01-01;2024-02-01; Yes\nadmin;A;D;2024-01-01;2024-02-01;No\n",
    )
    .unwrap();

    let out = run_session(&ledger, &["admin", "password", "va", "vm", "1", "1", "e"]);

    assert_eq!(out.matches("Warning: line 1 skipped:").count(), 2);
    assert!(out.contains("Task marked as complete."));
    assert_eq!(
        fs::read_to_string(ledger.tasks.path()).unwrap(),
        "carl;C;D;2024-01-01;2024-02-01; Yes\nadmin;A;D;2024-01-01;2024-02-01;Yes\n"
    );
}
