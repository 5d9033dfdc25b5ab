//! Output formatting for task listings, report artifacts and statistics.

use crate::report::Report;
use crate::store::SkippedLine;
use crate::types::{DATE_FORMAT, TaskRecord};
use serde_json::Value;

/// Output format for listings and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Two decimals with a `%` suffix.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Format one task as a numbered display block.
pub fn format_task_block(number: usize, task: &TaskRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Task {}:\n", number));
    out.push_str(&format!("Assigned to: {}\n", task.assignee));
    out.push_str(&format!("Title: {}\n", task.title));
    out.push_str(&format!("Description: {}\n", task.description));
    out.push_str(&format!(
        "Date assigned: {}\n",
        task.assigned_date.format(DATE_FORMAT)
    ));
    out.push_str(&format!("Due date: {}\n", task.due_date.format(DATE_FORMAT)));
    out.push_str(&format!("Completed: {}\n", yes_no(task.completed)));
    out
}

/// Format a listing, numbering tasks from 1 in the order given.
pub fn format_task_list<'a>(tasks: impl IntoIterator<Item = &'a TaskRecord>) -> String {
    tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| format_task_block(i + 1, task))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One warning line per record that could not be read.
pub fn format_skipped_warnings(skipped: &[SkippedLine]) -> String {
    skipped
        .iter()
        .map(|s| format!("Warning: line {} skipped: {}\n", s.line, s.reason))
        .collect()
}

/// The global summary artifact.
pub fn render_task_overview(report: &Report) -> String {
    let t = &report.tasks;
    let mut out = String::new();
    out.push_str(&format!("Total number of tasks: {}\n", t.total));
    out.push_str(&format!("Total number of completed tasks: {}\n", t.completed));
    out.push_str(&format!("Total number of uncompleted tasks: {}\n", t.incomplete));
    out.push_str(&format!("Total number of overdue tasks: {}\n", t.overdue));
    out.push_str(&format!(
        "Percentage of incomplete tasks: {}\n",
        format_percent(t.percent_incomplete())
    ));
    out.push_str(&format!(
        "Percentage of overdue tasks: {}\n",
        format_percent(t.percent_overdue())
    ));
    out
}

/// The per-user summary artifact.
pub fn render_user_overview(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total number of users: {}\n", report.total_users));
    out.push_str(&format!("Total number of tasks: {}\n", report.tasks.total));

    for user in &report.users {
        out.push_str(&format!("\nUser: {}\n", user.username));
        out.push_str(&format!("Total tasks assigned: {}\n", user.tasks.total));
        out.push_str(&format!(
            "Percentage of total tasks: {}\n",
            format_percent(user.percent_of_total)
        ));
        if user.tasks.total > 0 {
            out.push_str(&format!(
                "Percentage completed: {}\n",
                format_percent(user.tasks.percent_completed())
            ));
            out.push_str(&format!(
                "Percentage incomplete: {}\n",
                format_percent(user.tasks.percent_incomplete())
            ));
            out.push_str(&format!(
                "Percentage overdue: {}\n",
                format_percent(user.tasks.percent_overdue())
            ));
        }
    }
    out
}

/// On-screen statistics table.
pub fn render_statistics(report: &Report) -> String {
    let rule = "-----------------------------------";
    let t = &report.tasks;
    let mut out = String::new();
    out.push_str(rule);
    out.push('\n');
    out.push_str(&format!("Number of users: \t\t {}\n", report.total_users));
    out.push_str(&format!("Number of tasks: \t\t {}\n", t.total));
    out.push_str(&format!("Completed tasks: \t\t {}\n", t.completed));
    out.push_str(&format!("Uncompleted tasks: \t\t {}\n", t.incomplete));
    out.push_str(&format!("Overdue tasks: \t\t\t {}\n", t.overdue));
    out.push_str(rule);
    out.push('\n');
    for user in &report.users {
        out.push_str(&format!(
            "{}: {} ({})\n",
            user.username,
            user.tasks.total,
            format_percent(user.percent_of_total)
        ));
    }
    out
}

/// Statistics as JSON, percentages rounded to two decimals.
pub fn statistics_json(report: &Report) -> Value {
    let round = |v: f64| (v * 100.0).round() / 100.0;
    let users: Vec<Value> = report
        .users
        .iter()
        .map(|u| {
            serde_json::json!({
                "username": u.username,
                "tasks": u.tasks,
                "percent_of_total": round(u.percent_of_total),
                "percent_completed": round(u.tasks.percent_completed()),
                "percent_incomplete": round(u.tasks.percent_incomplete()),
                "percent_overdue": round(u.tasks.percent_overdue()),
            })
        })
        .collect();

    serde_json::json!({
        "as_of": report.as_of.format(DATE_FORMAT).to_string(),
        "total_users": report.total_users,
        "tasks": report.tasks,
        "percent_incomplete": round(report.tasks.percent_incomplete()),
        "percent_overdue": round(report.tasks.percent_overdue()),
        "users": users,
    })
}
