//! Human-readable and JSON rendering of API results.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use makerlog_core::models::{LogEntry, Project, Task, TaskStatus, User};

/// Output mode for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// A project together with its tasks and log entries.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub project: Project,
    pub tasks: Vec<Task>,
    pub log_entries: Vec<LogEntry>,
}

/// Print `value` as pretty JSON, or as the text produced by `human`.
pub fn emit<T: Serialize + ?Sized>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputMode::Human => println!("{}", human(value)),
    }
    Ok(())
}

pub fn render_user(user: &User) -> String {
    format!("{} <{}> (id {})", user.name, user.email, user.id)
}

pub fn render_project(project: &Project) -> String {
    if project.description.is_empty() {
        format!("#{} {}", project.id, project.name)
    } else {
        format!("#{} {} - {}", project.id, project.name, project.description)
    }
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet.".to_string();
    }
    projects
        .iter()
        .map(render_project)
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "[ ]",
        TaskStatus::InProgress => "[~]",
        TaskStatus::Done => "[x]",
    }
}

pub fn render_task(task: &Task) -> String {
    let mut line = format!(
        "{} #{} {} ({})",
        status_marker(task.status),
        task.id,
        task.title,
        task.status
    );
    if !task.description.is_empty() {
        let _ = write!(line, "\n    {}", task.description);
    }
    line
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }
    tasks.iter().map(render_task).collect::<Vec<_>>().join("\n")
}

pub fn render_log_entry(entry: &LogEntry) -> String {
    let mut links = Vec::new();
    if let Some(task_id) = entry.task_id {
        links.push(format!("task #{task_id}"));
    }
    if let Some(project_id) = entry.project_id {
        links.push(format!("project #{project_id}"));
    }

    let mut line = format!("#{} {}", entry.id, entry.log_date);
    if !links.is_empty() {
        let _ = write!(line, " [{}]", links.join(", "));
    }
    let _ = write!(line, "\n    {}", entry.content.replace('\n', "\n    "));
    line
}

pub fn render_log_entries(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No log entries.".to_string();
    }
    entries
        .iter()
        .map(render_log_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_overview(overview: &ProjectOverview) -> String {
    format!(
        "{}\n\nTasks ({}):\n{}\n\nLog entries ({}):\n{}",
        render_project(&overview.project),
        overview.tasks.len(),
        render_tasks(&overview.tasks),
        overview.log_entries.len(),
        render_log_entries(&overview.log_entries),
    )
}

/// Today's entries under a dated heading, with the local time each was
/// written.
pub fn render_today(day: NaiveDate, entries: &[LogEntry]) -> String {
    let mut out = format!(
        "Today - {}\nToday's logs ({}):",
        day.format("%A, %B %-d, %Y"),
        entries.len()
    );
    if entries.is_empty() {
        out.push_str("\nNo logs yet for today.");
        return out;
    }
    for entry in entries {
        let written = entry.created_at.with_timezone(&Local).format("%H:%M");
        let _ = write!(
            out,
            "\n{written}  {}",
            entry.content.replace('\n', "\n       ")
        );
    }
    out
}
