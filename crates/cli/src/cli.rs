//! CLI definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use makerlog_core::log_date;
use makerlog_core::models::TaskStatus;
use makerlog_core::types::DbId;

/// makerlog - track projects, tasks and what you did each day
#[derive(Parser, Debug)]
#[command(name = "makerlog", version, about = "Track projects, tasks and daily work logs")]
pub struct Cli {
    /// API server base URL
    #[arg(long, global = true, env = "MAKERLOG_API_URL")]
    pub api_url: Option<String>,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and start a session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MAKERLOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: String,
    },

    /// Start a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MAKERLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Me,

    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage log entries
    Logs {
        #[command(subcommand)]
        action: LogAction,
    },

    /// Show today's log entries, or log something for today
    Today {
        #[command(subcommand)]
        action: Option<TodayAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// List projects
    List,

    /// Show a project with its tasks and log entries
    Show { id: DbId },

    /// Create a project
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Update a project's name and/or description
    Update {
        id: DbId,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a project
    Delete { id: DbId },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// List tasks
    List {
        /// Only tasks of this project
        #[arg(short, long)]
        project: Option<DbId>,
    },

    /// Show a task
    Show { id: DbId },

    /// Create a task in a project
    Create {
        title: String,
        #[arg(short, long)]
        project: DbId,
        #[arg(short, long, default_value = "")]
        description: String,
        /// todo, in_progress or done (server default: todo)
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Update a task
    Update {
        id: DbId,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// Move the task to another project
        #[arg(short, long)]
        project: Option<DbId>,
    },

    /// Delete a task
    Delete { id: DbId },
}

/// Optional associations and date shared by log create/update.
#[derive(Args, Debug, Default)]
pub struct LogFields {
    /// Link to a task
    #[arg(short, long)]
    pub task: Option<DbId>,

    /// Link to a project
    #[arg(short, long)]
    pub project: Option<DbId>,

    /// Calendar day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum LogAction {
    /// List log entries
    List {
        /// Only entries linked to this project
        #[arg(short, long)]
        project: Option<DbId>,
    },

    /// Show a log entry
    Show { id: DbId },

    /// Create a log entry
    Create {
        content: String,
        #[command(flatten)]
        fields: LogFields,
    },

    /// Update a log entry
    Update {
        id: DbId,
        #[arg(short, long)]
        content: Option<String>,
        #[command(flatten)]
        fields: LogFields,
    },

    /// Delete a log entry
    Delete { id: DbId },
}

#[derive(Subcommand, Debug)]
pub enum TodayAction {
    /// Log progress for the local calendar day
    Add {
        content: String,
        #[arg(short, long)]
        task: Option<DbId>,
        #[arg(short, long)]
        project: Option<DbId>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    log_date::parse(value).map_err(|e| e.to_string())
}
