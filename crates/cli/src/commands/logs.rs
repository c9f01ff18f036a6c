use chrono::Local;

use makerlog_client::ApiClient;
use makerlog_core::models::{CreateLogEntry, UpdateLogEntry};

use crate::cli::{LogAction, LogFields, TodayAction};
use crate::output::{self, OutputMode};

pub async fn run(client: &ApiClient, action: LogAction, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        LogAction::List { project } => {
            let entries = client.get_log_entries(project).await?;
            output::emit(mode, entries.as_slice(), output::render_log_entries)
        }
        LogAction::Show { id } => {
            let entry = client.get_log_entry(id).await?;
            output::emit(mode, &entry, output::render_log_entry)
        }
        LogAction::Create {
            content,
            fields: LogFields {
                task,
                project,
                date,
            },
        } => {
            let entry = client
                .create_log_entry(&CreateLogEntry {
                    task_id: task,
                    project_id: project,
                    content,
                    log_date: date,
                })
                .await?;
            tracing::info!(log_entry_id = entry.id, "Log entry created");
            output::emit(mode, &entry, output::render_log_entry)
        }
        LogAction::Update {
            id,
            content,
            fields: LogFields {
                task,
                project,
                date,
            },
        } => {
            let entry = client
                .update_log_entry(
                    id,
                    &UpdateLogEntry {
                        task_id: task,
                        project_id: project,
                        content,
                        log_date: date,
                    },
                )
                .await?;
            output::emit(mode, &entry, output::render_log_entry)
        }
        LogAction::Delete { id } => {
            client.delete_log_entry(id).await?;
            tracing::info!(log_entry_id = id, "Log entry deleted");
            Ok(())
        }
    }
}

/// List today's entries, or add one dated on the local calendar day.
pub async fn today(
    client: &ApiClient,
    action: Option<TodayAction>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let day = Local::now().date_naive();

    if let Some(TodayAction::Add {
        content,
        task,
        project,
    }) = action
    {
        let entry = client
            .create_log_entry(&CreateLogEntry {
                task_id: task,
                project_id: project,
                content,
                log_date: Some(day),
            })
            .await?;
        tracing::info!(log_entry_id = entry.id, "Logged progress for today");
    }

    let entries = client.get_today_log_entries().await?;
    output::emit(mode, entries.as_slice(), |entries| {
        output::render_today(day, entries)
    })
}
