use makerlog_client::ApiClient;
use makerlog_core::models::{CreateTask, UpdateTask};

use crate::cli::TaskAction;
use crate::output::{self, OutputMode};

pub async fn run(client: &ApiClient, action: TaskAction, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        TaskAction::List { project } => {
            let tasks = client.get_tasks(project).await?;
            output::emit(mode, tasks.as_slice(), output::render_tasks)
        }
        TaskAction::Show { id } => {
            let task = client.get_task(id).await?;
            output::emit(mode, &task, output::render_task)
        }
        TaskAction::Create {
            title,
            project,
            description,
            status,
        } => {
            let task = client
                .create_task(&CreateTask {
                    project_id: project,
                    title,
                    description,
                    status,
                })
                .await?;
            tracing::info!(task_id = task.id, "Task created");
            output::emit(mode, &task, output::render_task)
        }
        TaskAction::Update {
            id,
            title,
            description,
            status,
            project,
        } => {
            let task = client
                .update_task(
                    id,
                    &UpdateTask {
                        project_id: project,
                        title,
                        description,
                        status,
                    },
                )
                .await?;
            output::emit(mode, &task, output::render_task)
        }
        TaskAction::Delete { id } => {
            client.delete_task(id).await?;
            tracing::info!(task_id = id, "Task deleted");
            Ok(())
        }
    }
}
