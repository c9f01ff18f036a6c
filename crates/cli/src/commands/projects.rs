use makerlog_client::{ApiClient, ApiResult};
use makerlog_core::models::{CreateProject, UpdateProject};
use makerlog_core::types::DbId;

use crate::cli::ProjectAction;
use crate::output::{self, OutputMode, ProjectOverview};

pub async fn run(client: &ApiClient, action: ProjectAction, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        ProjectAction::List => {
            let projects = client.get_projects().await?;
            output::emit(mode, projects.as_slice(), output::render_projects)
        }
        ProjectAction::Show { id } => {
            let overview = load_overview(client, id).await?;
            output::emit(mode, &overview, output::render_overview)
        }
        ProjectAction::Create { name, description } => {
            let project = client
                .create_project(&CreateProject { name, description })
                .await?;
            tracing::info!(project_id = project.id, "Project created");
            output::emit(mode, &project, output::render_project)
        }
        ProjectAction::Update {
            id,
            name,
            description,
        } => {
            let project = client
                .update_project(id, &UpdateProject { name, description })
                .await?;
            output::emit(mode, &project, output::render_project)
        }
        ProjectAction::Delete { id } => {
            client.delete_project(id).await?;
            tracing::info!(project_id = id, "Project deleted");
            Ok(())
        }
    }
}

/// Fetch a project, its tasks and its log entries concurrently.
pub async fn load_overview(client: &ApiClient, id: DbId) -> ApiResult<ProjectOverview> {
    let (project, tasks, log_entries) = tokio::try_join!(
        client.get_project(id),
        client.get_tasks(Some(id)),
        client.get_log_entries(Some(id)),
    )?;
    Ok(ProjectOverview {
        project,
        tasks,
        log_entries,
    })
}
