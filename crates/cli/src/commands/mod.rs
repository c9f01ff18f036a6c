//! Command dispatch.
//!
//! Builds one [`ApiClient`] per invocation around the saved session,
//! runs the requested command, then saves whatever session the server
//! left in the cookie jar.

mod auth;
mod logs;
mod projects;
mod tasks;

use anyhow::Context;
use reqwest::Url;

use makerlog_client::{ApiClient, ClientConfig};

use crate::cli::{Cli, Command};
use crate::output::OutputMode;
use crate::session::SessionStore;

pub use projects::load_overview;

/// Run a parsed command line to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli
        .api_url
        .clone()
        .map(ClientConfig::new)
        .unwrap_or_else(ClientConfig::from_env);
    let store = SessionStore::from_env()?;
    run_with_store(cli, config, &store).await
}

/// Same as [`run`], with explicit configuration and session store.
pub async fn run_with_store(
    cli: Cli,
    config: ClientConfig,
    store: &SessionStore,
) -> anyhow::Result<()> {
    let session_url = Url::parse(&config.base_url)
        .with_context(|| format!("Invalid API base URL '{}'", config.base_url))?;
    let jar = store.load(&session_url)?;
    let client = ApiClient::with_cookie_jar(config, jar)?;

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    tracing::debug!(base_url = client.base_url(), "Using API server");

    let result = dispatch(&client, cli.command, mode).await;

    // Persist even on failure: a 401 may have cleared the cookie.
    store.save(client.cookie_jar(), &session_url)?;
    result
}

async fn dispatch(client: &ApiClient, command: Command, mode: OutputMode) -> anyhow::Result<()> {
    match command {
        Command::Register {
            email,
            password,
            name,
        } => auth::register(client, email, password, name, mode).await,
        Command::Login { email, password } => auth::login(client, email, password, mode).await,
        Command::Logout => auth::logout(client).await,
        Command::Me => auth::me(client, mode).await,
        Command::Projects { action } => projects::run(client, action, mode).await,
        Command::Tasks { action } => tasks::run(client, action, mode).await,
        Command::Logs { action } => logs::run(client, action, mode).await,
        Command::Today { action } => logs::today(client, action, mode).await,
    }
}
