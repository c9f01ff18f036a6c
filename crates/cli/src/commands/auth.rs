use makerlog_client::ApiClient;
use makerlog_core::models::{LoginRequest, RegisterRequest};

use crate::output::{self, OutputMode};

pub async fn register(
    client: &ApiClient,
    email: String,
    password: String,
    name: String,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let user = client
        .register(&RegisterRequest {
            email,
            password,
            name,
        })
        .await?;
    tracing::info!(user_id = user.id, "Registered and signed in");
    output::emit(mode, &user, output::render_user)
}

pub async fn login(
    client: &ApiClient,
    email: String,
    password: String,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let user = client.login(&LoginRequest { email, password }).await?;
    tracing::info!(user_id = user.id, "Signed in");
    output::emit(mode, &user, output::render_user)
}

pub async fn logout(client: &ApiClient) -> anyhow::Result<()> {
    client.logout().await?;
    tracing::info!("Signed out");
    Ok(())
}

pub async fn me(client: &ApiClient, mode: OutputMode) -> anyhow::Result<()> {
    let user = client.get_me().await?;
    output::emit(mode, &user, output::render_user)
}
