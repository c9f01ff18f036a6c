//! `makerlog` -- terminal front-end for the makerlog API.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                          | Description                 |
//! |-------------------------|----------|----------------------------------|-----------------------------|
//! | `MAKERLOG_API_URL`      | no       | `http://localhost:8080`          | API server base URL         |
//! | `MAKERLOG_SESSION_FILE` | no       | `<config dir>/makerlog/session`  | Where the session is kept   |
//! | `RUST_LOG`              | no       | `makerlog=info`                  | Log filter (stderr)         |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use makerlog_cli::cli::Cli;
use makerlog_cli::commands;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "makerlog=debug,makerlog_cli=debug,makerlog_client=debug"
    } else {
        "makerlog=info,makerlog_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = commands::run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
