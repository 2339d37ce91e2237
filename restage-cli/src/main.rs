use anyhow::{Context, Result};
use clap::Parser;
use restage_orchestrations::{RdsControlPlane, RunContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

mod cli;
mod commands;
mod config;

use cli::{Args, Mode};
use config::Config;

/// Initialize tracing:
/// 1. Console output (stderr) - text, or JSON with RESTAGE_LOG_FORMAT=json
/// 2. File output (RESTAGE_LOG_DIR/restage.log) - only when the directory is set
///
/// The returned guard must stay alive for the file writer to flush.
fn initialize_tracing() -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,restage_cli=debug,restage_orchestrations=debug".into());

    let json = std::env::var("RESTAGE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout is reserved for command output
    let console_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let (file_layer, guard) = match std::env::var("RESTAGE_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)?;

            let file_appender = tracing_appender::rolling::never(&dir, "restage.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer().with_writer(file_writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Build the run context against the real control plane
async fn connect() -> Result<RunContext> {
    let config = Config::load().context("Failed to load configuration")?;
    tracing::debug!(
        live = %config.live_identifier,
        staging = %config.staging_identifier,
        instance_class = %config.instance_class,
        subnet_group = %config.subnet_group,
        "Configuration loaded"
    );

    let control_plane = RdsControlPlane::from_env().await;
    Ok(RunContext::new(Arc::new(control_plane), config.refresh_settings()))
}

async fn run(mode: Mode) -> Result<()> {
    match mode {
        Mode::Run { output } => {
            let ctx = connect().await?;
            commands::refresh::run_refresh(&ctx, output).await
        }
        Mode::Snapshot { output } => {
            let ctx = connect().await?;
            commands::instance::run_snapshot(&ctx, output).await
        }
        Mode::Wait { identifier, output } => {
            let ctx = connect().await?;
            commands::instance::run_wait(&ctx, identifier, output).await
        }
        Mode::Swap { restore_identifier, output } => {
            let ctx = connect().await?;
            commands::instance::run_swap(&ctx, restore_identifier, output).await
        }
        Mode::Flow { name } => commands::flow::run_flow(name),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let _guard = initialize_tracing()?;

    run(args.mode).await
}
