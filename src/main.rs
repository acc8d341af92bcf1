use anyhow::Context;
use clap::Parser;

use todo_api_rust::{config::AppConfig, is_development, logging, router, AppState};

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "In-memory todo/task REST API")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up API_KEY, PORT, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config: AppConfig = todo_api_rust::config::config().clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init(&config);
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    config.validate().context("invalid configuration")?;
    if is_development!() && std::env::var("API_KEY").is_err() {
        tracing::warn!("API_KEY not set, using the development key");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config).context("failed to build application state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
