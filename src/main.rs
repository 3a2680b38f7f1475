use anyhow::Result;
use clap::Parser;
use interview_rooms::{create_router, AppState, Config, InMemoryDirectory, StubTokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "interview-rooms", about = "Session coordination for interview rooms")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(long, default_value = "config/interview-rooms")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Token service: {} (stub, {}ms simulated latency)",
        cfg.rooms.token_base_url, cfg.rooms.token_latency_ms
    );
    info!(
        "Countdown default: {}s, connect timeout: {}s",
        cfg.rooms.default_countdown_secs, cfg.rooms.connect_timeout_secs
    );

    let token_provider = Arc::new(StubTokenProvider::new(
        cfg.rooms.token_base_url.clone(),
        Duration::from_millis(cfg.rooms.token_latency_ms),
    ));
    let directory = Arc::new(InMemoryDirectory::with_demo_users(Duration::from_millis(
        cfg.directory.lookup_latency_ms,
    )));

    let state = AppState::new(token_provider, directory, cfg.rooms.clone());
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
