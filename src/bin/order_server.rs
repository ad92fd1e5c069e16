//! Веб-сервер для формы ордеров (frontend/index.html)
//! POST /market-order, /limit-order, /oco-order; GET /health

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures_order_bot::bot::OrderService;
use futures_order_bot::config::{BotSettings, Credentials};
use futures_order_bot::exchange::create_exchange;
use futures_order_bot::logging::init_logging;
use futures_order_bot::web::{create_router, AppState};
use log::{info, warn};

#[derive(Parser)]
#[command(name = "order_server", about = "Web API for placing futures orders")]
struct Args {
    /// Settings file (defaults to config/bot.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Overrides server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = BotSettings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    init_logging(settings.log_file.as_deref())?;

    // Без ключей работают только запросы с "test": true
    let credentials = Credentials::from_env().unwrap_or_else(|e| {
        warn!("{} - live orders will be rejected by the exchange", e);
        Credentials::default()
    });

    let exchange = create_exchange(&settings, credentials)?;
    let state = AppState::new(OrderService::new(exchange, &settings));
    let app = create_router(state, &settings.server.static_dir);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    info!("Order server listening on http://{}", addr);
    println!("🚀 Order server starting on http://{}", addr);
    println!("📊 Static files from {}", settings.server.static_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Order server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
    }
}
