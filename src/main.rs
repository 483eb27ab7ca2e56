mod config;
mod error;
mod generator;
mod logging;
mod models;
mod request_id;
mod router;

use clap::Parser;
use config::{Config, Overrides};
use tokio::signal;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ai-backend-stub")]
#[command(version, about = "Stub text and image generation API")]
struct Args {
    /// Bind address [default: 0.0.0.0]
    #[arg(short, long)]
    ip: Option<String>,

    /// [default: 3001]
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to an optional YAML config file
    #[arg(short, long)]
    config: Option<String>,

    /// trace, debug, info, warn, error [default: info]
    #[arg(short, long)]
    log_level: Option<String>,

    /// Also write logs to this file, truncated to its newest half when it grows too large
    #[arg(long)]
    log_file: Option<String>,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Overrides {
            ip: args.ip,
            port: args.port,
            log_level: args.log_level,
            log_file: args.log_file,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();
    let config_path = args.config.take();
    let config = Config::load(config_path.as_deref(), args.into())?;

    logging::init_logging(&config.logging);
    if let Some(path) = &config_path {
        info!("Configuration loaded successfully from: {}", path);
    }

    let app = router::build_router();

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        "{} v{} started on http://{}",
        router::SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}
