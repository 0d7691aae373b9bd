//! Command dispatch gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                    GATEWAY                        │
//!                         │                                                   │
//!   HTTP request          │  ┌──────────┐   ┌────────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│  http    │──▶│ classifier │──▶│ dispatcher │  │
//!                         │  │  server  │   └────────────┘   └─────┬──────┘  │
//!                         │  └──────────┘                          │         │
//!                         │                                        ▼         │
//!   Message (line/TCP)    │  ┌──────────┐   ┌────────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│messaging │──▶│  message   │──▶│  executor  │  │
//!                         │  │ listener │   │  handler   │   │ + registry │  │
//!                         │  └──────────┘   └────────────┘   └─────┬──────┘  │
//!                         │                                        ▼         │
//!                         │                                 ┌────────────┐   │
//!                         │                                 │  settings  │   │
//!                         │                                 │   store    │   │
//!                         │                                 └────────────┘   │
//!                         └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use command_gateway::config::{load_config, SettingsWatcher};
use command_gateway::lifecycle::signals;
use command_gateway::observability::{logging, metrics};
use command_gateway::{Gateway, GatewayConfig, Shutdown};

#[derive(Parser)]
#[command(name = "command-gateway")]
#[command(about = "Request/message dispatch gateway", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!("command-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        messaging_enabled = config.messaging.enabled,
        messaging_address = %config.messaging.bind_address,
        settings = config.settings.values.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let gateway = Gateway::new(config);

    // Settings hot reload; the watcher handle must outlive the server.
    let _watcher = match &args.config {
        Some(path) => {
            let settings = SettingsWatcher::new(path, gateway.config().clone());
            Some(settings.spawn(gateway.store(), shutdown.subscribe())?)
        }
        None => None,
    };

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        match signals::wait_for_signal().await {
            Ok(()) => signal_shutdown.trigger(),
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signals"),
        }
    });

    gateway.run(&shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
