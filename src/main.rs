//! nginx Virtual-Host Manager
//!
//! A small management daemon for an nginx reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                VHOST MANAGER                 │
//!                    │                                              │
//!   HTTP request     │  ┌─────────┐      ┌──────────────────────┐  │
//!   ─────────────────┼─▶│   api   │─────▶│       registry       │  │
//!   (form fields)    │  │handlers │      │  coarse lock, hosts  │  │
//!                    │  └─────────┘      └──────────┬───────────┘  │
//!                    │                              │              │
//!                    │             every mutation, under the lock: │
//!                    │                              ▼              │
//!                    │   ┌───────────┐      ┌──────────────┐       │
//!                    │   │  render   │◀─────│  save step   │       │
//!                    │   │nginx text │      │JSON snapshot │       │
//!                    │   └───────────┘      └──────┬───────┘       │
//!                    │                             ▼               │
//!   nginx -s reload ◀┼────────────────────[reload callback]        │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vhost_manager::api::{build_router, AppState};
use vhost_manager::{nginx_reloader, noop_reloader, LoadPolicy, Registry};

#[derive(Parser)]
#[command(name = "vhost-manager")]
#[command(about = "Management daemon for nginx virtual-host mappings", long_about = None)]
struct Args {
    /// Path to the JSON snapshot of all mappings.
    #[arg(long, default_value = "/var/lib/vhost-manager/data.json")]
    data: PathBuf,

    /// Path to the rendered nginx configuration.
    #[arg(long, default_value = "/etc/nginx/sites-enabled/default")]
    conf: PathBuf,

    /// Address the management API listens on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Reset every mapping to disabled when loading the snapshot.
    #[arg(long)]
    disable_on_load: bool,

    /// Skip the real nginx reload and report success instead.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vhost_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("vhost-manager v{} starting", env!("CARGO_PKG_VERSION"));

    let reloader = if args.debug {
        tracing::warn!("Debug mode: nginx will NOT be reloaded");
        noop_reloader()
    } else {
        nginx_reloader()
    };
    let policy = if args.disable_on_load {
        LoadPolicy::ForceDisabled
    } else {
        LoadPolicy::Preserve
    };

    let registry = Arc::new(Registry::new(&args.data, &args.conf, reloader, policy));
    if let Err(err) = registry.load() {
        tracing::error!(
            snapshot = %args.data.display(),
            error = %err,
            "Cannot load mapping snapshot"
        );
        return Err(err.into());
    }

    let listener = TcpListener::bind(&args.addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        snapshot = %args.data.display(),
        config = %args.conf.display(),
        "Management API listening"
    );

    let app = build_router(AppState { registry });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
