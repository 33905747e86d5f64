use crate::api::routes;
use crate::cli::ServeOpts;
use crate::config::{BindMode, Config};
use crate::db::{AdvocateStore, SqliteAdvocateStore};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct ApiState {
    /// `None` when no database is configured; requests then fail with 500.
    pub store: Option<Arc<dyn AdvocateStore>>,
    pub start_time: std::time::Instant,
    pub version: String,
}

impl ApiState {
    pub fn new(store: Option<Arc<dyn AdvocateStore>>) -> Self {
        Self {
            store,
            start_time: std::time::Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The directory HTTP server.
pub struct ApiServer {
    state: ApiState,
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    /// Resolve the listen address and open the store described by `config`.
    pub async fn start(mut config: Config, opts: ServeOpts) -> Result<Self> {
        if let Some(ref database) = opts.database {
            config.database.apply_url(database);
        }
        let port = opts.port.unwrap_or(config.server.port);
        let addr = resolve_bind_address(&config, opts.bind.as_deref(), port)?;

        let store = SqliteAdvocateStore::from_config(&config.database)
            .context("Failed to open advocate store")?;
        if store.is_none() {
            warn!("No database configured; /api/advocates will respond with errors");
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            state: ApiState::new(store.map(|s| Arc::new(s) as Arc<dyn AdvocateStore>)),
            addr,
            shutdown_tx,
        })
    }

    /// Run the server until shutdown signal is received.
    pub async fn run_until_shutdown(&self) -> Result<()> {
        let app = routes::build_routes(self.state.clone());
        let shutdown_rx = self.shutdown_tx.subscribe();

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        info!(
            "Advocate directory v{} listening on {}",
            self.state.version, self.addr
        );
        print_startup_banner(&self.state, &self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown_rx))
            .await?;

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Trigger graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Wait for Ctrl+C, SIGTERM, or an explicit [`ApiServer::shutdown`].
async fn shutdown_signal(mut shutdown_rx: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
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
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown requested");
        }
    }
}

/// Resolve the bind address from configuration.
pub fn resolve_bind_address(
    config: &Config,
    bind_override: Option<&str>,
    port: u16,
) -> Result<SocketAddr> {
    let bind = match bind_override {
        Some(b) => b.parse().map_err(anyhow::Error::msg)?,
        None => config.server.bind,
    };

    let host = match bind {
        BindMode::Loopback => "127.0.0.1",
        BindMode::Lan => "0.0.0.0",
        BindMode::Custom => config
            .server
            .custom_bind_host
            .as_deref()
            .unwrap_or("0.0.0.0"),
    };

    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))
}

fn print_startup_banner(state: &ApiState, addr: &SocketAddr) {
    let store = if state.store.is_some() {
        "sqlite"
    } else {
        "not configured"
    };

    info!("-------------------------------------------");
    info!("  Advocate Directory v{}", state.version);
    info!("  Listening on: http://{}", addr);
    info!("  Store: {}", store);
    info!("  Advocates: http://{}/api/advocates", addr);
    info!("  Health: http://{}/api/health", addr);
    info!("-------------------------------------------");
}
