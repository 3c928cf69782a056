use std::net::SocketAddr;

use projects_repo_stats::{
    app::{build_router, AppState},
    config::{AppConfig, ConfigError},
    db::{pool::InitializePoolError, DbPool},
};
use thiserror::Error;
use tracing::{info, warn};
use utils_trace::init as tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("Config: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("InitializePool: {source}")]
    InitializePool {
        #[source]
        source: InitializePoolError,
    },
    #[error("InvalidBindAddr: {addr}: {source}")]
    InvalidBindAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let config = AppConfig::from_env().map_err(|source| MainError::Config { source })?;

    tracing_init(&config.log_level, config.log_format)
        .map_err(|source| MainError::TracingInit { source })?;

    if config.expose_error_detail {
        warn!("EXPOSE_ERROR_DETAIL is on: 500 responses include internal error text");
    }

    let pool = DbPool::initialize(&config.database_url, &config.pool)
        .map_err(|source| MainError::InitializePool { source })?;

    let app = build_router(AppState {
        pool: pool.clone(),
        expose_error_detail: config.expose_error_detail,
    });

    let bind_addr = config.bind_addr();
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|source| MainError::InvalidBindAddr { addr: bind_addr.clone(), source })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!("Server running on addr: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| MainError::Serve { source })?;

    pool.shutdown();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {err}");
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
