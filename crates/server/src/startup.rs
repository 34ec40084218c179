use std::{future::Future, net::SocketAddr, path::PathBuf};

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{customer::CustomerService, file::customer_store::FileCustomerStore, runtime};

const ENDPOINTS: [&str; 5] = [
    "GET /customers",
    "GET /customer/:id",
    "POST /customer",
    "GET /health",
    "GET /api-docs/openapi.json",
];

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file when present, otherwise env vars, then defaults. A config file
/// that fails to parse or validate stops startup.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))
}

/// Build the application for a given configuration: file-backed customer
/// store at `storage.data_file`, static interface from `storage.static_dir`.
pub fn build_app(cfg: &AppConfig) -> Router {
    let store = FileCustomerStore::new(&cfg.storage.data_file);
    let state = ServerState::new(CustomerService::new(store));
    routes::build_router(state, build_cors(), &cfg.storage.static_dir)
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(cfg.server.bind_addr().parse()?)
}

/// Prepare the data file's directory, bind `server.host:server.port` and serve
/// until `shutdown` resolves.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let data_file = PathBuf::from(&cfg.storage.data_file);
    runtime::ensure_env(&cfg.storage.static_dir, &data_file).await?;

    let listener = tokio::net::TcpListener::bind(bind_addr(&cfg)?).await?;
    serve_on(listener, &cfg, shutdown).await
}

/// Serve on an already bound listener. In-flight requests finish before this
/// returns; a save is never cut between its temp-file write and the rename.
pub async fn serve_on<F>(listener: TcpListener, cfg: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        %addr,
        data_file = %cfg.storage.data_file,
        static_dir = %cfg.storage.static_dir,
        endpoints = ?ENDPOINTS,
        "customer api listening"
    );
    axum::serve(listener, build_app(cfg)).with_graceful_shutdown(shutdown).await?;
    info!(%addr, "customer api drained");
    Ok(())
}
