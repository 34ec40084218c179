use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use uuid::Uuid;

const SERVICE: &str = "customer-api";

fn init_logging() {
    // .env must be loaded before the subscriber reads RUST_LOG / LOG_FORMAT
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = SERVICE, event = "logger_init", "tracing subscriber initialized");
}

/// Route panics from any thread through tracing so they reach the same sink
/// (and format) as the rest of the service log.
fn install_panic_hook(instance: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = SERVICE,
            event = "panic",
            %instance,
            pid = std::process::id(),
            message = %info,
            "unhandled panic occurred"
        );
    }));
}

/// Multi-threaded runtime; `server.worker_threads` has already been
/// normalized to a positive count.
fn build_runtime(cfg: &AppConfig) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

/// Resolves on the first Ctrl+C. If the signal handler cannot be installed the
/// server keeps running and can only be stopped from outside.
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(service = SERVICE, event = "shutdown_signal", "received Ctrl+C, draining requests"),
        Err(e) => {
            warn!(service = SERVICE, event = "signal_unavailable", error = %e, "Ctrl+C handler not installed");
            std::future::pending::<()>().await;
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let instance = Uuid::new_v4();
    install_panic_hook(instance);

    // a broken config.toml is fatal; only a missing one falls back to env vars
    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        event = "start",
        %instance,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        bind = %cfg.server.bind_addr(),
        "customer api starting"
    );

    // Ctrl+C stops accepting connections; requests already in flight (and the
    // saves they started) complete before the runtime is dropped.
    match rt.block_on(server::startup::run_with_config(cfg, ctrl_c())) {
        Ok(()) => {
            info!(service = SERVICE, event = "stop", %instance, "server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = SERVICE, event = "run_failed", %instance, error = %format!("{e:#}"), "server exited with error");
            ExitCode::FAILURE
        }
    }
}
