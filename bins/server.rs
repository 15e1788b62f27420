use std::time::Duration;

use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn init_logging(cfg: Option<&configs::AppConfig>) {
    let json = cfg.map_or(false, |c| c.logging.format == configs::LogFormat::Json);
    common::utils::logging::init_logging(json);
    info!(service = "customer-service", event = "logger_init", json, "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // load .env first so RUST_LOG, DATABASE_URL and friends apply
    dotenv().ok();
    let cfg = configs::AppConfig::load_or_env();
    init_logging(cfg.as_ref().ok());

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "customer-service",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    // config.toml first, then TOKIO_WORKER_THREADS
    let worker_threads = match &cfg {
        Ok(cfg) => cfg.server.worker_threads,
        Err(e) => {
            warn!(service = "customer-service", event = "config_invalid", error = %e, "configuration rejected");
            std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok())
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "customer-service", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "customer-service",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "customer service starting"
    );

    // server::run drains in-flight requests on Ctrl+C by itself; the select
    // here only bounds how long that may take
    rt.block_on(async move {
        let mut server_task = tokio::spawn(server::run());

        let finished = tokio::select! {
            res = &mut server_task => Some(res),
            _ = tokio::signal::ctrl_c() => {
                info!(service = "customer-service", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                match tokio::time::timeout(Duration::from_secs(10), &mut server_task).await {
                    Ok(res) => Some(res),
                    Err(_) => None,
                }
            }
        };

        match finished {
            Some(Ok(Ok(()))) => {
                info!(service = "customer-service", event = "stop", %service_id, pid, "customer service stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Some(Ok(Err(e))) => {
                error!(service = "customer-service", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
            Some(Err(e)) => {
                error!(service = "customer-service", event = "task_join_error", error = %e, "server task join error");
                std::process::ExitCode::FAILURE
            }
            None => {
                warn!(service = "customer-service", event = "shutdown_timeout", "in-flight requests did not drain in time");
                server_task.abort();
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
