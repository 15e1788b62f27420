use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::customer::{repo::SeaOrmCustomerRepository, repository::memory::InMemoryCustomerRepository, CustomerRepository};
use service::notification::{FallbackNotificationClient, HttpNotificationClient, NotificationClient};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn build_repository(cfg: &AppConfig) -> anyhow::Result<Arc<dyn CustomerRepository>> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            warn!(backend = "memory", "customer records are not persisted");
            Ok(Arc::new(InMemoryCustomerRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = models::db::DatabaseConfig::from(&cfg.database);
            let db = models::db::connect_with_config(&pool).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None).await?;
                info!("database migrations applied");
            }
            Ok(Arc::new(SeaOrmCustomerRepository::new(db)))
        }
    }
}

fn build_notification_client(cfg: &AppConfig) -> anyhow::Result<Arc<dyn NotificationClient>> {
    if !cfg.notification.enabled {
        warn!("notification service disabled, all notification calls use the fallback");
        return Ok(Arc::new(FallbackNotificationClient));
    }
    let client = HttpNotificationClient::from_config(&cfg.notification)?;
    info!(base_url = %cfg.notification.base_url, "notification client ready");
    Ok(Arc::new(client))
}

/// Wire backends from configuration into handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let repo = build_repository(cfg).await?;
    let client = build_notification_client(cfg)?;
    Ok(AppState::new(repo, client, cfg.organisation.clone()))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}

/// Serve until `shutdown` resolves, then finish in-flight requests.
pub async fn run_until(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "customer service listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    run_until(cfg, shutdown_signal()).await
}
