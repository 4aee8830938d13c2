use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::env::check_static_dir;
use service::auth::service::AuthConfig;
use service::repo::seaorm::SeaOrmStore;
use service::seed;
use service::services::Services;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{ApiSettings, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {e}", cfg.host, cfg.port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c; shutdown only on process exit");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Connect, migrate and seed, then assemble the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        models::db::migrate(&db).await.map_err(|e| StartupError::Database(e.to_string()))?;
    }

    let store = Arc::new(SeaOrmStore::new(db));
    let services = Services::from_store(store, AuthConfig::from(&cfg.auth));
    seed::run(&services, &cfg.seed, &cfg.api.debug_check_email).await?;

    let api = ApiSettings::from_config(&cfg.api);
    if api.expose_debug_endpoint {
        warn!(check_email = %api.debug_check_email, "/api/auth/debug is mounted; disable api.expose_debug_endpoint in production");
    }
    let static_dir = match cfg.server.static_dir.as_deref() {
        Some(dir) if check_static_dir(Some(dir)).await => Some(dir),
        _ => None,
    };
    Ok(routes::build_router(AppState::new(services, api), build_cors(), static_dir))
}

/// Serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting crm auth server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut cfg = configs::ServerConfig::default();
        cfg.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
        cfg.host = "127.0.0.1".into();
        assert_eq!(bind_addr(&cfg).unwrap().port(), cfg.port);
    }

    #[tokio::test]
    async fn builds_against_in_memory_sqlite() {
        let cfg = configs::load_from_str("[database]\nurl = \"sqlite::memory:\"\n").unwrap();
        assert!(build_app(&cfg).await.is_ok());
    }
}
