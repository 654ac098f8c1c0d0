use crate::config::AppConfig;
use crate::database::UserRepository;
use crate::database::sqlite::SqliteRepository;
use anyhow::Context;
use axum::extract::Request;
use axum::{Router, ServiceExt};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub mod config;
mod database;
mod domain;
mod error;
mod extractors;
mod features;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
}

/// The whole service as handed to `axum::serve`.
pub type App = NormalizePath<Router>;

/// Compose every feature router on top of the shared state.
///
/// Trailing slashes are trimmed before routing, so `/api/users/` reaches the
/// same handlers as `/api/users`.
pub fn build_router(state: AppState) -> App {
    // api router, where features are composed
    let api_router = Router::new().nest("/users", features::users::users_router());

    let router = Router::new()
        .nest("/api", api_router)
        .merge(features::health::health_router())
        .merge(features::docs::docs_router())
        .fallback(features::endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // must wrap the router, a Router::layer would only run after routing
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let addr = config.bind_addr()?;

    // the one store handle for the whole process, released after the server stops
    let repo: Arc<dyn UserRepository> = Arc::new(
        SqliteRepository::connect(&config.database_url)
            .await
            .context("Failed to initialize database")?,
    );
    tracing::info!("Connected to SQLite database at {}", config.database_url);

    let app = build_router(AppState {
        users: repo.clone(),
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repo.close().await;
    served.context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
