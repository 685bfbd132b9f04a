//! HTTP API
//!
//! Every route is a thin proxy over [`crate::services`]: validate the input,
//! call the upstream, reshape the result. Handlers share only the
//! `Arc`-wrapped clients in [`AppState`].

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod routes;

use crate::client::{DirectoryApi, GenerativeApi, OpenAiClient, RegistryClient};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{self, ImageStore};
use routes::{
    badge_handler, health_handler, nonprofit_handler, render_handler, search_handler,
    titles_handler,
};

/// Shared upstream clients
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn DirectoryApi>,
    pub generator: Arc<dyn GenerativeApi>,
    pub store: Arc<dyn ImageStore>,
}

impl AppState {
    /// Build the live clients described by `config`
    pub async fn from_config(config: &Config) -> Result<Self> {
        let directory = RegistryClient::with_base_url(
            &config.registry_url,
            config.timeouts.registry(),
            config.rate_limit_per_second,
        )?;
        let generator = OpenAiClient::from_config(config)?;
        let store = storage::from_config(config).await?;

        Ok(Self {
            directory: Arc::new(directory),
            generator: Arc::new(generator),
            store,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .route("/api/nonprofit", get(nonprofit_handler))
        .route("/api/titles", post(titles_handler))
        .route("/api/badge", post(badge_handler))
        .route("/api/render-page", post(render_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on the configured address until Ctrl+C or SIGTERM
pub async fn start_server(config: &Config) -> Result<()> {
    config.validate()?;

    log::info!("Initializing upstream clients...");
    let state = AppState::from_config(config).await?;

    let address = config.server.address();
    log::info!("Binding to {}", address);
    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
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
}
