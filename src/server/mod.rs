//! HTTP surface: three JSON endpoints plus the client bundle.
//!
//! ```text
//! GET  /api/dropdown-options     template table
//! POST /api/normalize-filename   {"filename"} → {"normalized_filename"}
//! POST /api/extract-first-page   multipart pdf → base64 JPEG + options
//! GET  /*                        static file, else index.html
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod upload;

use crate::config::ServerConfig;
use crate::error::TemplateError;
use crate::pipeline::render::PdfiumLibrary;
use crate::templates::TemplateTable;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use handlers::{dropdown_options, extract_first_page, normalize_filename};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub templates: Arc<TemplateTable>,
    pub pdfium: PdfiumLibrary,
}

impl AppState {
    pub fn new(templates: TemplateTable, pdfium: PdfiumLibrary) -> Self {
        Self {
            templates: Arc::new(templates),
            pdfium,
        }
    }

    /// Load the template table named by the config (or the built-ins).
    pub fn from_config(config: &ServerConfig) -> Result<Self, TemplateError> {
        let templates = match config.templates_path {
            Some(ref path) => TemplateTable::from_json_file(path)?,
            None => TemplateTable::builtin(),
        };
        Ok(Self::new(templates, config.pdfium.clone()))
    }
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let index = ServeFile::new(config.static_root.join("index.html"));
    let client_bundle = ServeDir::new(&config.static_root).fallback(index);

    Router::new()
        .route("/api/dropdown-options", get(dropdown_options))
        .route("/api/normalize-filename", post(normalize_filename))
        .route("/api/extract-first-page", post(extract_first_page))
        .fallback_service(client_bundle)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C / SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = config
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    info!(
        "{} templates loaded, static root {}",
        state.templates.len(),
        config.static_root.display()
    );
    let app = router(state, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
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
