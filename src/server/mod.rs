//! HTTP surface: the OCR and analysis endpoints plus CORS headers.

mod handlers;

pub use handlers::{AnalyzePayload, ErrorBody, OcrPayload, OcrResponse};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::extraction::ReplyNormalizer;
use crate::providers::{GeminiProvider, LlmProvider, OcrProvider, YandexOcrProvider};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ocr: Arc<dyn OcrProvider>,
    pub llm: Arc<dyn LlmProvider>,
    pub normalizer: ReplyNormalizer,
}

impl AppState {
    /// Wire the real providers from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, ApiError> {
        let ocr = Arc::new(YandexOcrProvider::new(&config.ocr)?);
        let llm = Arc::new(GeminiProvider::new(&config.gemini)?);
        Ok(Self::with_providers(config, ocr, llm))
    }

    /// Build state around arbitrary providers
    pub fn with_providers(
        config: AppConfig,
        ocr: Arc<dyn OcrProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let normalizer = ReplyNormalizer::new(config.analysis.strict_schema);
        AppState {
            config: Arc::new(config),
            ocr,
            llm,
            normalizer,
        }
    }
}

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit;

    Router::new()
        .route(
            "/api/ocr",
            post(handlers::ocr).options(handlers::preflight),
        )
        .route(
            "/api/analyze",
            post(handlers::analyze).options(handlers::preflight),
        )
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_METHODS, "POST,OPTIONS"))
        .layer(cors_header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .with_state(state)
}

/// Load-once configuration in, running server out
pub async fn serve(config: AppConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    if config.ocr.api_key.is_none() {
        warn!("YANDEX_API_KEY is not configured; OCR requests will fail");
    }
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not configured; analysis requests will fail");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
