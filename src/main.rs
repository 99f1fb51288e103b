use labelspy_backend::{serve, AppConfig};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        "Starting LabelSpy backend (OCR timeout {}s, model {} timeout {}s)",
        config.ocr.timeout, config.gemini.model, config.gemini.timeout
    );

    serve(config).await
}
