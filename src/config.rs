use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration, loaded once at startup
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// OCR provider settings
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Generative model settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Reply post-processing settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Address the HTTP server binds to
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body in bytes (base64 images are ~4/3 of the file size)
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit: default_body_limit(),
        }
    }
}

/// Configuration for the OCR provider
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// API key for authentication (can also be set via YANDEX_API_KEY)
    pub api_key: Option<String>,
    /// Cloud folder the key belongs to (can also be set via YANDEX_FOLDER_ID)
    pub folder_id: Option<String>,
    /// Base URL for the recognition endpoint
    #[serde(default = "default_ocr_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_ocr_timeout")]
    pub timeout: u64,
    /// Image format used when the client does not send one
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Languages used when the client does not send any
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,
    /// Recognition model used when the client does not send one
    #[serde(default = "default_ocr_model")]
    pub model: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            folder_id: None,
            base_url: default_ocr_base_url(),
            timeout: default_ocr_timeout(),
            mime_type: default_mime_type(),
            language_codes: default_language_codes(),
            model: default_ocr_model(),
        }
    }
}

/// Configuration for the Gemini generative model
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key for authentication (can also be set via GEMINI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_gemini_timeout(),
        }
    }
}

/// How model replies are checked after extraction
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    /// Reject replies that do not deserialize into the expected shape
    #[serde(default)]
    pub strict_schema: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

fn default_ocr_base_url() -> String {
    "https://ocr.api.cloud.yandex.net".to_string()
}

fn default_ocr_timeout() -> u64 {
    25
}

fn default_mime_type() -> String {
    "JPEG".to_string()
}

fn default_language_codes() -> Vec<String> {
    vec!["ru".to_string(), "en".to_string()]
}

fn default_ocr_model() -> String {
    "page".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_gemini_timeout() -> u64 {
    30
}

impl OcrConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl GeminiConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with LABELSPY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Plain credential variables (YANDEX_API_KEY, YANDEX_FOLDER_ID, GEMINI_API_KEY)
    /// 4. Default values
    ///
    /// Environment variable format: LABELSPY__GEMINI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = load_config()?;
        config.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Fill credentials that are still unset from plain environment variables.
    ///
    /// Empty values count as unset.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.ocr.api_key.as_deref().map_or(true, str::is_empty) {
            self.ocr.api_key = non_empty("YANDEX_API_KEY");
        }
        if self.ocr.folder_id.as_deref().map_or(true, str::is_empty) {
            self.ocr.folder_id = non_empty("YANDEX_FOLDER_ID");
        }
        if self.gemini.api_key.as_deref().map_or(true, str::is_empty) {
            self.gemini.api_key = non_empty("GEMINI_API_KEY");
        }
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: LABELSPY__OCR__TIMEOUT
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: LABELSPY__OCR__API_KEY
        .add_source(
            Environment::with_prefix("LABELSPY")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("ocr.language_codes")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
