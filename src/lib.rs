//! Backend for the LabelSpy label-analysis bot.
//!
//! Two stateless endpoints forward client input to cloud providers and
//! reshape the replies:
//!
//! * `POST /api/ocr` sends a base64 image to the OCR provider and flattens the
//!   annotation into text ([`ocr::normalize_response`]).
//! * `POST /api/analyze` prompts the language model and recovers the JSON
//!   object embedded in its reply ([`extraction::ReplyNormalizer`]).

pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod ocr;
pub mod providers;
pub mod server;

pub use config::AppConfig;
pub use error::{ApiError, ExtractionError};
pub use extraction::{extract_json, ReplyNormalizer};
pub use model::{AnalysisResult, Mode, Recipe, RecipeSet, RecipeType, RiskLevel};
pub use ocr::{normalize_response, normalize_text};
pub use server::{router, serve, AppState};
