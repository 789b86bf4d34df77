//! Outbound satellite image classification.

pub mod api;
mod payload;

pub use api::{ClassifierSetupError, GeminiClassifier};
pub use payload::{DEFAULT_MIME_TYPE, ImagePayload, PayloadError};

use crate::scan::AnalysisResult;

/// The only failure text the user ever sees from a classification.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to process satellite imagery. Please check your connection and try again.";

/// Remote classifier that labels an image.
///
/// Calls block the current thread; run them off the UI thread.
pub trait Classifier: Send + Sync {
    fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, AnalysisError>;
}

/// Internal cause of a failed classification. Logged, never displayed.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisFailure {
    #[error("No API key set in ${0}")]
    MissingApiKey(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Invalid response: {0}")]
    Response(String),
    #[error("Response violated schema: {0}")]
    Schema(String),
}

impl AnalysisFailure {
    /// Transport hiccups, throttling and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => *code == 429 || (500..=599).contains(code),
            Self::MissingApiKey(_) | Self::Response(_) | Self::Schema(_) => false,
        }
    }
}

/// User-facing classification error with a fixed message.
#[derive(Debug, thiserror::Error)]
#[error("{}", ANALYSIS_FAILED_MESSAGE)]
pub struct AnalysisError {
    #[source]
    cause: AnalysisFailure,
}

impl AnalysisError {
    pub fn cause(&self) -> &AnalysisFailure {
        &self.cause
    }
}

impl From<AnalysisFailure> for AnalysisError {
    fn from(cause: AnalysisFailure) -> Self {
        Self { cause }
    }
}
