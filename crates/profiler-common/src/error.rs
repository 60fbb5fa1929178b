//! Error types for wind-profiler crates.

use thiserror::Error;

/// Result type alias using ProfileError.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Primary error type for profile extraction.
#[derive(Debug, Error)]
pub enum ProfileError {
    // === Input validation ===
    #[error("Invalid value for '{param}': {message}")]
    InvalidInput { param: String, message: String },

    // === Resolution / transfer ===
    #[error("No published run found for {model} (forecast hour {forecast_hour:?}) within the lookback window")]
    Unavailable {
        model: String,
        forecast_hour: Option<u32>,
    },

    #[error("Transfer failed for {url}: {message}")]
    TransferFailure { url: String, message: String },

    // === Dataset ===
    #[error("Failed to decode forecast artifact: {0}")]
    DecodeFailure(String),

    #[error("Grid indices ({row}, {col}) out of bounds for grid {rows}x{cols}")]
    BoundsError {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    // === Terrain ===
    #[error("No elevation tile for {lat:.4}, {lon:.4} (expected {tile})")]
    TerrainNotFound { lat: f64, lon: f64, tile: String },

    // === Infrastructure ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl ProfileError {
    /// Convenience constructor for input validation failures.
    pub fn invalid_input(param: impl Into<String>, message: impl Into<String>) -> Self {
        ProfileError::InvalidInput {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    ///
    /// `Unavailable` clears as the provider publishes; `TransferFailure`
    /// may clear on a fresh download or a fallback to cache. Everything
    /// else is terminal for the request as issued.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProfileError::Unavailable { .. }
                | ProfileError::TransferFailure { .. }
                | ProfileError::Http(_)
        )
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::DecodeFailure(format!("JSON error: {}", err))
    }
}
