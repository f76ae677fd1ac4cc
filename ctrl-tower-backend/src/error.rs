use std::time::Duration;

/// Errors surfaced by the AirLabs clients and configuration.
///
/// Dropped schedule records are not errors; they are counted in
/// `MappedSchedules::rejected`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TowerError {
    /// Missing or invalid credential / configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The response envelope does not have the expected shape
    #[error("Invalid API response format: {0}")]
    Format(String),

    /// Non-success HTTP status
    #[error("AirLabs API error: HTTP {status} {reason}")]
    Fetch { status: u16, reason: String },

    /// The request exceeded the configured bound
    #[error("Request timed out after {}s. Please try again.", .0.as_secs())]
    Timeout(Duration),

    /// Connection-level failure other than a timeout
    #[error("Network error: {0}")]
    Network(String),

    /// AirLabs answered with an error envelope instead of data
    #[error("AirLabs API error ({code}): {message}")]
    Api { code: String, message: String },
}

impl TowerError {
    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return TowerError::Timeout(timeout);
        }
        if let Some(status) = err.status() {
            return TowerError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        if err.is_decode() {
            return TowerError::Format(err.to_string());
        }
        TowerError::Network(err.to_string())
    }

    /// Short category name used in logs
    pub fn category(&self) -> &'static str {
        match self {
            TowerError::Configuration(_) => "configuration",
            TowerError::Format(_) => "format",
            TowerError::Fetch { .. } => "fetch",
            TowerError::Timeout(_) => "timeout",
            TowerError::Network(_) => "network",
            TowerError::Api { .. } => "api",
        }
    }

    /// Whether a user-initiated retry can succeed without changing config.
    /// Nothing in the backend retries automatically.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TowerError::Configuration(_))
    }
}
