use thiserror::Error;

/// Error types for machine translation
#[derive(Debug, Error)]
pub enum MtError {
    /// Locale code that does not parse as BCP 47
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    /// Missing credentials or other provider misconfiguration
    #[error("configuration error: {0}")]
    ConfigError(String),
    /// Request could not be sent or its body could not be read
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    /// The provider answered with a non-success status
    #[error("translation error: {0}")]
    TranslationError(String),
    /// The provider answered, but not in the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// A character conversion table could not be read
    #[error("failed to read conversion table: {0}")]
    Io(#[from] std::io::Error),
    /// A character conversion table is not valid JSON
    #[error("invalid conversion table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
