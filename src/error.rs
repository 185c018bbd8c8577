use thiserror::Error;

/// Unified error type for mscore
#[derive(Error, Debug)]
pub enum MscoreError {
    // Proxy errors
    #[error("Invalid proxy format: {0}")]
    InvalidProxyFormat(String),

    #[error("Proxy validation failed: {0}")]
    ProxyValidationFailed(String),

    // Request errors
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request failed after {retries} retries: {message}")]
    ExhaustedRetries { retries: u32, message: String },

    // Onboarding errors
    #[error("No referral code available")]
    MissingReferralCode,

    #[error("Invalid wallet count: {0}")]
    InvalidWalletCount(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for mscore operations
pub type Result<T> = std::result::Result<T, MscoreError>;

// Transport failures are transient and consume retry budget
impl From<reqwest::Error> for MscoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MscoreError::RequestFailed(format!("timeout: {}", err))
        } else {
            MscoreError::RequestFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for MscoreError {
    fn from(err: url::ParseError) -> Self {
        MscoreError::InvalidConfig(err.to_string())
    }
}
