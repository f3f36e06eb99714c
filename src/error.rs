use thiserror::Error;

/// Errors raised while talking to the catalog API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API error: HTTP {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error from a non-success response code.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, message } => {
                format!("The catalog answered {} ({})", status, message)
            }
            ApiError::InvalidUrl(url) => format!("Cannot build a request from '{}'", url),
            ApiError::Http(e) if e.is_timeout() => "The catalog did not answer in time".to_string(),
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Decode(e) => format!("Unexpected response format: {}", e),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io(e) => format!("File system error: {}", e),
            ConfigError::Parse(e) => format!("config.json is malformed: {}", e),
            ConfigError::Invalid(msg) => format!("Configuration error: {}", msg),
        }
    }
}
