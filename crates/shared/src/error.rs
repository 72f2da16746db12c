use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    /// Classifies a non-success status. GitHub reports an exhausted rate limit as
    /// either 429 or a 403 whose message mentions it.
    pub fn from_status(status: u16, message: &str) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 if message.to_ascii_lowercase().contains("rate limit") => Self::RateLimited,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// Error body GitHub sends alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ApiError>(body)
            .map(|api_error| api_error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
        Self::new(ErrorCode::from_status(status, &message), message)
    }
}
