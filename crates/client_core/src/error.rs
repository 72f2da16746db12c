use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid api url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("'{login}' is not a valid login")]
    InvalidLogin { login: String },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status} ({code:?}): {message}")]
    Status {
        endpoint: String,
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GatewayError {
    pub fn from_status(endpoint: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let ApiException { code, message } = ApiException::from_response(status, body);
        Self::Status {
            endpoint: endpoint.into(),
            status,
            code,
            message,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.code() == Some(ErrorCode::Unauthorized)
    }
}
