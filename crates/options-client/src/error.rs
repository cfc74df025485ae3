//! Backend client error types

use thiserror::Error;

/// Errors returned by [`crate::OptionsApi`] calls
///
/// None of them is retried; callers decide what to show.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, broken body
    #[error("Network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Request body could not be serialized; nothing was sent
    #[error("Failed to encode request for {endpoint}: {message}")]
    Encode { endpoint: String, message: String },

    /// 2xx body that does not match the expected shape
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn encode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Message for a non-2xx response without an `error` body field
    pub fn status_only(status: u16) -> Self {
        Self::api(status, format!("API error: {}", status))
    }

    /// HTTP status, for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = ApiError::api(400, "Unknown strategy definition: Butterfly");
        assert_eq!(err.to_string(), "Unknown strategy definition: Butterfly");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_status_only_message() {
        assert_eq!(ApiError::status_only(503).to_string(), "API error: 503");
        assert_eq!(ApiError::network("/options/assets", "refused").status(), None);
    }
}
