//! Error types for the nutrition SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// SDK error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No active session with a user id
    #[error("Not signed in")]
    Unauthenticated,

    /// Input rejected before submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Human-readable message supplied by the server, if any.
    ///
    /// Only `Server` errors carry one; everything else falls back to the
    /// caller's generic message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message: Some(message), .. } if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Resolve the message shown to the user: server text first, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| fallback.to_owned())
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Serialization(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_preferred() {
        let err = ClientError::Server {
            status: 400,
            message: Some("Food not found with ID 7".into()),
        };
        assert_eq!(err.user_message("generic"), "Food not found with ID 7");
    }

    #[test]
    fn test_blank_server_message_falls_back() {
        let err = ClientError::Server {
            status: 500,
            message: Some("   ".into()),
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("generic"), "generic");

        let err = ClientError::Network("connection reset".into());
        assert_eq!(err.user_message("generic"), "generic");
    }
}
