//! Error handling module for the incident client.
//!
//! Provides the shared error taxonomy with stable string codes. Transport and
//! encoding failures are surfaced to the caller for notification; validation
//! failures block the operation before any network traffic.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const ENCODING_ERROR: &str = "ENCODING_ERROR";
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Network unreachable, request build failure, or undecodable response
    Transport(String),
    /// The store answered with a non-success HTTP status
    Status { status: u16, message: String },
    /// The target incident does not exist in the store
    NotFound(String),
    /// A write precondition was lost to a concurrent update
    Conflict(String),
    /// A required field was missing before submission
    Validation(String),
    /// A file could not be read or encoded
    Encoding(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => codes::TRANSPORT_ERROR,
            ClientError::Status { .. } => codes::STORE_ERROR,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Conflict(_) => codes::CONFLICT,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Encoding(_) => codes::ENCODING_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(msg) => msg.clone(),
            ClientError::Status { status, message } => {
                format!("Store returned HTTP {}: {}", status, message)
            }
            ClientError::NotFound(msg) => msg.clone(),
            ClientError::Conflict(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Encoding(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        ClientError::Transport(format!("Transport error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Transport(format!("Invalid JSON from store: {}", err))
    }
}
