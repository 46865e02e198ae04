/// Error types for share submission and settings storage
use thiserror::Error;

/// Failure of a call against the shares API
///
/// `Display` gives the message shown after a failed submission. Connection
/// tests word a couple of these differently, see [`ShareError::connection_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Invalid API token. Check your settings.")]
    Auth,

    /// 422 with field errors, already flattened into one line
    #[error("{0}")]
    Validation(String),

    #[error("Request failed ({0})")]
    Http(u16),

    #[error("{0}")]
    Network(String),
}

impl ShareError {
    pub fn connection_message(&self) -> String {
        match self {
            ShareError::Auth => "Invalid token.".to_string(),
            ShareError::Validation(msg) => msg.clone(),
            ShareError::Http(status) => format!("Connection failed ({})", status),
            ShareError::Network(msg) => format!("Connection error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,

    #[error("Storage error: {0}")]
    Backend(String),
}
