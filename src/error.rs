//! Error types shared by the signer and the client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a [`Transport`](crate::transport::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while signing or sending requests
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The server answered with a non-200 status
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// A url or query string could not be parsed
    #[error("malformed url: {0}")]
    Format(String),

    /// The HTTP transport failed before a response was received
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// A signed call was attempted without a session token
    #[error("no session token; the client is not authenticated")]
    NotAuthenticated,

    /// The response body was not the expected JSON
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Signature verification failed
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Reasons a signed parameter set is rejected by [`verify`](crate::signer::verify).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature parameter is missing")]
    MissingSignature,

    #[error("signature does not match")]
    Mismatch,

    #[error("timestamp parameter is missing or not numeric")]
    MissingTimestamp,

    #[error("signed request expired ({age}s old)")]
    Expired { age: i64 },
}

impl Error {
    /// Server-supplied message for [`Error::Remote`].
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Error::Remote { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
