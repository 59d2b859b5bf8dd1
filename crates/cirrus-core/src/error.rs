//! Error taxonomy for the Cirrus client.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the client library.
///
/// Transport failures and remote rejections are distinct variants: a
/// [`Error::Network`] wraps a request that never produced a response,
/// while [`Error::RemoteApi`] carries the status and decoded body of a
/// non-success response.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input rejected before any network traffic.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Local filesystem access failed.
    #[error("Filesystem error at {}: {}", .path.display(), .message)]
    Filesystem { path: PathBuf, message: String },

    /// An upload target could not be paired with a submitted file, or a
    /// returned target matched no submitted file.
    #[error("No upload target matched file '{file_name}' at path '{path}' in session {session_uuid}")]
    Reconciliation {
        file_name: String,
        path: String,
        session_uuid: String,
    },

    /// The HTTP call itself failed (connect, timeout, decode).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status} at {endpoint}: {message}")]
    RemoteApi {
        status: u16,
        endpoint: String,
        code: Option<u32>,
        message: String,
    },

    /// Creating or finalizing an archive failed.
    #[error("Compression error: {0}")]
    Compression(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn filesystem(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Filesystem {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Short stable name of the variant, for log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Filesystem { .. } => "filesystem",
            Error::Reconciliation { .. } => "reconciliation",
            Error::Network(_) => "network",
            Error::RemoteApi { .. } => "remote_api",
            Error::Compression(_) => "compression",
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Transport failures and server-side (5xx) rejections are retryable;
    /// validation, reconciliation, and 4xx rejections are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::RemoteApi { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
