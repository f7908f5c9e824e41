//! Error types for multipart uploads
//!
//! Every operation reports failure through [`UploadError`]. Nothing in this
//! crate retries; callers decide what is worth trying again.

use std::io;

use thiserror::Error;

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Upload error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    // ========== Integrity ==========
    /// Declared and observed byte counts disagree
    #[error("actual size does not match specified size: expected {expected}, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Declared object size is above the protocol maximum
    #[error("Object too large: {size} bytes (max: {max})")]
    ObjectTooLarge { size: u64, max: u64 },

    /// The stream produced more parts than the protocol allows
    #[error("Too many parts: part {part_number} exceeds the maximum of {max}")]
    TooManyParts { part_number: u32, max: u32 },

    // ========== Server ==========
    /// A success response was missing an expected field or was malformed
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A non-success response, as interpreted by the error parser
    #[error("Server error ({status}): {code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
        resource: Option<String>,
        request_id: Option<String>,
    },

    // ========== Transport ==========
    /// Connection or stream failure, passed through unchanged
    ///
    /// `kind` is the I/O error kind when the failure had one.
    #[error("Transport error: {message}")]
    Transport {
        kind: Option<io::ErrorKind>,
        message: String,
    },

    // ========== Caller ==========
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("XML error: {0}")]
    Xml(String),
}

impl UploadError {
    /// Transport failure without an underlying I/O error kind
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            kind: None,
            message: message.into(),
        }
    }

    /// Transport failure from a reqwest error, with `context` prefixed
    pub fn from_reqwest(context: &str, e: reqwest::Error) -> Self {
        Self::Transport {
            kind: reqwest_kind(&e),
            message: format!("{}: {}", context, e),
        }
    }

    /// Shorthand for the "unable to obtain upload id" protocol failure
    pub fn missing_upload_id() -> Self {
        Self::Protocol("unable to obtain upload id".to_string())
    }

    /// Returns true for declared/actual length disagreements
    pub fn is_size_mismatch(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }

    /// Returns true if the server rejected the request
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// I/O error kind of a transport failure, if it had one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Transport { kind, .. } => *kind,
            _ => None,
        }
    }

    /// HTTP status of a server error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn reqwest_kind(e: &reqwest::Error) -> Option<io::ErrorKind> {
    if e.is_timeout() {
        Some(io::ErrorKind::TimedOut)
    } else if e.is_connect() {
        Some(io::ErrorKind::ConnectionRefused)
    } else {
        None
    }
}

impl From<io::Error> for UploadError {
    fn from(e: io::Error) -> Self {
        Self::Transport {
            kind: Some(e.kind()),
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport {
            kind: reqwest_kind(&e),
            message: e.to_string(),
        }
    }
}

impl From<quick_xml::de::DeError> for UploadError {
    fn from(e: quick_xml::de::DeError) -> Self {
        Self::Xml(e.to_string())
    }
}
