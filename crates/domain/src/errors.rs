//! Error types used throughout the application
//!
//! [`DriverError`] is the structured failure of a single Data API call.
//! [`FmBridgeError`] wraps it together with the failures of the surrounding
//! services (credential lookup, cryptography, configuration).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{FMS_INVALID_TOKEN_CODE, NAME_PREFIX};

/// Main error type for fmbridge services
#[derive(Error, Debug)]
pub enum FmBridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Result type alias for fmbridge operations
pub type Result<T> = std::result::Result<T, FmBridgeError>;

/// Result type alias for a single Data API call
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Non-success HTTP status reported by the Data API gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub reason: String,
}

impl HttpFailure {
    /// Failure for `status` with its reason phrase.
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self { status, reason: reason.into() }
    }

    /// Namespaced code, e.g. `fmbridge_http: 401`.
    pub fn code(&self) -> String {
        format!("{NAME_PREFIX}_http: {}", self.status)
    }

    /// Display text, e.g. `HTTP: Unauthorized (401)`.
    pub fn message(&self) -> String {
        format!("HTTP: {}", concat_error_message(&self.reason, &self.status.to_string()))
    }
}

/// FileMaker-level error taken from `messages[0]` of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFailure {
    pub code: i64,
    pub message: String,
}

impl ServerFailure {
    /// Failure for a FileMaker error code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Namespaced code, e.g. `fmbridge_fms: 952`.
    pub fn code(&self) -> String {
        format!("{NAME_PREFIX}_fms: {}", self.code)
    }

    /// Display text, e.g. `FileMaker Server: Field is missing (102)`.
    pub fn message(&self) -> String {
        format!(
            "FileMaker Server: {}",
            concat_error_message(&self.message, &self.code.to_string())
        )
    }

    /// FileMaker code 952, an invalid or expired token.
    pub fn is_invalid_token(&self) -> bool {
        self.code == FMS_INVALID_TOKEN_CODE
    }
}

/// HTTP and FileMaker layers of a rejected Data API response.
///
/// Carries zero, one or two layers: the HTTP status when it was not 200, and
/// the FileMaker message when its code was nonzero. FileMaker reports some
/// failures as HTTP 200 with an embedded code, so `http` may be `None` while
/// `server` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseFailure {
    pub http: Option<HttpFailure>,
    pub server: Option<ServerFailure>,
}

impl ResponseFailure {
    pub fn codes(&self) -> Vec<String> {
        self.http
            .iter()
            .map(HttpFailure::code)
            .chain(self.server.iter().map(ServerFailure::code))
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.http
            .iter()
            .map(HttpFailure::message)
            .chain(self.server.iter().map(ServerFailure::message))
            .collect()
    }
}

impl fmt::Display for ResponseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.messages();
        if messages.is_empty() {
            write!(f, "FileMaker Data API request failed")
        } else {
            write!(f, "{}", messages.join(" "))
        }
    }
}

/// Failure of a FileMaker Data API call.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("fmbridge: {0}")]
    Configuration(String),

    #[error("fmbridge: Could not get token. {0}")]
    Authentication(String),

    #[error("Transport: {0}")]
    Transport(String),

    #[error("{0}")]
    Response(ResponseFailure),

    #[error("fmbridge: An error occurred while uploading a file. ({})", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fmbridge: Unexpected response from FileMaker Server. {0}")]
    InvalidResponse(String),
}

impl DriverError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn response(http: Option<HttpFailure>, server: Option<ServerFailure>) -> Self {
        Self::Response(ResponseFailure { http, server })
    }

    /// Namespaced error codes, one per reported layer.
    pub fn codes(&self) -> Vec<String> {
        match self {
            Self::Response(failure) => failure.codes(),
            Self::Transport(_) => vec![format!("{NAME_PREFIX}_transport")],
            Self::Configuration(_)
            | Self::Authentication(_)
            | Self::FileRead { .. }
            | Self::InvalidResponse(_) => vec![format!("{NAME_PREFIX}_core")],
        }
    }

    /// Human-readable messages, one per reported layer.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Response(failure) => failure.messages(),
            other => vec![other.to_string()],
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Response(ResponseFailure { http: Some(http), .. }) => Some(http.status),
            _ => None,
        }
    }

    pub fn server_code(&self) -> Option<i64> {
        match self {
            Self::Response(ResponseFailure { server: Some(server), .. }) => Some(server.code),
            _ => None,
        }
    }

    /// True when FileMaker rejected the session token (code 952).
    pub fn is_session_timeout(&self) -> bool {
        let timeout_code = format!("{NAME_PREFIX}_fms: {FMS_INVALID_TOKEN_CODE}");
        self.codes().iter().any(|code| *code == timeout_code)
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

fn concat_error_message(message: &str, code: &str) -> String {
    format!("{message} ({code})")
}
