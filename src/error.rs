//! Error types for the hubmove CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=api, 3=not_found, 4=validation, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hubmove operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // API (exit 2)
    ApiError,
    HttpError,
    AuthError,

    // Not Found (exit 3)
    NotFound,
    LogNotFound,

    // Validation (exit 4)
    InvalidArgument,
    MissingCredentials,

    // Migration (exit 6)
    CopyFailed,
    RevertFailed,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ApiError => "API_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::AuthError => "AUTH_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::LogNotFound => "LOG_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::CopyFailed => "COPY_FAILED",
            Self::RevertFailed => "REVERT_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ApiError | Self::HttpError | Self::AuthError => 2,
            Self::NotFound | Self::LogNotFound => 3,
            Self::InvalidArgument | Self::MissingCredentials => 4,
            Self::CopyFailed | Self::RevertFailed => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether re-running the same command may succeed.
    ///
    /// True for transport failures and for a failed copy phase, since
    /// copy and archive are safely repeatable. False for missing input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiError | Self::HttpError | Self::CopyFailed | Self::RevertFailed
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in hubmove operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Could not read action log: {}", path.display())]
    LogNotFound { path: PathBuf },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Copy phase failed; no source items were archived")]
    CopyFailed {
        /// Log file holding the record of what was created.
        log_path: Option<PathBuf>,
    },

    #[error("Revert failed: {0}")]
    RevertFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::LogNotFound { .. } => ErrorCode::LogNotFound,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::Http(_) => ErrorCode::HttpError,
            Self::Auth(_) => ErrorCode::AuthError,
            Self::MissingCredentials(_) => ErrorCode::MissingCredentials,
            Self::CopyFailed { .. } => ErrorCode::CopyFailed,
            Self::RevertFailed(_) => ErrorCode::RevertFailed,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Whether this is a 404 from the content API.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::LogNotFound { path } => Some(format!(
                "Pass the log file written by a previous `hubmove item move` run. \
                 Nothing was reverted; check that '{}' exists and is readable.",
                path.display()
            )),

            Self::MissingCredentials(what) => Some(format!(
                "Provide {what} with a flag, an environment variable (HUBMOVE_*), \
                 or ~/.hubmove/config.json"
            )),

            Self::CopyFailed { log_path } => {
                let mut hint = String::from(
                    "Every source item is still active. Fix the reported errors and re-run the move.",
                );
                if let Some(path) = log_path {
                    hint.push_str(&format!(
                        "\n  Undo created items: hubmove item move --revert {}",
                        path.display()
                    ));
                }
                Some(hint)
            }

            Self::Auth(_) => Some(
                "Check the client id and secret, and the auth URL in ~/.hubmove/config.json"
                    .to_string(),
            ),

            Self::NotFound { resource, .. } => Some(format!(
                "The {resource} may have been deleted, or belongs to another hub."
            )),

            Self::Api { .. }
            | Self::Http(_)
            | Self::RevertFailed(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
