//! Error types for the discus CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=not_found, 4=auth, 5=api, ...)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::client::ApiError;

/// Result type alias for discus operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Automation matches on the string; shell scripts on the
/// exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config (exit 2)
    ConfigError,
    SourceNotConfigured,

    // Not Found (exit 3)
    RecordNotFound,

    // Auth (exit 4)
    AuthenticationMissing,
    Unauthorized,

    // API (exit 5)
    RateLimited,
    Forbidden,
    TransportFailure,
    GraphQlError,
    NoData,

    // Sync (exit 6)
    SyncError,

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
            Self::ConfigError => "CONFIG_ERROR",
            Self::SourceNotConfigured => "SOURCE_NOT_CONFIGURED",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::AuthenticationMissing => "AUTHENTICATION_MISSING",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RateLimited => "RATE_LIMITED",
            Self::Forbidden => "FORBIDDEN",
            Self::TransportFailure => "TRANSPORT_FAILURE",
            Self::GraphQlError => "GRAPHQL_ERROR",
            Self::NoData => "NO_DATA",
            Self::SyncError => "SYNC_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigError | Self::SourceNotConfigured => 2,
            Self::RecordNotFound => 3,
            Self::AuthenticationMissing | Self::Unauthorized => 4,
            Self::RateLimited
            | Self::Forbidden
            | Self::TransportFailure
            | Self::GraphQlError
            | Self::NoData => 5,
            Self::SyncError => 6,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in discus operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Source not configured: {name}")]
    SourceNotConfigured { name: String },

    #[error("Record not found: {category}/{slug}")]
    RecordNotFound { category: String, slug: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) | Self::ConfigNotFound { .. } => ErrorCode::ConfigError,
            Self::SourceNotConfigured { .. } => ErrorCode::SourceNotConfigured,
            Self::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            Self::Api(api) => match api {
                ApiError::AuthenticationMissing => ErrorCode::AuthenticationMissing,
                ApiError::Unauthorized => ErrorCode::Unauthorized,
                ApiError::RateLimited { .. } => ErrorCode::RateLimited,
                ApiError::Forbidden => ErrorCode::Forbidden,
                ApiError::Transport { .. } | ApiError::Request(_) => ErrorCode::TransportFailure,
                ApiError::GraphQl(_) => ErrorCode::GraphQlError,
                ApiError::NoData => ErrorCode::NoData,
            },
            Self::Sync(_) => ErrorCode::SyncError,
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

    /// Context-aware recovery hint for humans and automation.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ConfigNotFound { path } => Some(format!(
                "No config at {}. Create a discus.json with a `sources` array, \
                 or pass --config <path>.",
                path.display()
            )),

            Self::SourceNotConfigured { name } => Some(format!(
                "No source named '{name}' in the config. Check the `sources` array in discus.json."
            )),

            Self::RecordNotFound { category, .. } => Some(format!(
                "Use `discus list {category}` to see stored records."
            )),

            Self::Api(ApiError::AuthenticationMissing) => Some(
                "Set GITHUB_TOKEN (or GH_TOKEN) to a token with read access to discussions."
                    .to_string(),
            ),

            Self::Api(ApiError::Unauthorized) => {
                Some("The token was rejected. Check that it has not expired.".to_string())
            }

            Self::Api(ApiError::RateLimited { reset }) => Some(format!(
                "API rate limit exhausted; retry after the reset ({}).",
                reset.as_deref().unwrap_or("unknown")
            )),

            _ => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, exit code, and optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
