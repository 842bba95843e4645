//! Unified error handling for the PrintBay CLI and SDK
//!
//! Every failure surfaces with a unique `PBxxx` code so support tickets
//! and docs can reference exact conditions. Mutation call sites catch and
//! render these; no error is allowed to abort the process beyond the
//! top-level handler.

use std::fmt;
use thiserror::Error;

/// Unified Result type for all PrintBay operations
pub type Result<T> = std::result::Result<T, PrintBayError>;

/// Error codes for PrintBay operations
///
/// Each error has a unique code in the format `PBxxx` where:
/// - PB1xx: Permission and access errors
/// - PB2xx: Network and API errors
/// - PB3xx: File and I/O errors
/// - PB4xx: Configuration errors
/// - PB5xx: Validation and input errors
/// - PB6xx: Archive and resource errors
/// - PB7xx: Bulk action errors
/// - PB8xx: UI and interaction errors
/// - PB9xx: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Permission (PB1xx)
    /// PB101: Permission denied by the server
    PermissionDenied,
    /// PB102: Missing or rejected API key
    InvalidApiKey,

    // Network (PB2xx)
    /// PB201: HTTP request failed
    HttpError,
    /// PB202: Connection timeout
    ConnectionTimeout,
    /// PB203: Connection refused
    ConnectionRefused,
    /// PB204: API returned error response
    ApiError,
    /// PB205: Invalid API response format
    InvalidResponse,

    // File/IO (PB3xx)
    /// PB301: File not found
    FileNotFound,
    /// PB302: File read error
    FileReadError,
    /// PB303: File write error
    FileWriteError,
    /// PB304: File already exists
    FileAlreadyExists,

    // Configuration (PB4xx)
    /// PB401: Configuration error
    ConfigError,
    /// PB402: Invalid endpoint URL
    InvalidEndpoint,

    // Validation (PB5xx)
    /// PB501: Invalid input
    InvalidInput,
    /// PB502: Validation failed
    ValidationFailed,

    // Archive/Resource (PB6xx)
    /// PB601: Archive not found
    ArchiveNotFound,
    /// PB602: Resource not found
    ResourceNotFound,
    /// PB603: Plug control failed
    PlugError,

    // Bulk actions (PB7xx)
    /// PB701: Empty selection
    EmptySelection,
    /// PB702: Bulk action partially failed
    BulkPartialFailure,

    // UI (PB8xx)
    /// PB801: Dialog error
    DialogError,
    /// PB802: User cancelled
    UserCancelled,

    // Internal (PB9xx)
    /// PB901: Internal error
    InternalError,
    /// PB902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::PermissionDenied => 101,
            ErrorCode::InvalidApiKey => 102,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::ApiError => 204,
            ErrorCode::InvalidResponse => 205,

            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,
            ErrorCode::FileAlreadyExists => 304,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::ArchiveNotFound => 601,
            ErrorCode::ResourceNotFound => 602,
            ErrorCode::PlugError => 603,

            ErrorCode::EmptySelection => 701,
            ErrorCode::BulkPartialFailure => 702,

            ErrorCode::DialogError => 801,
            ErrorCode::UserCancelled => 802,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "PB201")
    pub fn as_str(&self) -> String {
        format!("PB{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PB{}", self.code())
    }
}

/// Main error type for all PrintBay operations
#[derive(Error, Debug)]
pub enum PrintBayError {
    /// Permission denied
    #[error("[{code}] Permission denied: {message}")]
    Permission { code: ErrorCode, message: String },

    /// HTTP/Network error
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    /// Validation error
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    /// Invalid input error
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    /// Resource not found
    #[error("[{code}] Not found: {resource}")]
    NotFound { code: ErrorCode, resource: String },

    /// Smart plug control error
    #[error("[{code}] Plug error: {message}")]
    Plug { code: ErrorCode, message: String },

    /// Bulk action error
    #[error("[{code}] Bulk action failed: {message}")]
    Bulk {
        code: ErrorCode,
        message: String,
        succeeded: usize,
        failed: usize,
    },

    /// UI/Dialog error
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    /// Internal/Unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl PrintBayError {
    /// Create permission error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            code: ErrorCode::PermissionDenied,
            message: message.into(),
        }
    }

    /// Create network error from message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    /// Create network error from reqwest error
    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        if status == 403 {
            return Self::Permission {
                code: ErrorCode::PermissionDenied,
                message: message.into(),
            };
        }
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    /// Create invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            message: message.into(),
        }
    }

    /// Create IO error with context
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::FileReadError,
            context: context.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            std::io::ErrorKind::AlreadyExists => ErrorCode::FileAlreadyExists,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
            source: None,
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: None,
        }
    }

    /// Create validation error with field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    /// Create not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ResourceNotFound,
            resource: resource.into(),
        }
    }

    /// Create archive not found error
    pub fn archive_not_found(id: i64) -> Self {
        Self::NotFound {
            code: ErrorCode::ArchiveNotFound,
            resource: format!("archive {}", id),
        }
    }

    /// Create plug control error
    pub fn plug(message: impl Into<String>) -> Self {
        Self::Plug {
            code: ErrorCode::PlugError,
            message: message.into(),
        }
    }

    /// Create empty selection error
    pub fn empty_selection() -> Self {
        Self::Bulk {
            code: ErrorCode::EmptySelection,
            message: "No archives selected".to_string(),
            succeeded: 0,
            failed: 0,
        }
    }

    /// Create bulk partial failure error
    pub fn bulk_partial(succeeded: usize, failed: usize) -> Self {
        Self::Bulk {
            code: ErrorCode::BulkPartialFailure,
            message: format!("{} succeeded, {} failed", succeeded, failed),
            succeeded,
            failed,
        }
    }

    /// Create user cancelled error
    pub fn user_cancelled() -> Self {
        Self::Ui {
            code: ErrorCode::UserCancelled,
            message: "Operation cancelled by user".to_string(),
        }
    }

    /// Create internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Permission { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Plug { code, .. } => *code,
            Self::Bulk { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// Check if this is a permission error
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::Permission { .. })
    }

    /// Check if this is a network error
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Api { .. })
    }
}

impl From<std::io::Error> for PrintBayError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for PrintBayError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for PrintBayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for PrintBayError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<dialoguer::Error> for PrintBayError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

impl From<validator::ValidationErrors> for PrintBayError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: err.to_string(),
            field: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::PermissionDenied.code(), 101);
        assert_eq!(ErrorCode::HttpError.code(), 201);
        assert_eq!(ErrorCode::FileNotFound.code(), 301);
        assert_eq!(ErrorCode::ConfigError.code(), 401);
        assert_eq!(ErrorCode::EmptySelection.code(), 701);
    }

    #[test]
    fn test_error_code_string() {
        assert_eq!(ErrorCode::PermissionDenied.as_str(), "PB101");
        assert_eq!(ErrorCode::BulkPartialFailure.as_str(), "PB702");
    }

    #[test]
    fn test_error_display() {
        let err = PrintBayError::archive_not_found(42);
        assert!(err.to_string().contains("PB601"));
        assert!(err.to_string().contains("archive 42"));
    }

    #[test]
    fn test_forbidden_status_maps_to_permission() {
        let err = PrintBayError::api(403, "read only token");
        assert!(err.is_permission_error());

        let err = PrintBayError::api(500, "boom");
        assert!(!err.is_permission_error());
        assert!(err.is_network_error());
    }

    #[test]
    fn test_bulk_partial_carries_counts() {
        let err = PrintBayError::bulk_partial(3, 2);
        match err {
            PrintBayError::Bulk {
                succeeded, failed, ..
            } => {
                assert_eq!(succeeded, 3);
                assert_eq!(failed, 2);
            }
            _ => panic!("expected bulk error"),
        }
    }
}
