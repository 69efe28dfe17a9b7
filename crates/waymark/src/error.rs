//! Error types for waymark.
//!
//! This module defines all error types used throughout the waymark crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for waymark operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    StorageOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    StorageQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// Form or CLI input failed validation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    /// The form was submitted while hidden.
    #[error("no form is open")]
    FormNotOpen,

    // === Surface Errors ===
    /// Geolocation was denied or unavailable.
    #[error("could not determine position: {message}")]
    Geolocation {
        /// Description of what went wrong.
        message: String,
    },

    /// The map view has not been initialized.
    #[error("map is not available")]
    MapUnavailable,

    /// A map surface operation failed.
    #[error("map surface error: {0}")]
    Surface(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for waymark operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a geolocation error.
    #[must_use]
    pub fn geolocation(message: impl Into<String>) -> Self {
        Self::Geolocation {
            message: message.into(),
        }
    }

    /// Create a map surface error.
    #[must_use]
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error should be surfaced to the user as an alert
    /// rather than treated as a failure of the program itself.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::FormNotOpen
                | Self::Geolocation { .. }
                | Self::MapUnavailable
        )
    }

    /// Check if this error is a validation rejection of form input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MapUnavailable;
        assert_eq!(err.to_string(), "map is not available");

        let err = Error::invalid_input("cost must be positive");
        assert_eq!(err.to_string(), "invalid input: cost must be positive");
    }

    #[test]
    fn test_error_is_user_error() {
        assert!(Error::invalid_input("x").is_user_error());
        assert!(Error::geolocation("denied").is_user_error());
        assert!(Error::MapUnavailable.is_user_error());
        assert!(Error::FormNotOpen.is_user_error());
        assert!(!Error::internal("bug").is_user_error());
    }

    #[test]
    fn test_surface_error_display() {
        let err = Error::surface("widget refused the marker");
        assert_eq!(
            err.to_string(),
            "map surface error: widget refused the marker"
        );
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_error_is_invalid_input() {
        assert!(Error::invalid_input("x").is_invalid_input());
        assert!(!Error::MapUnavailable.is_invalid_input());
    }

    #[test]
    fn test_geolocation_error_display() {
        let err = Error::geolocation("permission denied");
        let msg = err.to_string();
        assert!(msg.contains("could not determine position"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::StorageQuery(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "zoom out of range".to_string(),
        };
        assert!(err.to_string().contains("zoom out of range"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_form_not_open_display() {
        assert_eq!(Error::FormNotOpen.to_string(), "no form is open");
    }
}
