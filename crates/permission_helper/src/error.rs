//! Error types for the permission helper
//!
//! This module defines the error hierarchy for the permission_helper crate using `thiserror`.
//! All fallible operations return `Result<T, PermissionError>`.
//!
//! # Error Variants
//!
//! - [`PermissionError::EmptyPermissions`]: no permission identifiers were supplied
//! - [`PermissionError::NotDeclared`]: a permission is missing from the application manifest
//! - [`PermissionError::Manifest`]: the manifest declaration source could not be read
//! - [`PermissionError::Host`]: the host permission runtime rejected a query or prompt
//! - [`PermissionError::Cancelled`]: a pending request was dropped without an outcome
//! - [`PermissionError::Timeout`]: a pending request did not resolve in time
//! - [`PermissionError::Io`]: filesystem operations (auto-converts from `std::io::Error`)
//! - [`PermissionError::JsonDecode`]: manifest parsing (auto-converts from `serde_json::Error`)
//!
//! The first two are argument errors: they signal a programming mistake at the
//! call site rather than a runtime condition. [`PermissionError::is_invalid_argument`]
//! groups them.
//!
//! # Example
//!
//! ```rust
//! use permission_helper::error::PermissionError;
//!
//! fn example() -> Result<(), PermissionError> {
//!     // Auto-conversion from std::io::Error
//!     let _file = std::fs::read_to_string("/nonexistent")?;
//!
//!     // Manual construction
//!     return Err(PermissionError::EmptyPermissions);
//! }
//! ```

use thiserror::Error;

use crate::coordinator::RequestId;

/// The main error type for all permission_helper operations
#[derive(Error, Debug)]
pub enum PermissionError {
    /// The permission list passed to the coordinator was empty
    #[error("requires at least one input permission")]
    EmptyPermissions,

    /// A permission identifier is not declared in the application manifest
    ///
    /// Every permission an application requests at runtime must also be
    /// declared at packaging time. Fix the manifest or the call site.
    #[error("the permission \"{permission}\" is not declared in the application manifest")]
    NotDeclared {
        /// The undeclared permission identifier
        permission: String,
    },

    /// The manifest declaration source could not be queried
    ///
    /// The coordinator never surfaces this from validation; it logs it and
    /// continues with an empty declared set.
    #[error("Failed to read manifest declarations: {0}")]
    Manifest(String),

    /// The host permission runtime failed a grant query or prompt dispatch
    #[error("Host permission runtime error: {0}")]
    Host(String),

    /// The pending request was dropped before an outcome was delivered
    #[error("Permission request was cancelled before it resolved")]
    Cancelled,

    /// The pending request did not resolve before the deadline
    #[error("Permission request {request_id} timed out")]
    Timeout {
        /// Correlation id of the expired request
        request_id: RequestId,
    },

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest document is not valid JSON
    #[error("Failed to parse manifest JSON: {0}")]
    JsonDecode(#[from] serde_json::Error),
}

impl PermissionError {
    /// Whether this error reports a bad argument rather than a runtime failure
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PermissionError::EmptyPermissions | PermissionError::NotDeclared { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_permissions_message() {
        let err = PermissionError::EmptyPermissions;
        assert_eq!(err.to_string(), "requires at least one input permission");
    }

    #[test]
    fn test_not_declared_message() {
        let err = PermissionError::NotDeclared {
            permission: "android.permission.CAMERA".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "the permission \"android.permission.CAMERA\" is not declared in the application manifest"
        );
    }

    #[test]
    fn test_invalid_argument_classification() {
        assert!(PermissionError::EmptyPermissions.is_invalid_argument());
        assert!(
            PermissionError::NotDeclared {
                permission: "CAMERA".to_string()
            }
            .is_invalid_argument()
        );
        assert!(!PermissionError::Host("boom".to_string()).is_invalid_argument());
        assert!(!PermissionError::Cancelled.is_invalid_argument());
        assert!(!PermissionError::Manifest("missing".to_string()).is_invalid_argument());
    }

    #[test]
    fn test_timeout_message_includes_id() {
        let err = PermissionError::Timeout {
            request_id: RequestId::new(7),
        };
        assert_eq!(err.to_string(), "Permission request 7 timed out");
    }

    #[test]
    fn test_host_error_message() {
        let err = PermissionError::Host("activity finishing".to_string());
        assert!(err.to_string().contains("activity finishing"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PermissionError = io_err.into();
        assert!(matches!(err, PermissionError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_with_question_mark_json() {
        fn parse_json() -> Result<serde_json::Value, PermissionError> {
            Ok(serde_json::from_str("{ invalid }")?)
        }

        let err = parse_json().unwrap_err();
        assert!(matches!(err, PermissionError::JsonDecode(_)));
    }
}
