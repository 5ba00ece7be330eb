//! Error types for Signals
//!
//! Access decisions are not errors: a denied request is a `DenyReason`
//! computed by `signals-policy`. These variants cover lookups, input
//! validation, and infrastructure failures at the boundary.

use thiserror::Error;

/// Result type alias for Signals operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Signals
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Resource Not Found Errors
    // ==========================================================================
    #[error("Signal not found: {0}")]
    SignalNotFound(i64),

    #[error("Attachment {attachment_id} not found on signal {signal_id}")]
    AttachmentNotFound { signal_id: i64, attachment_id: i64 },

    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Unknown status state: {0}")]
    UnknownStatusState(String),

    #[error("Method \"{0}\" not allowed")]
    MethodNotAllowed(String),

    // ==========================================================================
    // Rendering Errors
    // ==========================================================================
    #[error("Template error: {0}")]
    Template(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ==========================================================================
    // Internal Errors
    // ==========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error type string (for JSON responses)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::SignalNotFound(_)
            | Self::AttachmentNotFound { .. }
            | Self::PrincipalNotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_)
            | Self::UnknownPermission(_)
            | Self::UnknownStatusState(_) => "INVALID_ARGUMENT",
            Self::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::Serialization(_) => "TYPE_ERROR",
            Self::Io(_) => "OS_ERROR",
            Self::Internal(_) => "UNHANDLED_EXCEPTION",
        }
    }

    /// Returns whether the error is recoverable (the caller can correct the
    /// request and retry)
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SignalNotFound(_)
                | Self::AttachmentNotFound { .. }
                | Self::PrincipalNotFound(_)
                | Self::InvalidArgument(_)
                | Self::UnknownPermission(_)
                | Self::UnknownStatusState(_)
                | Self::MethodNotAllowed(_)
                | Self::Serialization(_)
        )
    }

    /// HTTP status code the boundary should answer with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::SignalNotFound(_)
            | Self::AttachmentNotFound { .. }
            | Self::PrincipalNotFound(_) => 404,
            Self::InvalidArgument(_)
            | Self::UnknownPermission(_)
            | Self::UnknownStatusState(_)
            | Self::Serialization(_) => 400,
            Self::MethodNotAllowed(_) => 405,
            Self::Template(_) | Self::Io(_) | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_mapping_exhaustive() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::SignalNotFound(1), "NOT_FOUND"),
            (
                Error::AttachmentNotFound {
                    signal_id: 1,
                    attachment_id: 2,
                },
                "NOT_FOUND",
            ),
            (Error::PrincipalNotFound("x".into()), "NOT_FOUND"),
            (Error::InvalidArgument("x".into()), "INVALID_ARGUMENT"),
            (Error::UnknownPermission("x".into()), "INVALID_ARGUMENT"),
            (Error::UnknownStatusState("x".into()), "INVALID_ARGUMENT"),
            (Error::MethodNotAllowed("TRACE".into()), "METHOD_NOT_ALLOWED"),
            (Error::Template("x".into()), "TEMPLATE_ERROR"),
            (Error::Io(std::io::Error::other("x")), "OS_ERROR"),
            (Error::Internal("x".into()), "UNHANDLED_EXCEPTION"),
        ];

        for (err, expected_type) in &cases {
            assert_eq!(
                err.error_type(),
                *expected_type,
                "Error {err:?} should map to {expected_type}"
            );
        }
    }

    #[test]
    fn test_recoverable_classification() {
        let recoverable = vec![
            Error::SignalNotFound(1),
            Error::AttachmentNotFound {
                signal_id: 1,
                attachment_id: 1,
            },
            Error::InvalidArgument("x".into()),
            Error::UnknownPermission("x".into()),
            Error::MethodNotAllowed("x".into()),
        ];
        for err in &recoverable {
            assert!(err.is_recoverable(), "Error {err:?} should be recoverable");
        }

        let non_recoverable = vec![
            Error::Template("x".into()),
            Error::Io(std::io::Error::other("x")),
            Error::Internal("x".into()),
        ];
        for err in &non_recoverable {
            assert!(
                !err.is_recoverable(),
                "Error {err:?} should NOT be recoverable"
            );
        }
    }

    #[test]
    fn test_no_error_maps_to_forbidden() {
        // 403s are produced from access decisions only.
        let all = vec![
            Error::SignalNotFound(1),
            Error::PrincipalNotFound("x".into()),
            Error::InvalidArgument("x".into()),
            Error::MethodNotAllowed("x".into()),
            Error::Template("x".into()),
            Error::Internal("x".into()),
        ];
        for err in &all {
            assert_ne!(err.http_status(), 403, "{err:?}");
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::AttachmentNotFound {
                signal_id: 3,
                attachment_id: 9
            }
            .to_string(),
            "Attachment 9 not found on signal 3"
        );
        assert_eq!(
            Error::MethodNotAllowed("TRACE".into()).to_string(),
            "Method \"TRACE\" not allowed"
        );
    }
}
