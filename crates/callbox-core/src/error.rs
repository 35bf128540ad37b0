//! Error types for the callbox core.
//!
//! Every failure a dispatch can produce is a distinct variant here; the
//! dispatcher never recovers an error locally and never collapses one
//! kind into another, so a transport layer can map each kind to a
//! caller-facing code.

use serde_json::Value;
use thiserror::Error;

use crate::procedure::ProcedureKind;

/// Main error type for registry and dispatch operations.
#[derive(Debug, Error)]
pub enum CallboxError {
    // Dispatch errors
    #[error("Procedure not found: {procedure}")]
    NotFound { procedure: String },

    #[error("Kind mismatch for {procedure}: requested {requested}, registered {registered}")]
    KindMismatch {
        procedure: String,
        requested: ProcedureKind,
        registered: ProcedureKind,
    },

    #[error("Validation failed: {reason}")]
    Validation {
        /// The raw input that failed validation, preserved for the caller.
        raw: Value,
        reason: String,
    },

    #[error("Handler failed for {procedure}")]
    Handler {
        procedure: String,
        #[source]
        source: anyhow::Error,
    },

    // Registration errors
    #[error("Procedure already registered: {procedure}")]
    DuplicateName { procedure: String },

    #[error("Procedure name must not be empty")]
    EmptyName,

    // Cancellation
    #[error("Invocation cancelled")]
    Cancelled,
}

/// Result type alias for callbox operations.
pub type Result<T> = std::result::Result<T, CallboxError>;

impl CallboxError {
    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32601: Method not found
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Kind mismatch (mutation called through a query path or vice versa)
    /// - -32001: Handler failure
    /// - -32002: Cancelled
    /// - -32003: Duplicate registration
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            CallboxError::NotFound { .. } => -32601,

            CallboxError::Validation { .. } | CallboxError::EmptyName => -32602,

            CallboxError::KindMismatch { .. } => -32000,

            CallboxError::Handler { .. } => -32001,

            CallboxError::Cancelled => -32002,

            CallboxError::DuplicateName { .. } => -32003,
        }
    }

    /// Wrap a handler failure with the owning procedure's name.
    pub fn handler(procedure: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        CallboxError::Handler {
            procedure: procedure.into(),
            source: source.into(),
        }
    }

    /// Build a validation error that preserves the offending raw input.
    pub fn validation(raw: &Value, reason: impl Into<String>) -> Self {
        CallboxError::Validation {
            raw: raw.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = CallboxError::NotFound {
            procedure: "user.byId".into(),
        };
        assert_eq!(err.to_string(), "Procedure not found: user.byId");

        let err = CallboxError::KindMismatch {
            procedure: "user.create".into(),
            requested: ProcedureKind::Query,
            registered: ProcedureKind::Mutation,
        };
        assert_eq!(
            err.to_string(),
            "Kind mismatch for user.create: requested query, registered mutation"
        );
    }

    #[test]
    fn test_validation_preserves_raw_input() {
        let raw = json!({"name": 42});
        let err = CallboxError::validation(&raw, "name must be a string");
        match err {
            CallboxError::Validation { raw: kept, reason } => {
                assert_eq!(kept, raw);
                assert_eq!(reason, "name must be a string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rpc_error_codes_are_distinct() {
        let errors = [
            CallboxError::NotFound {
                procedure: "x".into(),
            },
            CallboxError::KindMismatch {
                procedure: "x".into(),
                requested: ProcedureKind::Query,
                registered: ProcedureKind::Mutation,
            },
            CallboxError::validation(&json!(null), "bad"),
            CallboxError::handler("x", anyhow::anyhow!("boom")),
            CallboxError::DuplicateName {
                procedure: "x".into(),
            },
            CallboxError::Cancelled,
        ];
        let codes: Vec<i32> = errors.iter().map(CallboxError::to_rpc_error_code).collect();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }

    #[test]
    fn test_handler_error_keeps_source() {
        let err = CallboxError::handler("user.byId", anyhow::anyhow!("user not found: 999"));
        let source = std::error::Error::source(&err).expect("handler error has a source");
        assert_eq!(source.to_string(), "user not found: 999");
    }
}
