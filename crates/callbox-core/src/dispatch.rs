//! The dispatcher: single entry point turning an untyped call into a
//! typed result.
//!
//! Every invocation runs the same pipeline: look the procedure up,
//! check the requested kind, validate the raw input, then await the
//! handler. Each stage has its own failure kind and every failure is
//! terminal; the dispatcher never retries and never substitutes a
//! fallback value. Retry policy, if any, belongs to the transport.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::cancel::CancellationToken;
use crate::error::{CallboxError, Result};
use crate::procedure::ProcedureKind;
use crate::registry::Registry;

/// Stateless dispatcher over a shared, read-only registry.
///
/// Cloning is cheap; independent invocations may run concurrently and
/// the dispatcher places no ordering guarantee between them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Create a dispatcher over a fully-registered registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher reads from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Invoke a procedure by name.
    ///
    /// On success returns the handler's output unchanged. Failures are
    /// surfaced verbatim as the [`CallboxError`] variant of the stage
    /// that failed: [`NotFound`](CallboxError::NotFound),
    /// [`KindMismatch`](CallboxError::KindMismatch),
    /// [`Validation`](CallboxError::Validation) or
    /// [`Handler`](CallboxError::Handler).
    pub async fn invoke(&self, name: &str, kind: ProcedureKind, raw: Value) -> Result<Value> {
        self.invoke_with_cancel(name, kind, raw, CancellationToken::new())
            .await
    }

    /// Invoke a procedure with a caller-supplied cancellation token.
    ///
    /// A token observed cancelled before the handler runs yields
    /// [`CallboxError::Cancelled`] rather than a partial result;
    /// handlers doing real async work may also observe the token at
    /// their own suspension points.
    pub async fn invoke_with_cancel(
        &self,
        name: &str,
        kind: ProcedureKind,
        raw: Value,
        token: CancellationToken,
    ) -> Result<Value> {
        debug!("Dispatching {} {}", kind, name);

        let def = match self.registry.lookup(name) {
            Ok(def) => def,
            Err(e) => {
                error!("Dispatch failed for {}: {}", name, e);
                return Err(e);
            }
        };

        // Guard against a state-mutating procedure invoked through a
        // read-only path (or the reverse): neither the validator nor
        // the handler runs on a mismatch.
        if def.kind() != kind {
            let e = CallboxError::KindMismatch {
                procedure: name.to_string(),
                requested: kind,
                registered: def.kind(),
            };
            error!("Dispatch failed for {}: {}", name, e);
            return Err(e);
        }

        if let Err(reason) = def.validate(&raw) {
            let e = CallboxError::validation(&raw, reason);
            error!("Dispatch failed for {}: {}", name, e);
            return Err(e);
        }

        // Last checkpoint before side effects may happen.
        token.check()?;

        match def.handle(raw, token).await {
            Ok(output) => Ok(output),
            Err(e) => {
                error!("Handler failed for {}: {}", name, e);
                Err(e)
            }
        }
    }
}
