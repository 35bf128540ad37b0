//! Procedure definitions: the unit stored in the registry.
//!
//! A [`ProcedureDef`] is an explicit record of name, kind, validator and
//! async handler, type-erased over `serde_json::Value` so definitions
//! with different input/output types can live in one registry. The
//! typed constructors ([`ProcedureDef::query`] / [`ProcedureDef::mutation`])
//! recover compile-time safety at the definition site: the raw value is
//! deserialized to the handler's input type, and the handler is only
//! invoked when deserialization succeeds.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cancel::CancellationToken;
use crate::error::{CallboxError, Result};

/// Whether a procedure reads or writes.
///
/// The distinction is advisory (enforced by convention, not by the
/// runtime) but part of the API surface: callers select caching and
/// retry behavior based on it, and the dispatcher rejects calls made
/// through the wrong path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    /// Side-effect-free read.
    Query,
    /// May alter state.
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }

    /// Parse from the wire representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "query" => Some(ProcedureKind::Query),
            "mutation" => Some(ProcedureKind::Mutation),
            _ => None,
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validator: checks a raw value, reporting a human-readable
/// reason on rejection.
type Validator = Box<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

/// Type-erased async handler.
type Handler = Box<dyn Fn(Value, CancellationToken) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A registered procedure: name, kind, validator and handler.
///
/// Owned exclusively by the registry once registered; there are no
/// mutating accessors, so a definition is immutable after construction.
pub struct ProcedureDef {
    name: String,
    kind: ProcedureKind,
    validate: Validator,
    handle: Handler,
}

impl ProcedureDef {
    /// Create a definition with an explicit validator.
    ///
    /// Use this when validation is not plain serde deserialization, or
    /// when the handler needs the cancellation token for cooperative
    /// cancellation of its own async work.
    pub fn new(
        name: impl Into<String>,
        kind: ProcedureKind,
        validate: impl Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
        handle: impl Fn(Value, CancellationToken) -> BoxFuture<'static, Result<Value>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            validate: Box::new(validate),
            handle: Box::new(handle),
        }
    }

    /// Create a query from a typed async handler.
    ///
    /// Validation is serde deserialization of the raw input to `I`; the
    /// handler runs only on success. Handler failures surface as
    /// [`CallboxError::Handler`] wrapping the cause.
    pub fn query<I, O, F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        Self::typed(name.into(), ProcedureKind::Query, handler)
    }

    /// Create a mutation from a typed async handler.
    pub fn mutation<I, O, F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        Self::typed(name.into(), ProcedureKind::Mutation, handler)
    }

    fn typed<I, O, F, Fut>(name: String, kind: ProcedureKind, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let handler_name = name.clone();

        let validate = move |raw: &Value| {
            serde_json::from_value::<I>(raw.clone())
                .map(|_| ())
                .map_err(|e| e.to_string())
        };

        let handle = move |input: Value, _token: CancellationToken| {
            let handler = Arc::clone(&handler);
            let name = handler_name.clone();
            let fut: BoxFuture<'static, Result<Value>> = Box::pin(async move {
                // The dispatcher has already run the validator; a failure
                // here means the raw value changed between the two steps,
                // which the pipeline does not allow.
                let typed: I = serde_json::from_value(input.clone())
                    .map_err(|e| CallboxError::validation(&input, e.to_string()))?;
                let output = handler(typed)
                    .await
                    .map_err(|e| CallboxError::handler(name.as_str(), e))?;
                serde_json::to_value(output).map_err(|e| CallboxError::handler(name.as_str(), e))
            });
            fut
        };

        Self {
            name,
            kind,
            validate: Box::new(validate),
            handle: Box::new(handle),
        }
    }

    /// The unique name this definition is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this procedure is a query or a mutation.
    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    /// Run the input validator against a raw value.
    pub fn validate(&self, raw: &Value) -> std::result::Result<(), String> {
        (self.validate)(raw)
    }

    /// Invoke the handler with an already-validated input.
    pub(crate) fn handle(
        &self,
        input: Value,
        token: CancellationToken,
    ) -> BoxFuture<'static, Result<Value>> {
        (self.handle)(input, token)
    }
}

impl fmt::Debug for ProcedureDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
