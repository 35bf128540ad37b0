//! Callbox - a typed procedure registry with request dispatch and validation.
//!
//! This crate provides the core of a typesafe RPC pattern: procedures
//! are registered by name as (kind, validator, async handler) records,
//! and a stateless dispatcher turns untyped calls into typed results
//! through a validate-then-handle pipeline. There is no transport here;
//! a transport layer hands the dispatcher a procedure name, a call
//! kind, and a raw JSON value, and serializes the result or typed
//! error back.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use callbox::{Dispatcher, MemoryStore, ProcedureKind, Registry, user_procedures};
//!
//! #[tokio::main]
//! async fn main() -> callbox::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let mut registry = Registry::new();
//!     for def in user_procedures(store) {
//!         registry.register(def)?;
//!     }
//!
//!     let dispatcher = Dispatcher::new(Arc::new(registry));
//!     let user = dispatcher
//!         .invoke("user.create", ProcedureKind::Mutation, serde_json::json!({"name": "ada"}))
//!         .await?;
//!     println!("created {user}");
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod dispatch;
pub mod error;
pub mod procedure;
pub mod registry;
pub mod store;
pub mod users;

// Re-export commonly used types
pub use cancel::{CancellationToken, CancelledError};
pub use dispatch::Dispatcher;
pub use error::{CallboxError, Result};
pub use procedure::{ProcedureDef, ProcedureKind};
pub use registry::Registry;
pub use store::{MemoryStore, User, UserStore};
pub use users::{user_procedures, CreateUserInput};
