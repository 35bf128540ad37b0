//! The procedure registry: a keyed container of definitions.
//!
//! Registration happens once during start-up; afterwards the registry
//! is shared immutably (typically behind an `Arc`) and the dispatch
//! path reads it without locks.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CallboxError, Result};
use crate::procedure::ProcedureDef;

/// Maps procedure names to their definitions.
///
/// Names are unique; registering a duplicate fails and leaves the first
/// definition in place. Lookup is constant-time.
#[derive(Debug, Default)]
pub struct Registry {
    procedures: HashMap<String, ProcedureDef>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            procedures: HashMap::new(),
        }
    }

    /// Register a procedure definition.
    ///
    /// Fails with [`CallboxError::DuplicateName`] if the name is already
    /// taken, and with [`CallboxError::EmptyName`] if the name is empty.
    /// On success the definition is owned by the registry and immutable.
    pub fn register(&mut self, def: ProcedureDef) -> Result<()> {
        if def.name().is_empty() {
            return Err(CallboxError::EmptyName);
        }
        if self.procedures.contains_key(def.name()) {
            return Err(CallboxError::DuplicateName {
                procedure: def.name().to_string(),
            });
        }

        debug!("Registered {} ({})", def.name(), def.kind());
        self.procedures.insert(def.name().to_string(), def);
        Ok(())
    }

    /// Look up a definition by name.
    pub fn lookup(&self, name: &str) -> Result<&ProcedureDef> {
        self.procedures
            .get(name)
            .ok_or_else(|| CallboxError::NotFound {
                procedure: name.to_string(),
            })
    }

    /// Iterate over the registered names.
    ///
    /// The iterator is finite and restartable; iteration order is not
    /// part of the contract.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }

    /// Number of registered procedures.
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::ProcedureKind;

    fn echo(name: &str, kind: ProcedureKind) -> ProcedureDef {
        match kind {
            ProcedureKind::Query => ProcedureDef::query(name, |s: String| async move { Ok(s) }),
            ProcedureKind::Mutation => {
                ProcedureDef::mutation(name, |s: String| async move { Ok(s) })
            }
        }
    }

    #[test]
    fn test_register_lookup_round_trip() {
        let mut registry = Registry::new();
        registry.register(echo("echo", ProcedureKind::Query)).unwrap();

        let def = registry.lookup("echo").unwrap();
        assert_eq!(def.name(), "echo");
        assert_eq!(def.kind(), ProcedureKind::Query);
    }

    #[test]
    fn test_lookup_unknown_name_fails() {
        let registry = Registry::new();
        match registry.lookup("missing") {
            Err(CallboxError::NotFound { procedure }) => assert_eq!(procedure, "missing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = Registry::new();
        registry.register(echo("echo", ProcedureKind::Query)).unwrap();

        let err = registry
            .register(echo("echo", ProcedureKind::Mutation))
            .unwrap_err();
        assert!(matches!(err, CallboxError::DuplicateName { ref procedure } if procedure == "echo"));

        // First registration is still retrievable, unchanged.
        let def = registry.lookup("echo").unwrap();
        assert_eq!(def.kind(), ProcedureKind::Query);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = Registry::new();
        let err = registry.register(echo("", ProcedureKind::Query)).unwrap_err();
        assert!(matches!(err, CallboxError::EmptyName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_is_restartable() {
        let mut registry = Registry::new();
        registry.register(echo("a", ProcedureKind::Query)).unwrap();
        registry.register(echo("b", ProcedureKind::Mutation)).unwrap();

        let mut first: Vec<&str> = registry.names().collect();
        let mut second: Vec<&str> = registry.names().collect();
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first, ["a", "b"]);
        assert_eq!(first, second);
    }
}
