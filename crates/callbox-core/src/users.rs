//! The tutorial's example procedures over the user store.
//!
//! Three definitions mirroring the classic list / get-by-id / create
//! template: `user.list` and `user.byId` are queries, `user.create` is
//! a mutation. All three talk to storage through the [`UserStore`]
//! trait.

use std::sync::Arc;

use anyhow::anyhow;
use serde::Deserialize;

use crate::procedure::ProcedureDef;
use crate::store::UserStore;

/// Input for `user.create`.
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
}

/// Build the user procedure definitions, ready for registration.
pub fn user_procedures(store: Arc<dyn UserStore>) -> Vec<ProcedureDef> {
    let list_store = Arc::clone(&store);
    let list = ProcedureDef::query("user.list", move |_: ()| {
        let store = Arc::clone(&list_store);
        async move { Ok(store.find_many().await) }
    });

    let by_id_store = Arc::clone(&store);
    let by_id = ProcedureDef::query("user.byId", move |id: String| {
        let store = Arc::clone(&by_id_store);
        async move {
            store
                .find_by_id(&id)
                .await
                .ok_or_else(|| anyhow!("user not found: {id}"))
        }
    });

    let create = ProcedureDef::mutation("user.create", move |input: CreateUserInput| {
        let store = Arc::clone(&store);
        async move { Ok(store.create(input.name).await) }
    });

    vec![list, by_id, create]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::ProcedureKind;
    use crate::store::MemoryStore;

    #[test]
    fn test_procedure_names_and_kinds() {
        let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
        let defs = user_procedures(store);

        let summary: Vec<(&str, ProcedureKind)> =
            defs.iter().map(|d| (d.name(), d.kind())).collect();
        assert_eq!(
            summary,
            [
                ("user.list", ProcedureKind::Query),
                ("user.byId", ProcedureKind::Query),
                ("user.create", ProcedureKind::Mutation),
            ]
        );
    }

    #[test]
    fn test_create_input_validation() {
        let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
        let defs = user_procedures(store);
        let create = defs.iter().find(|d| d.name() == "user.create").unwrap();

        assert!(create.validate(&serde_json::json!({"name": "sachinraja"})).is_ok());
        assert!(create.validate(&serde_json::json!({"name": 42})).is_err());
        assert!(create.validate(&serde_json::json!({})).is_err());
    }
}
