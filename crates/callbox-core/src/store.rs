//! The storage collaborator: the tutorial's "database".
//!
//! The example handlers talk to storage through the [`UserStore`]
//! trait so a real datastore can replace the in-memory one without
//! touching the procedures. [`MemoryStore`] is the in-process
//! implementation: an ordered list behind an async lock, ids assigned
//! sequentially and never reused (no deletion exists).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// The example domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Async storage interface backing the user procedures.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, in insertion order.
    async fn find_many(&self) -> Vec<User>;

    /// A single user by id, or `None` when absent.
    async fn find_by_id(&self, id: &str) -> Option<User>;

    /// Create a user with a freshly assigned unique id.
    async fn create(&self, name: String) -> User;
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_many(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    async fn create(&self, name: String) -> User {
        let mut users = self.users.write().await;
        // Ids are the sequence length + 1, stringified; holding the
        // write lock across assignment and append keeps them unique.
        let user = User {
            id: (users.len() + 1).to_string(),
            name,
        };
        users.push(user.clone());
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_string_ids() {
        let store = MemoryStore::new();
        let first = store.create("sachinraja".to_string()).await;
        let second = store.create("alex".to_string()).await;
        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
    }

    #[tokio::test]
    async fn test_find_many_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.create("a".to_string()).await;
        store.create("b".to_string()).await;
        let users = store.find_many().await;
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = MemoryStore::new();
        let user = store.create("sachinraja".to_string()).await;
        assert_eq!(store.find_by_id("1").await, Some(user));
        assert_eq!(store.find_by_id("999").await, None);
    }
}
