//! In-memory user repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use common::AppResult;
use domain::{User, UserField};

/// Process-local user store, used for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn store(&self, mut user: User) -> AppResult<User> {
        let id = *user.id.get_or_insert_with(Uuid::new_v4);
        self.users.write().await.insert(id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_one(&self, field: UserField, value: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.field(field) == Some(value))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_assigns_id() {
        let store = InMemoryUserStore::new();
        let user = User::new("alice", "hash");
        assert!(user.id.is_none());

        let stored = store.store(user).await.unwrap();
        assert!(stored.id.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_restore_keeps_id_and_overwrites() {
        let store = InMemoryUserStore::new();
        let mut stored = store.store(User::new("alice", "hash")).await.unwrap();
        let id = stored.id;

        stored.set_password_hash("other".to_string());
        let restored = store.store(stored).await.unwrap();

        assert_eq!(restored.id, id);
        assert_eq!(store.len().await, 1);
        let fetched = store.get(id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash, "other");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = InMemoryUserStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_one_by_field() {
        let store = InMemoryUserStore::new();
        let mut user = User::new("alice", "hash");
        user.update_profile(None, Some("alice@example.com".to_string()));
        store.store(user).await.unwrap();
        store.store(User::new("bob", "hash")).await.unwrap();

        let by_name = store.find_one(UserField::Username, "bob").await.unwrap();
        assert_eq!(by_name.unwrap().username, "bob");

        let by_email = store
            .find_one(UserField::Email, "alice@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.unwrap().username, "alice");

        assert!(store
            .find_one(UserField::Username, "carol")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_usernames_are_not_rejected() {
        let store = InMemoryUserStore::new();
        store.store(User::new("alice", "a")).await.unwrap();
        store.store(User::new("alice", "b")).await.unwrap();

        assert_eq!(store.len().await, 2);
    }
}
