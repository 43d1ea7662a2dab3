//! Credential service - registration, authentication and password changes.
//!
//! Every workflow runs its checks in a fixed order and stops at the first
//! failure, so combined-invalid input always reports the same error:
//!
//! - register: username length, password length, confirmation, uniqueness
//! - change password: old password, new password length, confirmation

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::AppResult;
use domain::{DomainError, PasswordHasher, PolicyStore, User, UserField};

use crate::repository::UserRepository;

/// Credential service trait for dependency injection.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Register a new user after checking policy and username uniqueness.
    async fn register_user(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        confirm_password: Option<&str>,
    ) -> AppResult<User>;

    /// Verify a username/password pair and return the matching user.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    /// Replace the user's password hash in place. Persisting the change is
    /// up to the caller.
    fn change_password(
        &self,
        user: &mut User,
        old_password: &str,
        new_password: Option<&str>,
        confirm_new_password: Option<&str>,
    ) -> AppResult<()>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Store a user as-is, without any policy checks
    async fn store_user(&self, user: User) -> AppResult<User>;
}

/// Concrete implementation of CredentialService.
pub struct CredentialManager {
    repo: Arc<dyn UserRepository>,
    policy: Arc<PolicyStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialManager {
    /// Create new credential service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        policy: Arc<PolicyStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repo,
            policy,
            hasher,
        }
    }

    /// Hash a plaintext password with the configured hasher
    pub fn hash(&self, plain_text: &str) -> AppResult<String> {
        Ok(self.hasher.hash(plain_text)?)
    }
}

#[async_trait]
impl CredentialService for CredentialManager {
    async fn register_user(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        confirm_password: Option<&str>,
    ) -> AppResult<User> {
        let policy = self.policy.policy()?;
        let username = policy.check_username(username)?;
        let password = policy.check_password(password)?;

        if Some(password) != confirm_password {
            return Err(DomainError::PasswordsDoNotMatch.into());
        }

        // Best-effort: a concurrent registration can slip in between the
        // lookup and the store unless storage enforces uniqueness itself.
        if self
            .repo
            .find_one(UserField::Username, username)
            .await?
            .is_some()
        {
            tracing::warn!(username, "Registration rejected, username taken");
            return Err(DomainError::username_exists(username).into());
        }

        let user = User::new(username, self.hash(password)?);
        let user = self.repo.store(user).await?;

        tracing::info!(user_id = ?user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.repo.find_one(UserField::Username, username).await?;

        match user {
            Some(user) if self.hasher.verify(password, &user.password_hash) => {
                tracing::debug!(user_id = ?user.id, "User authenticated");
                Ok(user)
            }
            Some(user) => {
                tracing::warn!(user_id = ?user.id, "Authentication failed, wrong password");
                Err(DomainError::InvalidCredentials.into())
            }
            None => {
                // Same hashing work as a real verification; the digest and
                // any error are discarded
                let _ = self.hasher.hash(password);
                tracing::warn!("Authentication failed, unknown username");
                Err(DomainError::InvalidCredentials.into())
            }
        }
    }

    fn change_password(
        &self,
        user: &mut User,
        old_password: &str,
        new_password: Option<&str>,
        confirm_new_password: Option<&str>,
    ) -> AppResult<()> {
        if !self.hasher.verify(old_password, &user.password_hash) {
            tracing::warn!(user_id = ?user.id, "Password change rejected, old password incorrect");
            return Err(DomainError::InvalidCredentials.into());
        }

        let new_password = self.policy.policy()?.check_password(new_password)?;

        if Some(new_password) != confirm_new_password {
            return Err(DomainError::PasswordsDoNotMatch.into());
        }

        user.set_password_hash(self.hash(new_password)?);
        tracing::info!(user_id = ?user.id, "Password changed");
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        tracing::debug!(%id, "Looking up user");
        self.repo.get(id).await
    }

    async fn store_user(&self, user: User) -> AppResult<User> {
        self.repo.store(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::{CredentialPolicy, HashAlgorithm, HasherConfig, LegacySha1Hasher};

    use crate::repository::{InMemoryUserStore, MockUserRepository};

    // Hashes of "foobar" and "testing" under the salt "test"
    const FOOBAR_HASH: &str = "61e38e2b77827e10777ee8f1a138b7cfb1eb895";
    const TESTING_HASH: &str = "6b399df23c6b76d667f5e043d2dd13407a2245bb";

    fn policy() -> Arc<PolicyStore> {
        Arc::new(PolicyStore::with_policy(CredentialPolicy::new(4, 5).unwrap()))
    }

    fn hasher() -> Arc<dyn PasswordHasher> {
        Arc::new(LegacySha1Hasher::new("test"))
    }

    fn service_with(repo: Arc<dyn UserRepository>) -> CredentialManager {
        CredentialManager::new(repo, policy(), hasher())
    }

    fn service() -> (CredentialManager, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        (service_with(store.clone()), store)
    }

    /// Repository that must never be touched
    fn untouched_repo() -> Arc<dyn UserRepository> {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().times(0);
        repo.expect_store().times(0);
        repo.expect_get().times(0);
        Arc::new(repo)
    }

    fn foobar_user() -> User {
        User::new("test", FOOBAR_HASH)
    }

    fn domain_err<T: std::fmt::Debug>(result: AppResult<T>) -> DomainError {
        match result {
            Err(AppError::Credential(err)) => err,
            other => panic!("expected a credential error, got {:?}", other),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    #[tokio::test]
    async fn test_register_user_none_username() {
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(None, Some("test1"), Some("test1")).await);
        assert_eq!(err, DomainError::UsernameTooShort { min: 4 });
    }

    #[tokio::test]
    async fn test_register_user_short_username() {
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(Some("a"), Some("test1"), Some("test1")).await);
        assert_eq!(err, DomainError::UsernameTooShort { min: 4 });
    }

    #[tokio::test]
    async fn test_register_user_none_password() {
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(Some("test"), None, None).await);
        assert_eq!(err, DomainError::PasswordTooShort { min: 5 });
    }

    #[tokio::test]
    async fn test_register_user_short_password() {
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(Some("test"), Some("a"), Some("a")).await);
        assert_eq!(err, DomainError::PasswordTooShort { min: 5 });
    }

    #[tokio::test]
    async fn test_register_user_passwords_do_not_match() {
        let service = service_with(untouched_repo());
        let err = domain_err(
            service
                .register_user(Some("test"), Some("test1"), Some("test2"))
                .await,
        );
        assert_eq!(err, DomainError::PasswordsDoNotMatch);
    }

    #[tokio::test]
    async fn test_register_user_missing_confirmation() {
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(Some("test"), Some("test1"), None).await);
        assert_eq!(err, DomainError::PasswordsDoNotMatch);
    }

    #[tokio::test]
    async fn test_register_user_confirmation_is_case_sensitive() {
        let service = service_with(untouched_repo());
        let err = domain_err(
            service
                .register_user(Some("test"), Some("Test1"), Some("test1"))
                .await,
        );
        assert_eq!(err, DomainError::PasswordsDoNotMatch);
    }

    #[tokio::test]
    async fn test_register_user_username_check_comes_first() {
        // Everything is wrong; the username failure wins
        let service = service_with(untouched_repo());
        let err = domain_err(service.register_user(Some("a"), Some("b"), Some("c")).await);
        assert_eq!(err, DomainError::UsernameTooShort { min: 4 });
    }

    #[tokio::test]
    async fn test_register_user_username_taken() {
        let (service, store) = service();
        store.store(User::new("test", "whatever")).await.unwrap();

        let err = domain_err(
            service
                .register_user(Some("test"), Some("test1"), Some("test1"))
                .await,
        );
        assert_eq!(err, DomainError::UsernameAlreadyExists("test".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_user() {
        let (service, store) = service();

        let user = service
            .register_user(Some("test"), Some("test1"), Some("test1"))
            .await
            .unwrap();

        assert!(user.id.is_some());
        assert_eq!(user.username, "test");
        assert_eq!(user.password_hash, service.hash("test1").unwrap());
        assert_ne!(user.password_hash, "test1");

        let stored = store.get(user.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.username, "test");
    }

    #[tokio::test]
    async fn test_register_user_default_hasher_matches_hash() {
        let hasher = HasherConfig::new(HashAlgorithm::default(), "test").build();
        let service = CredentialManager::new(Arc::new(InMemoryUserStore::new()), policy(), hasher);

        let user = service
            .register_user(Some("test"), Some("test1"), Some("test1"))
            .await
            .unwrap();

        assert_eq!(user.password_hash, service.hash("test1").unwrap());
        assert_eq!(service.hash("test1").unwrap(), service.hash("test1").unwrap());
    }

    #[tokio::test]
    async fn test_register_user_stores_exactly_once() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one()
            .withf(|field, value| *field == UserField::Username && value.to_string() == "test")
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_store().times(1).returning(|mut user| {
            user.id = Some(Uuid::new_v4());
            Ok(user)
        });

        let service = service_with(Arc::new(repo));
        let user = service
            .register_user(Some("test"), Some("test1"), Some("test1"))
            .await
            .unwrap();
        assert!(user.is_persisted());
    }

    #[tokio::test]
    async fn test_register_user_without_policy() {
        let service =
            CredentialManager::new(untouched_repo(), Arc::new(PolicyStore::new()), hasher());
        let err = domain_err(
            service
                .register_user(Some("test"), Some("test1"), Some("test1"))
                .await,
        );
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }

    // =========================================================================
    // Lookup and store
    // =========================================================================

    #[tokio::test]
    async fn test_store_user() {
        let (service, _) = service();
        let user = User::new("a", "not-validated");
        assert!(user.id.is_none());

        let stored = service.store_user(user).await.unwrap();
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn test_get_user() {
        let (service, store) = service();
        let stored = store
            .store(User::new(Uuid::new_v4().to_string(), "hash"))
            .await
            .unwrap();

        let fetched = service.get_user(stored.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.username, stored.username);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let (service, _) = service();
        assert!(service.get_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    // =========================================================================
    // Change password
    // =========================================================================

    #[test]
    fn test_change_password_incorrect_old() {
        let service = service_with(untouched_repo());
        let mut user = foobar_user();

        let err = domain_err(service.change_password(&mut user, "test", None, None));
        assert_eq!(err, DomainError::InvalidCredentials);
        assert_eq!(user.password_hash, FOOBAR_HASH);
    }

    #[test]
    fn test_change_password_too_short_new() {
        let service = service_with(untouched_repo());
        let mut user = foobar_user();

        let err = domain_err(service.change_password(&mut user, "foobar", Some("a"), Some("a")));
        assert_eq!(err, DomainError::PasswordTooShort { min: 5 });
    }

    #[test]
    fn test_change_password_none_new() {
        let service = service_with(untouched_repo());
        let mut user = foobar_user();

        let err = domain_err(service.change_password(&mut user, "foobar", None, None));
        assert_eq!(err, DomainError::PasswordTooShort { min: 5 });
    }

    #[test]
    fn test_change_password_not_match() {
        let service = service_with(untouched_repo());
        let mut user = foobar_user();

        let err = domain_err(service.change_password(
            &mut user,
            "foobar",
            Some("test1"),
            Some("test2"),
        ));
        assert_eq!(err, DomainError::PasswordsDoNotMatch);
        assert_eq!(user.password_hash, FOOBAR_HASH);
    }

    #[test]
    fn test_change_password() {
        let service = service_with(untouched_repo());
        let mut user = foobar_user();

        service
            .change_password(&mut user, "foobar", Some("testing"), Some("testing"))
            .unwrap();

        assert_eq!(user.password_hash, TESTING_HASH);
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    #[tokio::test]
    async fn test_authenticate() {
        let (service, _) = service();
        let registered = service
            .register_user(Some("alice"), Some("secret1"), Some("secret1"))
            .await
            .unwrap();

        let user = service.authenticate("alice", "secret1").await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let (service, _) = service();
        service
            .register_user(Some("alice"), Some("secret1"), Some("secret1"))
            .await
            .unwrap();

        let err = domain_err(service.authenticate("alice", "secret2").await);
        assert_eq!(err, DomainError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let (service, _) = service();
        let err = domain_err(service.authenticate("nobody", "secret1").await);
        assert_eq!(err, DomainError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_changed_password_authenticates_after_store() {
        let (service, _) = service();
        let mut user = service
            .register_user(Some("alice"), Some("secret1"), Some("secret1"))
            .await
            .unwrap();

        service
            .change_password(&mut user, "secret1", Some("secret2"), Some("secret2"))
            .unwrap();

        // Not persisted yet
        assert!(service.authenticate("alice", "secret2").await.is_err());

        service.store_user(user).await.unwrap();
        assert!(service.authenticate("alice", "secret2").await.is_ok());
        assert!(service.authenticate("alice", "secret1").await.is_err());
    }
}
