//! End-to-end credential workflows through the public wiring.

use std::sync::Arc;

use common::AppError;
use credential_service_lib::build_service;
use credential_service_lib::config::CredentialServiceConfig;
use credential_service_lib::infra::Database;
use credential_service_lib::repository::{InMemoryUserStore, UserStore};
use credential_service_lib::service::CredentialService;
use domain::{
    DomainError, Properties, PASSWORD_ALGORITHM_KEY, PASSWORD_LENGTH_MIN_KEY, PASSWORD_SALT_KEY,
    USERNAME_LENGTH_MIN_KEY,
};

fn config(algorithm: &str) -> CredentialServiceConfig {
    CredentialServiceConfig {
        properties: Properties::new()
            .with(USERNAME_LENGTH_MIN_KEY, "4")
            .with(PASSWORD_LENGTH_MIN_KEY, "5")
            .with(PASSWORD_SALT_KEY, "test")
            .with(PASSWORD_ALGORITHM_KEY, algorithm),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_register_and_authenticate_with_argon2() {
    let service = build_service(Arc::new(InMemoryUserStore::new()), &config("argon2")).unwrap();

    let user = service
        .register_user(Some("alice"), Some("secret1"), Some("secret1"))
        .await
        .unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));

    let authenticated = service.authenticate("alice", "secret1").await.unwrap();
    assert_eq!(authenticated.id, user.id);
}

#[tokio::test]
async fn test_default_configuration_hashes_deterministically() {
    let config = CredentialServiceConfig {
        properties: Properties::new()
            .with(USERNAME_LENGTH_MIN_KEY, "4")
            .with(PASSWORD_LENGTH_MIN_KEY, "5")
            .with(PASSWORD_SALT_KEY, "test"),
        ..Default::default()
    };
    let service = build_service(Arc::new(InMemoryUserStore::new()), &config).unwrap();

    let user = service
        .register_user(Some("test"), Some("test1"), Some("test1"))
        .await
        .unwrap();

    let digest = service.hash("test1").unwrap();
    assert_eq!(digest, service.hash("test1").unwrap());
    assert_eq!(user.password_hash, digest);
}

#[tokio::test]
async fn test_full_flow_against_database() {
    let db = Database::connect_in_memory().await.unwrap();
    let repo = Arc::new(UserStore::new(db.get_connection()));
    let service = build_service(repo, &config("sha1")).unwrap();

    let mut user = service
        .register_user(Some("test"), Some("foobar"), Some("foobar"))
        .await
        .unwrap();
    assert_eq!(user.password_hash, "61e38e2b77827e10777ee8f1a138b7cfb1eb895");

    let duplicate = service
        .register_user(Some("test"), Some("test1"), Some("test1"))
        .await;
    assert!(matches!(
        duplicate,
        Err(AppError::Credential(DomainError::UsernameAlreadyExists(_)))
    ));

    service
        .change_password(&mut user, "foobar", Some("testing"), Some("testing"))
        .unwrap();
    assert_eq!(user.password_hash, "6b399df23c6b76d667f5e043d2dd13407a2245bb");
    service.store_user(user.clone()).await.unwrap();

    let stored = service.get_user(user.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[test]
fn test_build_service_rejects_bad_configuration() {
    let mut config = config("sha1");
    config.properties.set_property(USERNAME_LENGTH_MIN_KEY, "abc");
    match build_service(Arc::new(InMemoryUserStore::new()), &config) {
        Err(err) => {
            assert_eq!(err.code(), "INVALID_CONFIGURATION");
            assert!(err.user_message().contains(USERNAME_LENGTH_MIN_KEY));
        }
        Ok(_) => panic!("malformed minimum must be rejected"),
    }

    let config = CredentialServiceConfig {
        properties: Properties::new()
            .with(USERNAME_LENGTH_MIN_KEY, "4")
            .with(PASSWORD_LENGTH_MIN_KEY, "5"),
        ..Default::default()
    };
    // Salt is required for hashing
    assert!(build_service(Arc::new(InMemoryUserStore::new()), &config).is_err());
}
