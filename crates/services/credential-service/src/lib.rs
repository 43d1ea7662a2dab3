//! Credential Service Library
//!
//! Registers users, enforces username/password policy, hashes and verifies
//! passwords, and changes passwords after checking the old one. Storage sits
//! behind the `UserRepository` trait.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::CredentialServiceConfig;
use crate::infra::{Database, MigrationStatus};
use crate::repository::{UserRepository, UserStore};
use crate::service::CredentialManager;
use common::AppResult;
use domain::PolicyStore;

/// Wire a credential service around an existing repository.
///
/// The policy is validated and frozen here; a malformed configuration fails
/// before any service is handed out.
pub fn build_service(
    repo: Arc<dyn UserRepository>,
    config: &CredentialServiceConfig,
) -> AppResult<CredentialManager> {
    let policy = Arc::new(PolicyStore::new());
    policy.set_properties(Some(&config.properties))?;

    let hasher = config.hasher()?;
    info!(algorithm = %hasher.algorithm, "Password hasher configured");

    Ok(CredentialManager::new(repo, policy, hasher.build()))
}

/// Connect to the configured database and build a service backed by it.
pub async fn connect_service(
    config: &CredentialServiceConfig,
) -> AppResult<CredentialManager> {
    let db = Database::connect(&config.database_url).await?;
    let repo = Arc::new(UserStore::new(db.get_connection()));
    build_service(repo, config)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &CredentialServiceConfig,
    action: MigrateAction,
) -> AppResult<Vec<MigrationStatus>> {
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {}
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(db.migration_status().await?)
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
