//! Credential service configuration.

use std::env;

use common::properties_from_env;
use domain::{CredentialPolicy, DomainResult, HasherConfig, Properties};

/// Prefix for service-specific environment variables
pub const ENV_PREFIX: &str = "CREDENTIAL_SERVICE";

/// SQLite file in the working directory, created on first use
pub const DEFAULT_DATABASE_URL: &str = "sqlite://credentials.db?mode=rwc";

/// Credential service configuration.
#[derive(Clone)]
pub struct CredentialServiceConfig {
    /// Database connection URL
    pub database_url: String,
    /// Credential properties (`username.length.min`, `password.salt`, ...)
    pub properties: Properties,
}

impl std::fmt::Debug for CredentialServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialServiceConfig")
            .field("database_url", &"[REDACTED]")
            .field("properties", &self.properties.len())
            .finish()
    }
}

impl CredentialServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `CREDENTIAL_SERVICE_*` variables win over their unprefixed forms.
    pub fn from_env() -> Self {
        let properties = properties_from_env(Some(ENV_PREFIX));

        Self {
            database_url: env::var(format!("{}_DATABASE_URL", ENV_PREFIX))
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            properties,
        }
    }

    /// Length policy from the properties
    pub fn policy(&self) -> DomainResult<CredentialPolicy> {
        CredentialPolicy::from_properties(Some(&self.properties))
    }

    /// Hashing configuration from the properties
    pub fn hasher(&self) -> DomainResult<HasherConfig> {
        HasherConfig::from_properties(Some(&self.properties))
    }
}

impl Default for CredentialServiceConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            properties: Properties::new(),
        }
    }
}
