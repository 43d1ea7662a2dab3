//! Credential policy - minimum username and password lengths.
//!
//! `CredentialPolicy` is an immutable value built from a `Properties` bag.
//! `PolicyStore` holds one policy and accepts it exactly once; later attempts
//! fail with `ConfigurationAlreadySet` and leave the first values in place.

use once_cell::sync::OnceCell;

use crate::constants::{PASSWORD_LENGTH_MIN_KEY, USERNAME_LENGTH_MIN_KEY};
use crate::error::{DomainError, DomainResult};
use crate::properties::Properties;

/// Minimum length rules for usernames and passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    min_username_length: usize,
    min_password_length: usize,
}

impl CredentialPolicy {
    /// Create a policy from explicit values.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if either length is zero.
    pub fn new(min_username_length: usize, min_password_length: usize) -> DomainResult<Self> {
        if min_username_length == 0 {
            return Err(DomainError::invalid_configuration(format!(
                "{} must be a positive integer",
                USERNAME_LENGTH_MIN_KEY
            )));
        }
        if min_password_length == 0 {
            return Err(DomainError::invalid_configuration(format!(
                "{} must be a positive integer",
                PASSWORD_LENGTH_MIN_KEY
            )));
        }

        Ok(Self {
            min_username_length,
            min_password_length,
        })
    }

    /// Build a policy from a configuration bag.
    ///
    /// Both `username.length.min` and `password.length.min` must be present
    /// and parse as positive integers.
    pub fn from_properties(properties: Option<&Properties>) -> DomainResult<Self> {
        let properties = properties
            .ok_or_else(|| DomainError::invalid_configuration("properties must not be empty"))?;

        let min_username_length = positive_integer(properties, USERNAME_LENGTH_MIN_KEY)?;
        let min_password_length = positive_integer(properties, PASSWORD_LENGTH_MIN_KEY)?;

        Self::new(min_username_length, min_password_length)
    }

    pub fn min_username_length(&self) -> usize {
        self.min_username_length
    }

    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Check a candidate username against the minimum length and hand it
    /// back once it passes.
    pub fn check_username<'a>(&self, username: Option<&'a str>) -> DomainResult<&'a str> {
        match username {
            Some(name) if char_len(name) >= self.min_username_length => Ok(name),
            _ => Err(DomainError::UsernameTooShort {
                min: self.min_username_length,
            }),
        }
    }

    /// Check a candidate password against the minimum length.
    pub fn check_password<'a>(&self, password: Option<&'a str>) -> DomainResult<&'a str> {
        match password {
            Some(pass) if char_len(pass) >= self.min_password_length => Ok(pass),
            _ => Err(DomainError::PasswordTooShort {
                min: self.min_password_length,
            }),
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn positive_integer(properties: &Properties, key: &str) -> DomainResult<usize> {
    let raw = properties
        .get_property(key)
        .ok_or_else(|| DomainError::invalid_configuration(format!("{} is missing", key)))?;

    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(DomainError::invalid_configuration(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

/// Set-once holder for the credential policy.
///
/// Safe to configure from several threads; exactly one `set_properties`
/// call wins.
#[derive(Debug, Default)]
pub struct PolicyStore {
    policy: OnceCell<CredentialPolicy>,
}

impl PolicyStore {
    /// Create an unconfigured store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that is already configured
    pub fn with_policy(policy: CredentialPolicy) -> Self {
        Self {
            policy: OnceCell::with_value(policy),
        }
    }

    /// Validate and freeze the policy.
    ///
    /// # Errors
    /// - `InvalidConfiguration` when the bag is absent or malformed
    ///   (checked before anything else)
    /// - `ConfigurationAlreadySet` when a policy is already in effect
    pub fn set_properties(&self, properties: Option<&Properties>) -> DomainResult<()> {
        let policy = CredentialPolicy::from_properties(properties)?;

        self.policy.set(policy).map_err(|_| {
            tracing::warn!("Credential policy already configured, ignoring new values");
            DomainError::ConfigurationAlreadySet
        })?;

        tracing::info!(
            min_username_length = policy.min_username_length,
            min_password_length = policy.min_password_length,
            "Credential policy configured"
        );
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.policy.get().is_some()
    }

    /// Current policy.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if no policy has been set yet.
    pub fn policy(&self) -> DomainResult<CredentialPolicy> {
        self.policy.get().copied().ok_or_else(|| {
            DomainError::invalid_configuration("credential policy has not been configured")
        })
    }

    pub fn min_username_length(&self) -> DomainResult<usize> {
        self.policy().map(|p| p.min_username_length)
    }

    pub fn min_password_length(&self) -> DomainResult<usize> {
        self.policy().map(|p| p.min_password_length)
    }
}
