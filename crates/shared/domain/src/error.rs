//! Domain-level errors.
//!
//! Every credential policy violation has its own variant so callers can
//! branch on the exact failure. They are independent of infrastructure
//! concerns (database, CLI).

use thiserror::Error;

/// Domain-specific errors for credential and policy violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Configuration bag absent, incomplete or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Policy was already configured; the first values remain in effect
    #[error("Configuration has already been set")]
    ConfigurationAlreadySet,

    /// Username absent or shorter than the configured minimum
    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    /// Password absent or shorter than the configured minimum
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Password and its confirmation differ
    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    /// Another user already holds the username
    #[error("Username '{0}' already exists")]
    UsernameAlreadyExists(String),

    /// Presented password does not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        DomainError::InvalidConfiguration(msg.into())
    }

    /// Create a username conflict error
    pub fn username_exists(username: impl Into<String>) -> Self {
        DomainError::UsernameAlreadyExists(username.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
