//! Unified error handling for the credential services.
//!
//! Wraps domain failures unchanged so callers can still match on the exact
//! policy violation, and adds the infrastructure failures services can hit.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Credential and policy failures
    #[error(transparent)]
    Credential(#[from] DomainError),

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get a stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Credential(err) => match err {
                DomainError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
                DomainError::ConfigurationAlreadySet => "CONFIGURATION_ALREADY_SET",
                DomainError::UsernameTooShort { .. } => "USERNAME_TOO_SHORT",
                DomainError::PasswordTooShort { .. } => "PASSWORD_TOO_SHORT",
                DomainError::PasswordsDoNotMatch => "PASSWORDS_DO_NOT_MATCH",
                DomainError::UsernameAlreadyExists(_) => "USERNAME_ALREADY_EXISTS",
                DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
                DomainError::Internal(_) => "INTERNAL_ERROR",
            },
            AppError::NotFound => "NOT_FOUND",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Credential(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
