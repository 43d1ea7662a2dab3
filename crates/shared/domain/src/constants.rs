//! Domain-level constants.
//!
//! These constants define configuration keys and storage field names shared
//! by the policy, hashing and persistence layers.

// =============================================================================
// Configuration Keys
// =============================================================================

/// Minimum username length property
pub const USERNAME_LENGTH_MIN_KEY: &str = "username.length.min";

/// Minimum password length property
pub const PASSWORD_LENGTH_MIN_KEY: &str = "password.length.min";

/// Salt mixed into every password hash
pub const PASSWORD_SALT_KEY: &str = "password.salt";

/// Hash algorithm selector (`argon2` or `sha1`)
pub const PASSWORD_ALGORITHM_KEY: &str = "password.algorithm";

/// All keys understood by the credential configuration
pub const CONFIGURATION_KEYS: &[&str] = &[
    USERNAME_LENGTH_MIN_KEY,
    PASSWORD_LENGTH_MIN_KEY,
    PASSWORD_SALT_KEY,
    PASSWORD_ALGORITHM_KEY,
];

// =============================================================================
// Hashing
// =============================================================================

/// Algorithm name for the legacy salted SHA-1 digest
pub const ALGORITHM_SHA1: &str = "sha1";

/// Algorithm name for Argon2id
pub const ALGORITHM_ARGON2: &str = "argon2";

// =============================================================================
// Storage Fields
// =============================================================================

/// Username column
pub const FIELD_USERNAME: &str = "username";

/// Email column
pub const FIELD_EMAIL: &str = "email";
