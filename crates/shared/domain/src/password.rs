//! Password hashing - salted, one-way digests of plaintext credentials.
//!
//! Every algorithm digests `plain_text + salt`, in that order. Stored hashes
//! from earlier deployments depend on the order, so it must not change.
//!
//! - `LegacySha1Hasher`: deterministic SHA-1, compatible with existing data.
//! - `Argon2Hasher`: Argon2id whose PHC salt is derived from the configured
//!   one, so equal inputs give equal strings. Default for new deployments.

use std::str::FromStr;
use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use sha1::{Digest, Sha1};

use crate::constants::{ALGORITHM_ARGON2, ALGORITHM_SHA1, PASSWORD_ALGORITHM_KEY, PASSWORD_SALT_KEY};
use crate::error::{DomainError, DomainResult};
use crate::properties::Properties;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    Sha1,
    #[default]
    Argon2,
}

impl FromStr for HashAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            ALGORITHM_SHA1 => Ok(HashAlgorithm::Sha1),
            ALGORITHM_ARGON2 => Ok(HashAlgorithm::Argon2),
            other => Err(DomainError::invalid_configuration(format!(
                "unknown {} '{}'",
                PASSWORD_ALGORITHM_KEY, other
            ))),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "{}", ALGORITHM_SHA1),
            HashAlgorithm::Argon2 => write!(f, "{}", ALGORITHM_ARGON2),
        }
    }
}

/// One-way password hashing.
///
/// Hashes cannot be turned back into plaintext.
pub trait PasswordHasher: Send + Sync + std::fmt::Debug {
    /// Algorithm implemented by this hasher
    fn algorithm(&self) -> HashAlgorithm;

    /// Hash a plaintext password. Equal inputs give equal hashes.
    fn hash(&self, plain_text: &str) -> DomainResult<String>;

    /// Verify a plaintext password against a stored hash
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Salted SHA-1 hasher matching previously stored hashes.
///
/// Each digest byte is printed as lowercase hex without zero padding
/// (`0x07` becomes `"7"`), so digests may be shorter than 40 characters.
#[derive(Clone)]
pub struct LegacySha1Hasher {
    salt: String,
}

impl LegacySha1Hasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    fn digest(&self, plain_text: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(plain_text.as_bytes());
        hasher.update(self.salt.as_bytes());

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:x}", byte))
            .collect()
    }
}

impl std::fmt::Debug for LegacySha1Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacySha1Hasher")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl PasswordHasher for LegacySha1Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha1
    }

    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        Ok(self.digest(plain_text))
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        self.digest(plain_text) == hash
    }
}

/// Argon2id hasher producing PHC strings.
///
/// The PHC salt is the base64 of SHA-1(configured salt). Argon2 needs at
/// least 8 salt bytes, which short configured salts would not provide.
#[derive(Clone)]
pub struct Argon2Hasher {
    salt: String,
}

impl Argon2Hasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    fn salted(&self, plain_text: &str) -> String {
        format!("{}{}", plain_text, self.salt)
    }

    fn phc_salt(&self) -> DomainResult<SaltString> {
        let digest = Sha1::digest(self.salt.as_bytes());
        SaltString::encode_b64(&digest)
            .map_err(|e| DomainError::internal(format!("Invalid password salt: {}", e)))
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Argon2
    }

    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        let salt = self.phc_salt()?;
        let hash = Self::argon2()
            .hash_password(self.salted(plain_text).as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Self::argon2()
            .verify_password(self.salted(plain_text).as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hashing configuration: algorithm plus the deployment-wide salt.
#[derive(Clone, PartialEq, Eq)]
pub struct HasherConfig {
    pub algorithm: HashAlgorithm,
    salt: String,
}

impl std::fmt::Debug for HasherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HasherConfig")
            .field("algorithm", &self.algorithm)
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl HasherConfig {
    pub fn new(algorithm: HashAlgorithm, salt: impl Into<String>) -> Self {
        Self {
            algorithm,
            salt: salt.into(),
        }
    }

    /// Read `password.salt` (required) and `password.algorithm` (optional,
    /// defaults to argon2).
    pub fn from_properties(properties: Option<&Properties>) -> DomainResult<Self> {
        let properties = properties
            .ok_or_else(|| DomainError::invalid_configuration("properties must not be empty"))?;

        let salt = properties.get_property(PASSWORD_SALT_KEY).ok_or_else(|| {
            DomainError::invalid_configuration(format!("{} is missing", PASSWORD_SALT_KEY))
        })?;

        let algorithm = properties
            .get_property(PASSWORD_ALGORITHM_KEY)
            .map(HashAlgorithm::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(Self::new(algorithm, salt))
    }

    /// Build the configured hasher
    pub fn build(&self) -> Arc<dyn PasswordHasher> {
        match self.algorithm {
            HashAlgorithm::Sha1 => Arc::new(LegacySha1Hasher::new(self.salt.clone())),
            HashAlgorithm::Argon2 => Arc::new(Argon2Hasher::new(self.salt.clone())),
        }
    }
}
