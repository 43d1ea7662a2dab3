//! Domain layer - Credential entities, policy and hashing.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod error;
pub mod password;
pub mod policy;
pub mod properties;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{Argon2Hasher, HashAlgorithm, HasherConfig, LegacySha1Hasher, PasswordHasher};
pub use policy::{CredentialPolicy, PolicyStore};
pub use properties::Properties;
pub use user::{User, UserField};
