//! Service layer - credential use cases.

mod credential_service;

pub use credential_service::{CredentialManager, CredentialService};
