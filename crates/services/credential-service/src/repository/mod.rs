//! Repository layer for data access.
//!
//! `UserRepository` is the persistence contract the credential service
//! depends on; `UserStore` backs it with SeaORM and `InMemoryUserStore`
//! keeps users in process memory.

pub mod entities;
mod memory;
mod user_repository;

pub use memory::InMemoryUserStore;
pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
