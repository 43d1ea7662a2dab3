//! Infrastructure layer - database and schema migrations.

mod db;
pub mod migrations;

pub use db::{Database, MigrationStatus, IN_MEMORY_DATABASE_URL};
pub use migrations::Migrator;
