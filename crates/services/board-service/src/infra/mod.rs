//! Infrastructure layer - database and schema.

pub mod migrations;

pub use migrations::Migrator;

/// Database handle bound to this service's migrations.
pub type Database = persistence::Database<Migrator>;
