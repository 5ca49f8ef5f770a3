//! # HexVG Infrastructure
//!
//! Persistence subsystem of the HexVG foundation layer:
//!
//! - **Connection provider** ([`database::DatabaseManager`]): one contract
//!   over MySQL, SQLite and MongoDB, selected from configuration at startup.
//! - **Statement executor** ([`database::StatementExecutor`]): parametrized
//!   query/update/existence helpers with contained faults, composed into
//!   repositories instead of inherited.
//! - **Migration ledger & engine** ([`database::MigrationRunner`]): versioned,
//!   per-module schema evolution with transactional at-most-once application.
//!
//! Construct the provider once at startup, run the migration engine, then
//! hand clones of the executor to each module's repositories.

// Re-export core types for convenience
pub use hexvg_core::errors::DbError;

pub mod database;

pub use database::{
    DatabaseManager, FailurePolicy, Migration, MigrationRunner, PoolStatistics, SqlValue,
    StatementExecutor, WriteDispatcher,
};
