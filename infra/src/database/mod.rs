//! Database module - connection provider, executor, dialects, migrations
//! and the SQL repository implementations.

pub mod connection;
pub mod dialect;
pub mod dispatcher;
pub mod executor;
pub mod migrations;
pub mod repositories;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabaseManager, PoolStatistics};
pub use dialect::{dialect_for, SqlDialect};
pub use dispatcher::WriteDispatcher;
pub use executor::{SqlValue, StatementExecutor};
pub use migrations::{FailurePolicy, Migration, MigrationRunner, CORE_MODULE};
pub use repositories::{SqlCooldownRepository, SqlPlayerRepository};
