//! Error taxonomy of the persistence subsystem.

use hexvg_shared::config::DatabaseKind;
use thiserror::Error;

/// Failures surfaced by the connection provider and migration engine.
///
/// Propagation policy:
/// - [`DbError::ConnectionUnavailable`] and [`DbError::UnsupportedForBackend`]
///   are returned to the immediate caller - the first means the backend is
///   genuinely down or closed, the second means the caller used the wrong
///   API for the connected backend (a programming error, not a runtime
///   fault).
/// - [`DbError::Statement`] is contained inside the statement executor:
///   logged and surfaced only as an empty/`-1`/`false` sentinel, so a
///   transient database hiccup degrades a feature instead of interrupting
///   the game loop.
/// - [`DbError::Migration`] aborts only the one failing migration; the
///   transaction is rolled back and the migration stays pending for the
///   next startup.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("operation `{operation}` is not supported for backend {kind}")]
    UnsupportedForBackend {
        operation: &'static str,
        kind: DatabaseKind,
    },

    #[error("statement failed: {0}")]
    Statement(String),

    #[error("migration [{module}] v{version} ({name}) failed: {reason}")]
    Migration {
        module: String,
        version: u32,
        name: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_backend_on_misuse() {
        let err = DbError::UnsupportedForBackend {
            operation: "acquire",
            kind: DatabaseKind::MongoDb,
        };
        assert_eq!(
            err.to_string(),
            "operation `acquire` is not supported for backend MONGODB"
        );
    }

    #[test]
    fn migration_error_carries_full_context() {
        let err = DbError::Migration {
            module: "HexShop".into(),
            version: 3,
            name: "create_shops_table".into(),
            reason: "table exists".into(),
        };
        let text = err.to_string();
        assert!(text.contains("HexShop"));
        assert!(text.contains("v3"));
        assert!(text.contains("create_shops_table"));
    }
}
