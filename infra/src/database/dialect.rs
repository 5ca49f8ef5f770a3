//! SQL dialect table.
//!
//! Every piece of backend-dependent SQL lives here, keyed by
//! [`DatabaseKind`], so dialect differences never leak into conditionals
//! scattered across the engine and repositories. Dependent modules
//! authoring their own migrations can reuse the exposed fragments
//! (`autoincrement_pk`, `now_expr`) in their DDL.

use hexvg_shared::config::DatabaseKind;

/// Syntax variants for one relational backend.
#[derive(Debug)]
pub struct SqlDialect {
    /// Autoincrementing integer primary key column definition
    pub autoincrement_pk: &'static str,
    /// Expression yielding the current timestamp on the server
    pub now_expr: &'static str,
    /// DDL for the migration ledger table
    pub ledger_ddl: &'static str,
    /// DDL for the built-in players table
    pub players_ddl: &'static str,
    /// DDL for the built-in cooldowns table
    pub cooldowns_ddl: &'static str,
    /// Upsert of a full player row (uuid, name, first_join, last_join)
    pub player_upsert: &'static str,
    /// Upsert of a cooldown row (uuid, cd_key, expires_at)
    pub cooldown_upsert: &'static str,
}

static MYSQL: SqlDialect = SqlDialect {
    autoincrement_pk: "INT PRIMARY KEY AUTO_INCREMENT",
    now_expr: "NOW()",
    ledger_ddl: "CREATE TABLE IF NOT EXISTS hexvg_migrations (
        id          INT PRIMARY KEY AUTO_INCREMENT,
        module_name VARCHAR(64)  NOT NULL,
        version     INT          NOT NULL,
        name        VARCHAR(128) NOT NULL,
        applied_at  DATETIME     NOT NULL,
        UNIQUE KEY unique_migration (module_name, version)
    )",
    players_ddl: "CREATE TABLE IF NOT EXISTS hexvg_players (
        uuid       VARCHAR(36) PRIMARY KEY,
        name       VARCHAR(16) NOT NULL,
        first_join DATETIME    NOT NULL DEFAULT NOW(),
        last_join  DATETIME    NOT NULL DEFAULT NOW()
    )",
    cooldowns_ddl: "CREATE TABLE IF NOT EXISTS hexvg_cooldowns (
        uuid       VARCHAR(36) NOT NULL,
        cd_key     VARCHAR(64) NOT NULL,
        expires_at BIGINT      NOT NULL,
        PRIMARY KEY (uuid, cd_key)
    )",
    player_upsert: "INSERT INTO hexvg_players (uuid, name, first_join, last_join) \
        VALUES (?, ?, ?, ?) \
        ON DUPLICATE KEY UPDATE name = VALUES(name), last_join = VALUES(last_join)",
    cooldown_upsert: "INSERT INTO hexvg_cooldowns (uuid, cd_key, expires_at) \
        VALUES (?, ?, ?) \
        ON DUPLICATE KEY UPDATE expires_at = VALUES(expires_at)",
};

static SQLITE: SqlDialect = SqlDialect {
    autoincrement_pk: "INTEGER PRIMARY KEY AUTOINCREMENT",
    now_expr: "datetime('now')",
    ledger_ddl: "CREATE TABLE IF NOT EXISTS hexvg_migrations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        module_name TEXT    NOT NULL,
        version     INTEGER NOT NULL,
        name        TEXT    NOT NULL,
        applied_at  TEXT    NOT NULL,
        UNIQUE (module_name, version)
    )",
    players_ddl: "CREATE TABLE IF NOT EXISTS hexvg_players (
        uuid       TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        first_join TEXT NOT NULL DEFAULT (datetime('now')),
        last_join  TEXT NOT NULL DEFAULT (datetime('now'))
    )",
    cooldowns_ddl: "CREATE TABLE IF NOT EXISTS hexvg_cooldowns (
        uuid       TEXT    NOT NULL,
        cd_key     TEXT    NOT NULL,
        expires_at INTEGER NOT NULL,
        PRIMARY KEY (uuid, cd_key)
    )",
    player_upsert: "INSERT OR REPLACE INTO hexvg_players (uuid, name, first_join, last_join) \
        VALUES (?, ?, ?, ?)",
    cooldown_upsert: "INSERT OR REPLACE INTO hexvg_cooldowns (uuid, cd_key, expires_at) \
        VALUES (?, ?, ?)",
};

/// Dialect for a relational backend kind.
///
/// # Panics
/// Panics for the document kind; call sites guard with
/// `kind.is_relational()` first (the engine and repositories do).
pub fn dialect_for(kind: DatabaseKind) -> &'static SqlDialect {
    match kind {
        DatabaseKind::MySql => &MYSQL,
        DatabaseKind::Sqlite => &SQLITE,
        DatabaseKind::MongoDb => panic!("no SQL dialect for a document backend"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_relational_kind_has_a_dialect() {
        assert_eq!(dialect_for(DatabaseKind::MySql).now_expr, "NOW()");
        assert_eq!(dialect_for(DatabaseKind::Sqlite).now_expr, "datetime('now')");
    }

    #[test]
    fn upserts_differ_structurally() {
        assert!(dialect_for(DatabaseKind::MySql)
            .player_upsert
            .contains("ON DUPLICATE KEY UPDATE"));
        assert!(dialect_for(DatabaseKind::Sqlite)
            .player_upsert
            .starts_with("INSERT OR REPLACE"));
    }

    #[test]
    #[should_panic]
    fn document_kind_has_no_dialect() {
        dialect_for(DatabaseKind::MongoDb);
    }
}
