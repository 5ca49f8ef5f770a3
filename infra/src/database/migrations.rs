//! Migration ledger and engine.
//!
//! Each owning module registers versioned migrations at startup; the
//! engine applies the pending ones in ascending version order before any
//! repository traffic begins. A migration's statements and its ledger row
//! commit in the same transaction - "applied" always means the schema
//! change and the bookkeeping are atomically consistent, so a crash
//! mid-migration leaves the ledger accurate and the next startup retries
//! exactly the right set. DDL is rarely idempotent; the ledger is what
//! prevents double application.

use tracing::{debug, error, info, warn};

use hexvg_core::errors::DbError;

use crate::database::connection::DatabaseManager;
use crate::database::dialect::dialect_for;

/// Owning module of the built-in migrations.
pub const CORE_MODULE: &str = "HexVG-Core";

const LEDGER_TABLE: &str = "hexvg_migrations";

/// One hand-authored schema migration: plain data, no dispatch.
///
/// `version` must be unique and increasing per owning module; the
/// statements run in listed order inside one transaction.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub module: String,
    pub name: String,
    pub statements: Vec<String>,
}

impl Migration {
    pub fn new(
        version: u32,
        module: impl Into<String>,
        name: impl Into<String>,
        statements: Vec<String>,
    ) -> Self {
        Self {
            version,
            module: module.into(),
            name: name.into(),
            statements,
        }
    }
}

/// What to do with the rest of a module's pending batch after one
/// migration fails.
///
/// `Continue` matches the engine's historical behavior (independent
/// migrations still get their chance); `Halt` is the conservative choice
/// for modules whose later migrations depend on earlier schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Continue,
    Halt,
}

/// Applies registered migrations against the relational backend and keeps
/// the ledger.
pub struct MigrationRunner {
    db: DatabaseManager,
    registered: Vec<Migration>,
    failure_policy: FailurePolicy,
}

impl MigrationRunner {
    pub fn new(db: DatabaseManager) -> Self {
        Self {
            db,
            registered: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Create the ledger table, register the built-in core migrations and
    /// apply whatever is pending for the core module.
    ///
    /// No-op with a warning on a document backend - migrations are
    /// relational-only.
    pub async fn initialize(&mut self) {
        if !self.db.kind().is_relational() {
            warn!("migration engine only runs against MySQL/SQLite");
            return;
        }

        if let Err(e) = self.ensure_ledger_table().await {
            error!(error = %e, "failed to create the migration ledger table");
            return;
        }

        self.register_core_migrations();
        self.run_pending(CORE_MODULE).await;
        info!("migration engine initialized");
    }

    /// Register a migration descriptor. Must happen before `run_pending`
    /// for its module; versions may arrive in any order, sorting happens
    /// at run time. A `(module, version)` pair already registered is
    /// ignored with a warning.
    pub fn register(&mut self, migration: Migration) {
        let duplicate = self
            .registered
            .iter()
            .any(|m| m.module == migration.module && m.version == migration.version);
        if duplicate {
            warn!(
                module = %migration.module,
                version = migration.version,
                "migration already registered, ignoring"
            );
            return;
        }
        self.registered.push(migration);
    }

    /// Every registered migration, in registration order.
    pub fn registered(&self) -> &[Migration] {
        &self.registered
    }

    /// Apply the module's unapplied migrations in ascending version order.
    ///
    /// An empty pending set is a silent no-op. A failed migration is
    /// rolled back, logged, and handled per the [`FailurePolicy`]; it
    /// never aborts the process.
    pub async fn run_pending(&self, module: &str) {
        if !self.db.kind().is_relational() {
            return;
        }

        let mut pending: Vec<&Migration> = Vec::new();
        for migration in self.registered.iter().filter(|m| m.module == module) {
            if !self.is_applied(migration).await {
                pending.push(migration);
            }
        }
        pending.sort_by_key(|m| m.version);

        if pending.is_empty() {
            debug!(module, "no pending migrations");
            return;
        }

        info!(module, count = pending.len(), "applying migrations");
        for migration in pending {
            if let Err(e) = self.apply(migration).await {
                error!(
                    module = %migration.module,
                    version = migration.version,
                    name = %migration.name,
                    error = %e,
                    "migration failed, rolled back"
                );
                if self.failure_policy == FailurePolicy::Halt {
                    warn!(module, "halting remaining migrations for this module");
                    break;
                }
            }
        }
    }

    /// Ledger lookup for one migration. Any query fault counts as "not
    /// applied" - the engine fails open toward re-attempting, never toward
    /// skipping.
    pub async fn is_applied(&self, migration: &Migration) -> bool {
        let pool = match self.db.sql_pool("migrate") {
            Ok(pool) => pool,
            Err(_) => return false,
        };

        let sql = format!(
            "SELECT 1 FROM {LEDGER_TABLE} WHERE module_name = ? AND version = ?"
        );
        match sqlx::query(&sql)
            .bind(migration.module.clone())
            .bind(migration.version as i64)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row.is_some(),
            Err(e) => {
                error!(error = %e, "ledger lookup failed, treating migration as pending");
                false
            }
        }
    }

    /// Run one migration: every statement, then the ledger insert, in a
    /// single transaction. Any failure rolls the whole transaction back
    /// and leaves the migration eligible for retry on next startup.
    async fn apply(&self, migration: &Migration) -> Result<(), DbError> {
        info!(
            module = %migration.module,
            version = migration.version,
            name = %migration.name,
            "applying migration"
        );

        let fault = |reason: String| DbError::Migration {
            module: migration.module.clone(),
            version: migration.version,
            name: migration.name.clone(),
            reason,
        };

        let pool = self.db.sql_pool("migrate").map_err(|e| fault(e.to_string()))?;
        let mut tx = pool.begin().await.map_err(|e| fault(e.to_string()))?;

        for statement in &migration.statements {
            if statement.trim().is_empty() {
                continue;
            }
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| fault(e.to_string()))?;
        }

        let ledger_insert = format!(
            "INSERT INTO {LEDGER_TABLE} (module_name, version, name, applied_at) \
             VALUES (?, ?, ?, {})",
            dialect_for(self.db.kind()).now_expr
        );
        sqlx::query(&ledger_insert)
            .bind(migration.module.clone())
            .bind(migration.version as i64)
            .bind(migration.name.clone())
            .execute(&mut *tx)
            .await
            .map_err(|e| fault(e.to_string()))?;

        tx.commit().await.map_err(|e| fault(e.to_string()))?;

        info!(
            module = %migration.module,
            version = migration.version,
            name = %migration.name,
            "migration applied"
        );
        Ok(())
    }

    async fn ensure_ledger_table(&self) -> Result<(), DbError> {
        let pool = self.db.sql_pool("migrate")?;
        let ddl = dialect_for(self.db.kind()).ledger_ddl;
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DbError::Statement(e.to_string()))?;
        Ok(())
    }

    fn register_core_migrations(&mut self) {
        let dialect = dialect_for(self.db.kind());

        self.register(Migration::new(
            1,
            CORE_MODULE,
            "create_players_table",
            vec![dialect.players_ddl.to_string()],
        ));
        self.register(Migration::new(
            2,
            CORE_MODULE,
            "create_cooldowns_table",
            vec![dialect.cooldowns_ddl.to_string()],
        ));
    }
}
