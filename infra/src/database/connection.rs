//! Connection provider.
//!
//! One narrow contract hides the backend differences: relational callers
//! acquire pooled connections, document callers take the shared database
//! handle, and everything downstream (executor, migration engine,
//! repositories) stays backend-agnostic.
//!
//! Establishment is fail-soft by design: a backend that cannot be reached
//! at startup is logged and the provider is handed out in a "not
//! connected" state - callers check [`DatabaseManager::is_connected`]
//! instead of unwinding the whole startup path.

use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tracing::{error, info, warn};

use hexvg_core::errors::DbError;
use hexvg_shared::config::{DatabaseKind, Settings};

/// sqlx requires the Any drivers to be installed once per process before
/// the first pool is built.
static INSTALL_DRIVERS: Once = Once::new();

fn install_drivers() {
    INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
}

enum Backend {
    /// MySQL or SQLite behind one Any pool.
    Sql(AnyPool),
    /// Shared MongoDB database handle; pooling happens inside the driver.
    /// Held in a takeable slot so `close` can drop the last clone and let
    /// the driver wind its connections down.
    Document(Mutex<Option<mongodb::Database>>),
    /// Establishment failed; every access reports `ConnectionUnavailable`.
    Unavailable,
}

struct Inner {
    kind: DatabaseKind,
    backend: Backend,
    closed: AtomicBool,
}

/// Central database manager, constructed once at startup and passed to
/// every consumer. Cloning is cheap (shared inner state).
#[derive(Clone)]
pub struct DatabaseManager {
    inner: Arc<Inner>,
}

impl DatabaseManager {
    /// Select the backend kind from configuration and establish it.
    ///
    /// Unrecognized `database.type` values fall back to SQLite with a
    /// logged warning. Establishment failures are logged and produce a
    /// not-connected provider rather than an error.
    pub async fn connect(settings: &Settings) -> Self {
        install_drivers();

        let kind = match DatabaseKind::parse(&settings.database.kind) {
            Some(kind) => kind,
            None => {
                warn!(
                    configured = %settings.database.kind,
                    "unknown database type, falling back to SQLITE"
                );
                DatabaseKind::Sqlite
            }
        };

        info!(%kind, "connecting to database");

        let backend = match kind {
            DatabaseKind::MySql => Self::connect_mysql(settings).await,
            DatabaseKind::Sqlite => Self::connect_sqlite(settings).await,
            DatabaseKind::MongoDb => Self::connect_mongodb(settings).await,
        };

        Self {
            inner: Arc::new(Inner {
                kind,
                backend,
                closed: AtomicBool::new(false),
            }),
        }
    }

    async fn connect_mysql(settings: &Settings) -> Backend {
        let mysql = &settings.database.mysql;
        let pool = AnyPoolOptions::new()
            .max_connections(mysql.pool.max_size)
            .min_connections(mysql.pool.min_idle)
            .acquire_timeout(Duration::from_millis(mysql.pool.acquire_timeout_ms))
            .idle_timeout(Duration::from_millis(mysql.pool.idle_timeout_ms))
            .max_lifetime(Duration::from_millis(mysql.pool.max_lifetime_ms))
            .connect(&mysql.url())
            .await;

        match pool {
            Ok(pool) => {
                info!(host = %mysql.host, port = mysql.port, "connected to MySQL");
                Backend::Sql(pool)
            }
            Err(e) => {
                error!(error = %e, "failed to connect to MySQL");
                Backend::Unavailable
            }
        }
    }

    async fn connect_sqlite(settings: &Settings) -> Backend {
        let path = settings.sqlite_path();

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(error = %e, dir = %parent.display(), "failed to create data directory");
                return Backend::Unavailable;
            }
        }

        // The embedded engine does not support concurrent writers;
        // the pool is hard-capped at a single connection.
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await;

        match pool {
            Ok(pool) => {
                info!(file = %path.display(), "connected to SQLite");
                Backend::Sql(pool)
            }
            Err(e) => {
                error!(error = %e, file = %path.display(), "failed to connect to SQLite");
                Backend::Unavailable
            }
        }
    }

    async fn connect_mongodb(settings: &Settings) -> Backend {
        let mongo = &settings.database.mongodb;

        let client = match mongodb::Client::with_uri_str(&mongo.uri).await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "failed to connect to MongoDB");
                return Backend::Unavailable;
            }
        };

        let database = client.database(&mongo.database);
        match database
            .run_command(mongodb::bson::doc! { "ping": 1 }, None)
            .await
        {
            Ok(_) => {
                info!(database = %mongo.database, "connected to MongoDB");
                Backend::Document(Mutex::new(Some(database)))
            }
            Err(e) => {
                error!(error = %e, "MongoDB ping failed");
                Backend::Unavailable
            }
        }
    }

    /// Backend kind selected at startup; immutable for the process.
    pub fn kind(&self) -> DatabaseKind {
        self.inner.kind
    }

    /// True while the backend is established and not closed.
    pub fn is_connected(&self) -> bool {
        if self.inner.closed.load(Ordering::SeqCst) {
            return false;
        }
        match &self.inner.backend {
            Backend::Sql(pool) => !pool.is_closed(),
            Backend::Document(slot) => slot.lock().expect("backend slot poisoned").is_some(),
            Backend::Unavailable => false,
        }
    }

    /// Borrow a pooled relational connection.
    ///
    /// Always fails with [`DbError::UnsupportedForBackend`] on the document
    /// kind - even when the document client is down, since the misuse
    /// exists regardless of backend health. Pool exhaustion past the
    /// acquisition timeout surfaces as [`DbError::ConnectionUnavailable`].
    pub async fn acquire(&self) -> Result<PoolConnection<Any>, DbError> {
        let pool = self.sql_pool("acquire")?;
        pool.acquire()
            .await
            .map_err(|e| DbError::ConnectionUnavailable(e.to_string()))
    }

    /// The relational pool itself, for transaction-scoped work (as the
    /// migration engine does) and the statement executor.
    ///
    /// `operation` names the caller in the misuse error so a document-kind
    /// deployment logs which operation went to the wrong backend.
    pub fn sql_pool(&self, operation: &'static str) -> Result<&AnyPool, DbError> {
        if self.inner.kind.is_document() {
            return Err(DbError::UnsupportedForBackend {
                operation,
                kind: self.inner.kind,
            });
        }
        match &self.inner.backend {
            Backend::Sql(pool) if self.is_connected() => Ok(pool),
            _ => Err(DbError::ConnectionUnavailable(
                "database is not connected".into(),
            )),
        }
    }

    /// A clone of the shared MongoDB database handle (cloning is cheap,
    /// the driver shares one client underneath).
    pub fn document_handle(&self) -> Result<mongodb::Database, DbError> {
        if self.inner.kind.is_relational() {
            return Err(DbError::UnsupportedForBackend {
                operation: "document_handle",
                kind: self.inner.kind,
            });
        }
        match &self.inner.backend {
            Backend::Document(slot) => slot
                .lock()
                .expect("backend slot poisoned")
                .clone()
                .ok_or_else(|| {
                    DbError::ConnectionUnavailable("database is not connected".into())
                }),
            _ => Err(DbError::ConnectionUnavailable(
                "database is not connected".into(),
            )),
        }
    }

    /// Pool accounting for the relational kinds; `None` otherwise.
    pub fn statistics(&self) -> Option<PoolStatistics> {
        match &self.inner.backend {
            Backend::Sql(pool) => Some(PoolStatistics {
                connections: pool.size(),
                idle_connections: pool.num_idle(),
                max_connections: pool.options().get_max_connections(),
            }),
            _ => None,
        }
    }

    /// Close the pool or drop the client. Idempotent; subsequent
    /// `acquire`/`document_handle` calls fail with `ConnectionUnavailable`.
    ///
    /// The Mongo driver has no explicit disconnect; taking the handle out
    /// of its slot drops our last clone, and the client winds down once
    /// handles given out earlier go out of scope too.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        match &self.inner.backend {
            Backend::Sql(pool) => pool.close().await,
            Backend::Document(slot) => {
                slot.lock().expect("backend slot poisoned").take();
            }
            Backend::Unavailable => {}
        }
        info!("database connection closed");
    }
}

impl fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("kind", &self.inner.kind)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Connection pool statistics
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Total number of connections in the pool
    pub connections: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Maximum allowed connections
    pub max_connections: u32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool Stats: {}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_statistics_display() {
        let stats = PoolStatistics {
            connections: 5,
            idle_connections: 3,
            max_connections: 10,
        };

        let display = format!("{}", stats);
        assert!(display.contains("5/10"));
        assert!(display.contains("3 idle"));
    }
}
