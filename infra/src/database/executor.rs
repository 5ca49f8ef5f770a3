//! Statement executor - the repository base.
//!
//! Turns a parametrized SQL template plus positional values into mapped
//! rows, a single optional row, an affected-row count or an existence
//! check. Repositories hold a clone of the executor and delegate to it;
//! there is no inheritance hierarchy to extend.
//!
//! ## Fault containment
//! Every operation here deliberately swallows statement-level faults:
//! the failure is logged and the caller receives a benign sentinel
//! (empty vec, `None`, `-1`, `false`). The calling code runs on a
//! latency-sensitive game loop where an unhandled persistence error must
//! degrade a feature, not interrupt gameplay. Tests verify this
//! containment rather than fight it.

use sqlx::any::AnyRow;
use sqlx::Any;
use tracing::error;
use uuid::Uuid;

use crate::database::connection::DatabaseManager;
use crate::database::dispatcher::WriteDispatcher;

/// Positional SQL parameter value.
///
/// A closed set keeps binding uniform across the relational backends; the
/// [`crate::params!`] macro builds a `Vec<SqlValue>` from mixed literals.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value as i64)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(value as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        SqlValue::Text(value.to_string())
    }
}

/// Build a `Vec<SqlValue>` from mixed values, e.g.
/// `params![uuid, "Steve", 42_i64]`.
#[macro_export]
macro_rules! params {
    () => { Vec::<$crate::database::executor::SqlValue>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::database::executor::SqlValue::from($value)),+]
    };
}

fn bind_values<'q>(
    sql: &'q str,
    params: &[SqlValue],
) -> sqlx::query::Query<'q, Any, sqlx::any::AnyArguments<'q>> {
    let mut query = sqlx::query::<Any>(sql);
    for value in params {
        query = match value {
            SqlValue::Text(text) => query.bind(text.clone()),
            SqlValue::Int(int) => query.bind(*int),
            SqlValue::Float(float) => query.bind(*float),
            SqlValue::Bool(boolean) => query.bind(*boolean),
            SqlValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

/// Generic query/update execution over the connection provider.
///
/// Relational-only: document-store access is module-specific code against
/// [`DatabaseManager::document_handle`] and outside this contract.
#[derive(Clone, Debug)]
pub struct StatementExecutor {
    db: DatabaseManager,
    dispatcher: WriteDispatcher,
}

impl StatementExecutor {
    pub fn new(db: DatabaseManager) -> Self {
        Self::with_dispatcher(db, WriteDispatcher::new())
    }

    /// Share a dispatcher between executors so one `drain` covers them all.
    pub fn with_dispatcher(db: DatabaseManager, dispatcher: WriteDispatcher) -> Self {
        Self { db, dispatcher }
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn dispatcher(&self) -> &WriteDispatcher {
        &self.dispatcher
    }

    /// Run a query and map every row; rows the mapper rejects are skipped.
    ///
    /// Faults - including an unavailable backend - yield an empty vec and
    /// a logged error, nothing more.
    pub async fn query_many<T, F>(&self, sql: &str, params: &[SqlValue], mapper: F) -> Vec<T>
    where
        F: Fn(&AnyRow) -> Option<T>,
    {
        let pool = match self.db.sql_pool("query_many") {
            Ok(pool) => pool,
            Err(e) => {
                error!(error = %e, sql, "query failed");
                return Vec::new();
            }
        };

        match bind_values(sql, params).fetch_all(pool).await {
            Ok(rows) => rows.iter().filter_map(|row| mapper(row)).collect(),
            Err(e) => {
                error!(error = %e, sql, "query failed");
                Vec::new()
            }
        }
    }

    /// Run a query expecting at most one row.
    ///
    /// `None` covers both "no row" and "fault" - callers cannot tell them
    /// apart, by design.
    pub async fn query_one<T, F>(&self, sql: &str, params: &[SqlValue], mapper: F) -> Option<T>
    where
        F: Fn(&AnyRow) -> Option<T>,
    {
        let pool = match self.db.sql_pool("query_one") {
            Ok(pool) => pool,
            Err(e) => {
                error!(error = %e, sql, "query failed");
                return None;
            }
        };

        match bind_values(sql, params).fetch_optional(pool).await {
            Ok(row) => row.as_ref().and_then(mapper),
            Err(e) => {
                error!(error = %e, sql, "query failed");
                None
            }
        }
    }

    /// Run an UPDATE/INSERT/DELETE.
    ///
    /// Returns the affected-row count, or `-1` on failure - callers must
    /// treat `-1` as "did not happen", never as a row count.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> i64 {
        let pool = match self.db.sql_pool("execute") {
            Ok(pool) => pool,
            Err(e) => {
                error!(error = %e, sql, "statement failed");
                return -1;
            }
        };

        match bind_values(sql, params).execute(pool).await {
            Ok(result) => result.rows_affected() as i64,
            Err(e) => {
                error!(error = %e, sql, "statement failed");
                -1
            }
        }
    }

    /// Dispatch an UPDATE/INSERT/DELETE to a background worker.
    ///
    /// Fire-and-forget: neither the result nor a failure is observable by
    /// the caller, and ordering between two dispatched statements is not
    /// guaranteed. For hot-path writes that must not block the game loop.
    pub fn execute_async(&self, sql: &str, params: Vec<SqlValue>) {
        let executor = self.clone();
        let sql = sql.to_string();
        self.dispatcher.dispatch(async move {
            executor.execute(&sql, &params).await;
        });
    }

    /// True iff the query yields at least one row; false on fault.
    pub async fn exists(&self, sql: &str, params: &[SqlValue]) -> bool {
        let pool = match self.db.sql_pool("exists") {
            Ok(pool) => pool,
            Err(e) => {
                error!(error = %e, sql, "existence check failed");
                return false;
            }
        };

        match bind_values(sql, params).fetch_optional(pool).await {
            Ok(row) => row.is_some(),
            Err(e) => {
                error!(error = %e, sql, "existence check failed");
                false
            }
        }
    }

    /// Thin alias over [`StatementExecutor::execute`] for DDL.
    pub async fn create_table_if_not_exists(&self, ddl: &str) -> bool {
        self.execute(ddl, &[]).await >= 0
    }
}
