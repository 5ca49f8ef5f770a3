//! SQL implementation of the persistent cooldown port.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::error;
use uuid::Uuid;

use hexvg_core::repositories::CooldownRepository;

use crate::database::dialect::{dialect_for, SqlDialect};
use crate::database::executor::StatementExecutor;
use crate::params;

pub struct SqlCooldownRepository {
    executor: StatementExecutor,
    dialect: Option<&'static SqlDialect>,
}

impl SqlCooldownRepository {
    pub fn new(executor: StatementExecutor) -> Self {
        let kind = executor.database().kind();
        let dialect = kind.is_relational().then(|| dialect_for(kind));
        Self { executor, dialect }
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[async_trait]
impl CooldownRepository for SqlCooldownRepository {
    async fn set(&self, uuid: Uuid, key: &str, expires_at_ms: i64) -> bool {
        let Some(dialect) = self.dialect else {
            error!("cooldown repository needs a relational backend");
            return false;
        };

        let affected = self
            .executor
            .execute(
                dialect.cooldown_upsert,
                &params![uuid, key, expires_at_ms],
            )
            .await;
        affected >= 0
    }

    async fn remaining_ms(&self, uuid: Uuid, key: &str) -> i64 {
        let expires_at = self
            .executor
            .query_one(
                "SELECT expires_at FROM hexvg_cooldowns WHERE uuid = ? AND cd_key = ?",
                &params![uuid, key],
                |row| row.try_get::<i64, _>("expires_at").ok(),
            )
            .await;

        match expires_at {
            Some(expires_at) => (expires_at - Self::now_ms()).max(0),
            None => 0,
        }
    }

    async fn is_active(&self, uuid: Uuid, key: &str) -> bool {
        self.executor
            .exists(
                "SELECT 1 FROM hexvg_cooldowns WHERE uuid = ? AND cd_key = ? AND expires_at > ?",
                &params![uuid, key, Self::now_ms()],
            )
            .await
    }

    fn clear(&self, uuid: Uuid, key: &str) {
        self.executor.execute_async(
            "DELETE FROM hexvg_cooldowns WHERE uuid = ? AND cd_key = ?",
            params![uuid, key],
        );
    }

    async fn purge_expired(&self) -> i64 {
        self.executor
            .execute(
                "DELETE FROM hexvg_cooldowns WHERE expires_at <= ?",
                &params![Self::now_ms()],
            )
            .await
    }
}
