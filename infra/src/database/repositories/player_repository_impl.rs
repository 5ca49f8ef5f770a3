//! SQL implementation of the player repository port.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::error;
use uuid::Uuid;

use hexvg_core::domain::PlayerProfile;
use hexvg_core::repositories::PlayerRepository;

use crate::database::dialect::{dialect_for, SqlDialect};
use crate::database::executor::StatementExecutor;
use crate::params;

/// Timestamps cross the wire as text valid for both MySQL DATETIME and
/// SQLite TEXT columns.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub struct SqlPlayerRepository {
    executor: StatementExecutor,
    /// `None` when the provider targets a document backend; writes that
    /// need dialect SQL then fail as contained, logged no-ops.
    dialect: Option<&'static SqlDialect>,
}

impl SqlPlayerRepository {
    pub fn new(executor: StatementExecutor) -> Self {
        let kind = executor.database().kind();
        let dialect = kind.is_relational().then(|| dialect_for(kind));
        Self { executor, dialect }
    }

    fn map_row(row: &AnyRow) -> Option<PlayerProfile> {
        let uuid: String = row.try_get("uuid").ok()?;
        let uuid = Uuid::parse_str(&uuid).ok()?;
        let name: String = row.try_get("name").ok()?;
        let first_join: String = row.try_get("first_join").ok()?;
        let last_join: String = row.try_get("last_join").ok()?;

        Some(PlayerProfile::from_stored(
            uuid,
            name,
            parse_timestamp(&first_join)?,
            parse_timestamp(&last_join)?,
        ))
    }
}

#[async_trait]
impl PlayerRepository for SqlPlayerRepository {
    async fn save(&self, profile: &PlayerProfile) -> bool {
        let Some(dialect) = self.dialect else {
            error!("player repository needs a relational backend");
            return false;
        };

        let affected = self
            .executor
            .execute(
                dialect.player_upsert,
                &params![
                    profile.uuid,
                    profile.name.clone(),
                    format_timestamp(profile.first_join),
                    format_timestamp(profile.last_join)
                ],
            )
            .await;
        affected >= 0
    }

    async fn load(&self, uuid: Uuid) -> Option<PlayerProfile> {
        self.executor
            .query_one(
                "SELECT uuid, name, first_join, last_join FROM hexvg_players WHERE uuid = ?",
                &params![uuid],
                Self::map_row,
            )
            .await
    }

    async fn player_exists(&self, uuid: Uuid) -> bool {
        self.executor
            .exists(
                "SELECT 1 FROM hexvg_players WHERE uuid = ?",
                &params![uuid],
            )
            .await
    }

    fn update_name(&self, uuid: Uuid, name: &str) {
        self.executor.execute_async(
            "UPDATE hexvg_players SET name = ? WHERE uuid = ?",
            params![name, uuid],
        );
    }

    fn touch_last_join(&self, uuid: Uuid) {
        self.executor.execute_async(
            "UPDATE hexvg_players SET last_join = ? WHERE uuid = ?",
            params![format_timestamp(Utc::now()), uuid],
        );
    }

    fn delete(&self, uuid: Uuid) {
        self.executor.execute_async(
            "DELETE FROM hexvg_players WHERE uuid = ?",
            params![uuid],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_roundtrip_through_wire_format() {
        let now = Utc::now();
        let parsed = parse_timestamp(&format_timestamp(now)).unwrap();
        // Sub-second precision is not carried
        assert_eq!(parsed.timestamp(), now.timestamp());
    }

    #[test]
    fn malformed_timestamp_maps_to_none() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2024-13-40 99:99:99").is_none());
    }
}
