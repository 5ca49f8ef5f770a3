//! Persistent cooldown port.
//!
//! Backs cooldowns that must survive a restart (the in-memory
//! [`crate::services::CooldownTracker`] covers the rest). Rows live in
//! `hexvg_cooldowns`, keyed by `(player uuid, cooldown key)` with an
//! absolute expiry in epoch milliseconds.

use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CooldownRepository: Send + Sync {
    /// Upsert the expiry for `(uuid, key)`. Returns `false` when the write
    /// failed (already logged).
    async fn set(&self, uuid: Uuid, key: &str, expires_at_ms: i64) -> bool;

    /// Remaining time in milliseconds; `0` when absent, expired, or on a
    /// contained fault.
    async fn remaining_ms(&self, uuid: Uuid, key: &str) -> i64;

    /// True iff an unexpired cooldown row exists.
    async fn is_active(&self, uuid: Uuid, key: &str) -> bool;

    /// Fire-and-forget removal of one cooldown.
    fn clear(&self, uuid: Uuid, key: &str);

    /// Delete every expired row; returns the number removed, `-1` on a
    /// contained fault.
    async fn purge_expired(&self) -> i64;
}
