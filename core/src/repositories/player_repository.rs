//! Player repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::PlayerProfile;

/// Persistence contract for player profiles.
///
/// Awaited operations run to completion before returning; the `fn` (non
/// `async`) operations are fire-and-forget hot-path writes dispatched to a
/// background worker - their outcome is observable only through logs, and
/// ordering between two dispatched writes is not guaranteed.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert or update the profile row. Returns `false` when the write
    /// failed (already logged).
    async fn save(&self, profile: &PlayerProfile) -> bool;

    /// Load a profile by player id; `None` when absent or on a contained
    /// fault.
    async fn load(&self, uuid: Uuid) -> Option<PlayerProfile>;

    /// True iff a row for the player exists.
    async fn player_exists(&self, uuid: Uuid) -> bool;

    /// Fire-and-forget rename.
    fn update_name(&self, uuid: Uuid, name: &str);

    /// Fire-and-forget bump of the last-join timestamp to now.
    fn touch_last_join(&self, uuid: Uuid);

    /// Fire-and-forget row removal.
    fn delete(&self, uuid: Uuid);
}
