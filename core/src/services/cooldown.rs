//! In-memory cooldown tracking.
//!
//! Cooldowns here reset on restart; modules that need persistence go
//! through [`crate::repositories::CooldownRepository`] instead.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Shared cooldown map keyed by `(player, cooldown key)`.
///
/// Key convention for the cooldown name: a module-scoped string such as
/// `"daily-reward"` or `"kit-starter"`.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    cooldowns: Mutex<HashMap<(Uuid, String), Instant>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown of `duration` for the player.
    pub fn set(&self, uuid: Uuid, key: &str, duration: Duration) {
        let mut map = self.cooldowns.lock().expect("cooldown map poisoned");
        map.insert((uuid, key.to_string()), Instant::now() + duration);
    }

    /// True while the cooldown is running. Expired entries are removed on
    /// the way out.
    pub fn is_active(&self, uuid: Uuid, key: &str) -> bool {
        let mut map = self.cooldowns.lock().expect("cooldown map poisoned");
        let entry = (uuid, key.to_string());
        match map.get(&entry) {
            Some(expiry) if *expiry > Instant::now() => true,
            Some(_) => {
                map.remove(&entry);
                false
            }
            None => false,
        }
    }

    /// Remaining time, `Duration::ZERO` when absent or expired.
    pub fn remaining(&self, uuid: Uuid, key: &str) -> Duration {
        let map = self.cooldowns.lock().expect("cooldown map poisoned");
        map.get(&(uuid, key.to_string()))
            .map(|expiry| expiry.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    pub fn remove(&self, uuid: Uuid, key: &str) {
        let mut map = self.cooldowns.lock().expect("cooldown map poisoned");
        map.remove(&(uuid, key.to_string()));
    }

    /// Drop every cooldown of one player (e.g. on disconnect).
    pub fn remove_all(&self, uuid: Uuid) {
        let mut map = self.cooldowns.lock().expect("cooldown map poisoned");
        map.retain(|(owner, _), _| *owner != uuid);
    }

    /// Sweep expired entries; call periodically from a scheduler.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut map = self.cooldowns.lock().expect("cooldown map poisoned");
        map.retain(|_, expiry| *expiry > now);
    }

    /// Number of tracked cooldowns, expired ones included until `cleanup`.
    pub fn len(&self) -> usize {
        self.cooldowns.lock().expect("cooldown map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
