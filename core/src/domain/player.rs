//! Central player profile shared by all HexVG modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-player profile common to every module.
///
/// Dependent modules attach their own data through the namespaced
/// custom-data map; the key convention is `"ModuleName:key"`, e.g.
/// `"HexShop:balance"`, so one module can be wiped without touching
/// another's entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub uuid: Uuid,
    pub name: String,
    pub first_join: DateTime<Utc>,
    pub last_join: DateTime<Utc>,

    #[serde(default)]
    custom: HashMap<String, Value>,
}

impl PlayerProfile {
    /// Fresh profile for a player seen for the first time.
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            uuid,
            name: name.into(),
            first_join: now,
            last_join: now,
            custom: HashMap::new(),
        }
    }

    /// Profile rebuilt from persisted columns.
    pub fn from_stored(
        uuid: Uuid,
        name: impl Into<String>,
        first_join: DateTime<Utc>,
        last_join: DateTime<Utc>,
    ) -> Self {
        Self {
            uuid,
            name: name.into(),
            first_join,
            last_join,
            custom: HashMap::new(),
        }
    }

    // ---- Custom data API for dependent modules ----

    /// Store a value under `"Module:key"`.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.custom.insert(key.into(), value);
    }

    /// Fetch a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.custom.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.custom.remove(key)
    }

    /// Drop every entry owned by one module.
    pub fn remove_module(&mut self, module: &str) {
        let prefix = format!("{module}:");
        self.custom.retain(|key, _| !key.starts_with(&prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_profile_has_matching_join_timestamps() {
        let profile = PlayerProfile::new(Uuid::new_v4(), "Steve");
        assert_eq!(profile.first_join, profile.last_join);
        assert_eq!(profile.name, "Steve");
    }

    #[test]
    fn custom_data_roundtrip() {
        let mut profile = PlayerProfile::new(Uuid::new_v4(), "Alex");
        profile.set("HexShop:balance", json!(250));

        assert!(profile.has("HexShop:balance"));
        assert_eq!(profile.get("HexShop:balance"), Some(&json!(250)));
        assert_eq!(profile.remove("HexShop:balance"), Some(json!(250)));
        assert!(!profile.has("HexShop:balance"));
    }

    #[test]
    fn remove_module_only_touches_its_prefix() {
        let mut profile = PlayerProfile::new(Uuid::new_v4(), "Alex");
        profile.set("HexShop:balance", json!(10));
        profile.set("HexShop:vip", json!(true));
        profile.set("HexArena:kills", json!(3));

        profile.remove_module("HexShop");

        assert!(!profile.has("HexShop:balance"));
        assert!(!profile.has("HexShop:vip"));
        assert!(profile.has("HexArena:kills"));
    }
}
