//! Session cache of player profiles.
//!
//! Profiles are loaded once per session and mutated in memory; writes go
//! back through the repository on unload/shutdown. The cache holds plain
//! values - callers receive clones and mutate through [`PlayerCache::update`]
//! so the lock is never held across an await point.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::PlayerProfile;
use crate::repositories::PlayerRepository;

pub struct PlayerCache {
    repository: Arc<dyn PlayerRepository>,
    profiles: RwLock<HashMap<Uuid, PlayerProfile>>,
}

impl PlayerCache {
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self {
            repository,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the profile from the database, creating a fresh one for
    /// first-time players, and cache it for the session. Returns a clone.
    pub async fn load_or_create(&self, uuid: Uuid, name: &str) -> PlayerProfile {
        if let Some(profile) = self.get(uuid) {
            return profile;
        }

        let mut profile = match self.repository.load(uuid).await {
            Some(stored) => stored,
            None => {
                debug!(player = %name, "creating fresh profile");
                let profile = PlayerProfile::new(uuid, name);
                self.repository.save(&profile).await;
                profile
            }
        };

        // Name changes between sessions are picked up here
        if profile.name != name {
            profile.name = name.to_string();
            self.repository.update_name(uuid, name);
        }

        self.profiles
            .write()
            .expect("profile cache poisoned")
            .insert(uuid, profile.clone());
        debug!(player = %name, "profile cached");
        profile
    }

    /// Cached profile, if the player's session is loaded. Returns a clone.
    pub fn get(&self, uuid: Uuid) -> Option<PlayerProfile> {
        self.profiles
            .read()
            .expect("profile cache poisoned")
            .get(&uuid)
            .cloned()
    }

    pub fn is_loaded(&self, uuid: Uuid) -> bool {
        self.profiles
            .read()
            .expect("profile cache poisoned")
            .contains_key(&uuid)
    }

    /// Mutate the cached profile in place; no-op when not loaded.
    /// Returns `true` when the profile was present.
    pub fn update<F>(&self, uuid: Uuid, mutate: F) -> bool
    where
        F: FnOnce(&mut PlayerProfile),
    {
        let mut profiles = self.profiles.write().expect("profile cache poisoned");
        match profiles.get_mut(&uuid) {
            Some(profile) => {
                mutate(profile);
                true
            }
            None => false,
        }
    }

    /// Persist and evict one player (session end).
    pub async fn unload(&self, uuid: Uuid) {
        let profile = self
            .profiles
            .write()
            .expect("profile cache poisoned")
            .remove(&uuid);

        if let Some(profile) = profile {
            self.repository.save(&profile).await;
            debug!(player = %profile.name, "profile saved and evicted");
        }
    }

    /// Persist every cached profile (shutdown path); the cache stays
    /// populated.
    pub async fn save_all(&self) {
        let snapshot: Vec<PlayerProfile> = {
            let profiles = self.profiles.read().expect("profile cache poisoned");
            profiles.values().cloned().collect()
        };

        info!(count = snapshot.len(), "saving cached player profiles");
        for profile in &snapshot {
            self.repository.save(profile).await;
        }
    }

    pub fn cached(&self) -> usize {
        self.profiles.read().expect("profile cache poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Repository double recording calls; `load` serves from a seeded map.
    #[derive(Default)]
    struct RecordingRepository {
        stored: Mutex<HashMap<Uuid, PlayerProfile>>,
        saves: Mutex<Vec<Uuid>>,
        renames: Mutex<Vec<(Uuid, String)>>,
    }

    #[async_trait]
    impl PlayerRepository for RecordingRepository {
        async fn save(&self, profile: &PlayerProfile) -> bool {
            self.saves.lock().unwrap().push(profile.uuid);
            self.stored
                .lock()
                .unwrap()
                .insert(profile.uuid, profile.clone());
            true
        }

        async fn load(&self, uuid: Uuid) -> Option<PlayerProfile> {
            self.stored.lock().unwrap().get(&uuid).cloned()
        }

        async fn player_exists(&self, uuid: Uuid) -> bool {
            self.stored.lock().unwrap().contains_key(&uuid)
        }

        fn update_name(&self, uuid: Uuid, name: &str) {
            self.renames.lock().unwrap().push((uuid, name.to_string()));
        }

        fn touch_last_join(&self, _uuid: Uuid) {}

        fn delete(&self, uuid: Uuid) {
            self.stored.lock().unwrap().remove(&uuid);
        }
    }

    #[tokio::test]
    async fn first_load_creates_and_persists_a_profile() {
        let repo = Arc::new(RecordingRepository::default());
        let cache = PlayerCache::new(repo.clone());
        let uuid = Uuid::new_v4();

        let profile = cache.load_or_create(uuid, "Steve").await;

        assert_eq!(profile.name, "Steve");
        assert!(cache.is_loaded(uuid));
        assert_eq!(repo.saves.lock().unwrap().as_slice(), &[uuid]);
    }

    #[tokio::test]
    async fn second_load_hits_the_cache() {
        let repo = Arc::new(RecordingRepository::default());
        let cache = PlayerCache::new(repo.clone());
        let uuid = Uuid::new_v4();

        cache.load_or_create(uuid, "Steve").await;
        cache.load_or_create(uuid, "Steve").await;

        assert_eq!(repo.saves.lock().unwrap().len(), 1);
        assert_eq!(cache.cached(), 1);
    }

    #[tokio::test]
    async fn rename_between_sessions_is_propagated() {
        let repo = Arc::new(RecordingRepository::default());
        let uuid = Uuid::new_v4();
        repo.stored
            .lock()
            .unwrap()
            .insert(uuid, PlayerProfile::new(uuid, "OldName"));

        let cache = PlayerCache::new(repo.clone());
        let profile = cache.load_or_create(uuid, "NewName").await;

        assert_eq!(profile.name, "NewName");
        assert_eq!(
            repo.renames.lock().unwrap().as_slice(),
            &[(uuid, "NewName".to_string())]
        );
    }

    #[tokio::test]
    async fn unload_saves_then_evicts() {
        let repo = Arc::new(RecordingRepository::default());
        let cache = PlayerCache::new(repo.clone());
        let uuid = Uuid::new_v4();

        cache.load_or_create(uuid, "Steve").await;
        cache.update(uuid, |p| p.set("HexShop:balance", serde_json::json!(5)));
        cache.unload(uuid).await;

        assert!(!cache.is_loaded(uuid));
        assert_eq!(repo.saves.lock().unwrap().len(), 2);
        let stored = repo.stored.lock().unwrap();
        assert!(stored.get(&uuid).unwrap().has("HexShop:balance"));
    }

    #[tokio::test]
    async fn save_all_keeps_the_cache_populated() {
        let repo = Arc::new(RecordingRepository::default());
        let cache = PlayerCache::new(repo.clone());

        cache.load_or_create(Uuid::new_v4(), "A").await;
        cache.load_or_create(Uuid::new_v4(), "B").await;
        cache.save_all().await;

        assert_eq!(cache.cached(), 2);
        // two creation saves + two save_all saves
        assert_eq!(repo.saves.lock().unwrap().len(), 4);
    }
}
