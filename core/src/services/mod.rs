//! In-memory services shared by dependent modules.

pub mod cooldown;
pub mod player_cache;

pub use cooldown::CooldownTracker;
pub use player_cache::PlayerCache;
