//! # HexVG Core
//!
//! Domain layer of the HexVG foundation. This crate contains the error
//! taxonomy, the player profile entity, the repository ports implemented by
//! `hexvg_infra`, and the thin in-memory services (cooldown tracker, player
//! profile cache) that dependent game-server modules share.
//!
//! No database driver types appear here; infrastructure errors cross the
//! boundary already stringified.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::PlayerProfile;
pub use errors::DbError;
pub use repositories::{CooldownRepository, PlayerRepository};
pub use services::{CooldownTracker, PlayerCache};
