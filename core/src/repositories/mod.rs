//! Repository ports implemented by the infrastructure layer.
//!
//! The ports deliberately return sentinel values (`Option`, `bool`, counts)
//! instead of `Result`: statement-level faults are contained and logged by
//! the executor beneath them, so callers on the game loop never have to
//! handle a persistence error inline. See `hexvg_core::errors::DbError`
//! for the policy.

pub mod cooldown_repository;
pub mod player_repository;

pub use cooldown_repository::CooldownRepository;
pub use player_repository::PlayerRepository;
