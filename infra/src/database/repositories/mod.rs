//! SQL implementations of the core repository ports.
//!
//! Each repository composes a [`crate::database::StatementExecutor`] and
//! the dialect table; faults are contained by the executor beneath, so the
//! port's sentinel-result contract holds without any handling here.

pub mod cooldown_repository_impl;
pub mod player_repository_impl;

pub use cooldown_repository_impl::SqlCooldownRepository;
pub use player_repository_impl::SqlPlayerRepository;
