//! Domain entities shared across HexVG modules.

pub mod player;

pub use player::PlayerProfile;
