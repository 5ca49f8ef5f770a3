//! Configuration for the HexVG foundation layer.
//!
//! Dependent modules consume these types through [`Settings::load`]; the
//! database section mirrors the options recognized by the connection
//! provider in `hexvg_infra`.

pub mod database;
pub mod settings;

pub use database::{
    DatabaseKind, DatabaseSettings, MongoSettings, MySqlSettings, PoolSettings, SqliteSettings,
};
pub use settings::{LoggingSettings, Settings};
