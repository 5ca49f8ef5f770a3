//! # HexVG Shared
//!
//! Configuration types and logging bootstrap shared by every HexVG module.
//! This crate performs no I/O beyond reading configuration files and
//! environment variables; the heavy lifting lives in `hexvg_infra`.

pub mod config;
pub mod logging;

// Re-export commonly used types for convenience
pub use config::{DatabaseKind, DatabaseSettings, Settings};
