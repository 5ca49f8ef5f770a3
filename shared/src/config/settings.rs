//! Top-level settings loading.
//!
//! Layering order (later wins): built-in defaults, optional config file,
//! `HEXVG_`-prefixed environment variables. A `.env` file is honored if
//! present so local setups do not need exported variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::database::DatabaseSettings;

/// Logging section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Emit debug-level diagnostics
    pub debug: bool,
}

/// Root configuration for a HexVG module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Module-private data directory (embedded database files live here)
    pub data_dir: PathBuf,

    pub database: DatabaseSettings,

    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database: DatabaseSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// `path` names a config file without extension (`config` crate
    /// convention, e.g. `"config/hexvg"` picks up `config/hexvg.toml`).
    /// A missing file is not an error; the defaults cover every option.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("HEXVG")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Absolute-ish path of the embedded database file.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(&self.database.sqlite.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_contained() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert!(!settings.logging.debug);
        assert_eq!(settings.database.kind, "SQLITE");
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let settings = Settings::load(None).expect("defaults should always deserialize");
        assert_eq!(settings.database.kind, "SQLITE");
    }

    #[test]
    fn sqlite_path_joins_data_dir() {
        let settings = Settings::default();
        assert_eq!(settings.sqlite_path(), PathBuf::from("data/hexvg.db"));
    }
}
