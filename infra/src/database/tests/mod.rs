//! Unit tests for the database module that need a live (embedded) backend.


use std::path::PathBuf;
use uuid::Uuid;

use hexvg_shared::config::Settings;

/// Settings pointing at a fresh SQLite file under the system temp dir.
pub(crate) fn fresh_sqlite_settings() -> Settings {
    let mut settings = Settings::default();
    settings.data_dir = std::env::temp_dir().join("hexvg-infra-tests");
    settings.database.kind = "SQLITE".into();
    settings.database.sqlite.file = PathBuf::from(format!("{}.db", Uuid::new_v4()));
    settings
}
