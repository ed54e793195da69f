// src/infra/paths.rs — Config and data path management
//
// All paths respect the MOCKPREP_HOME environment variable for isolation.
// When MOCKPREP_HOME is set, config and data live under that directory.
// When unset, config uses ~/.mockprep/ and data uses XDG_DATA_HOME/mockprep.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the MOCKPREP_HOME override, if set.
fn mockprep_home() -> Option<PathBuf> {
    std::env::var_os("MOCKPREP_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when no home can be determined.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $MOCKPREP_HOME/ or ~/.mockprep/
pub fn config_dir() -> PathBuf {
    if let Some(home) = mockprep_home() {
        return home;
    }
    dirs_home().join(".mockprep")
}

/// Data directory: $MOCKPREP_HOME/data/ or ~/.local/share/mockprep/
pub fn data_dir() -> PathBuf {
    if let Some(home) = mockprep_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "mockprep")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Session store (SQLite key-value database)
pub fn db_path() -> PathBuf {
    data_dir().join("mockprep.db")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default location for exported result reports
pub fn default_export_path() -> PathBuf {
    PathBuf::from("interview-results.json")
}

/// Ensure config and data directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    for dir in [config_dir(), data_dir()] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}
