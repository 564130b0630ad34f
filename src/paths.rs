// Filesystem locations.
// Per-user config and cache directories, plus files inside the data directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const APP_NAME: &str = "datekit";

/// Get the per-user config directory (~/.config/datekit on Linux).
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the credentials file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(".env"))
}

/// Get the default cache directory (~/.cache/datekit on Linux).
/// Falls back to the system temp dir when no home directory is known.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
}

/// Path to a cache entry.
pub fn cache_entry_path(cache_dir: &Path, key: &str) -> PathBuf {
    cache_dir.join(format!("{}.json", sanitize_name(key)))
}

/// Path to the venue registry.
pub fn venues_path(data_dir: &Path) -> PathBuf {
    data_dir.join("venues.json")
}

/// Path to the preferences file.
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join("preferences.json")
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}
