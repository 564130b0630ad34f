// Configuration loading.
// Reads KEY=value lines from the per-user .env file and overlays environment variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths;

pub const TICKETMASTER_API_KEY: &str = "TICKETMASTER_API_KEY";
pub const GOOGLE_PLACES_API_KEY: &str = "GOOGLE_PLACES_API_KEY";
pub const DATA_DIR_VAR: &str = "DATEKIT_DATA_DIR";
pub const CACHE_DIR_VAR: &str = "DATEKIT_CACHE_DIR";

/// Settings that may come from the environment even when absent from the file.
const KNOWN_KEYS: [&str; 4] = [
    TICKETMASTER_API_KEY,
    GOOGLE_PLACES_API_KEY,
    DATA_DIR_VAR,
    CACHE_DIR_VAR,
];

/// Data directory used when nothing is configured.
const DEFAULT_DATA_DIR: &str = "data";

/// Parse the contents of a KEY=value file.
///
/// Blank lines and `#` comments are skipped. Values wrapped in matching
/// single or double quotes are unquoted. Entries with an empty key or value
/// are dropped.
pub fn parse_env_file(contents: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let value = strip_quotes(value.trim());
        if !key.is_empty() && !value.is_empty() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    values
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Read a KEY=value file. A missing file yields no entries.
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)?;
    Ok(parse_env_file(&contents))
}

/// Resolved configuration. Environment beats file beats default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, String>,
    file: Option<PathBuf>,
}

impl Config {
    /// Load from the per-user .env file and the process environment.
    pub fn load() -> Result<Self> {
        let file = paths::config_file();
        let file_values = match &file {
            Some(path) => load_env_file(path)?,
            None => BTreeMap::new(),
        };

        let mut config = Self::from_sources(file_values, |key| std::env::var(key).ok());
        config.file = file;
        Ok(config)
    }

    /// Merge file values with an environment lookup.
    /// Empty environment values count as unset.
    pub fn from_sources<F>(file_values: BTreeMap<String, String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = file_values;
        let keys: Vec<String> = KNOWN_KEYS
            .iter()
            .map(|key| key.to_string())
            .chain(values.keys().cloned())
            .collect();

        for key in keys {
            if let Some(value) = env(&key).filter(|value| !value.is_empty()) {
                values.insert(key, value);
            }
        }

        Self { values, file: None }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn ticketmaster_key(&self) -> Option<&str> {
        self.get(TICKETMASTER_API_KEY)
    }

    pub fn google_places_key(&self) -> Option<&str> {
        self.get(GOOGLE_PLACES_API_KEY)
    }

    /// The credentials file this config was read from, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.get(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.get(CACHE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(paths::default_cache_dir)
    }

    /// Data sources usable with the current credentials.
    /// Web search needs no key and is always listed first.
    pub fn available_sources(&self) -> Vec<&'static str> {
        let mut sources = vec!["websearch"];
        if self.ticketmaster_key().is_some() {
            sources.push("ticketmaster");
        }
        if self.google_places_key().is_some() {
            sources.push("google_places");
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_env_file() {
        let contents = r#"
# credentials
TICKETMASTER_API_KEY=abc123

GOOGLE_PLACES_API_KEY = "quoted value"
SINGLE='single'
MISMATCHED="open'
EMPTY=
=novalue
no equals sign here
URL=https://example.com/?a=b
"#;
        let values = parse_env_file(contents);

        assert_eq!(values.get("TICKETMASTER_API_KEY").unwrap(), "abc123");
        assert_eq!(values.get("GOOGLE_PLACES_API_KEY").unwrap(), "quoted value");
        assert_eq!(values.get("SINGLE").unwrap(), "single");
        assert_eq!(values.get("MISMATCHED").unwrap(), "\"open'");
        assert_eq!(values.get("URL").unwrap(), "https://example.com/?a=b");
        assert!(!values.contains_key("EMPTY"));
        assert!(!values.contains_key(""));
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_lone_quote_is_kept() {
        let values = parse_env_file("KEY=\"");
        assert_eq!(values.get("KEY").unwrap(), "\"");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = parse_env_file("TICKETMASTER_API_KEY=from-file\nCUSTOM=file");
        let config = Config::from_sources(file, |key| match key {
            "TICKETMASTER_API_KEY" => Some("from-env".to_string()),
            "GOOGLE_PLACES_API_KEY" => Some("env-only".to_string()),
            "CUSTOM" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.ticketmaster_key(), Some("from-env"));
        assert_eq!(config.google_places_key(), Some("env-only"));
        assert_eq!(config.get("CUSTOM"), Some("file"));
    }

    #[test]
    fn test_available_sources() {
        let config = Config::from_sources(BTreeMap::new(), no_env);
        assert_eq!(config.available_sources(), vec!["websearch"]);

        let file = parse_env_file("GOOGLE_PLACES_API_KEY=x");
        let config = Config::from_sources(file, no_env);
        assert_eq!(config.available_sources(), vec!["websearch", "google_places"]);

        let file = parse_env_file("GOOGLE_PLACES_API_KEY=x\nTICKETMASTER_API_KEY=y");
        let config = Config::from_sources(file, no_env);
        assert_eq!(
            config.available_sources(),
            vec!["websearch", "ticketmaster", "google_places"]
        );
    }

    #[test]
    fn test_directory_defaults_and_overrides() {
        let config = Config::from_sources(BTreeMap::new(), no_env);
        assert_eq!(config.data_dir(), PathBuf::from("data"));

        let file = parse_env_file("DATEKIT_DATA_DIR=/srv/file-data");
        let config = Config::from_sources(file, |key| {
            (key == CACHE_DIR_VAR).then(|| "/tmp/env-cache".to_string())
        });
        assert_eq!(config.data_dir(), PathBuf::from("/srv/file-data"));
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/env-cache"));
    }

    #[test]
    fn test_load_env_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");

        assert!(load_env_file(&path).unwrap().is_empty());

        fs::write(&path, "TICKETMASTER_API_KEY='k'\n").unwrap();
        let values = load_env_file(&path).unwrap();
        assert_eq!(values.get("TICKETMASTER_API_KEY").unwrap(), "k");
    }
}
