// Cache store for reading and writing cached API results.
// Handles key derivation, mtime-based TTL checks, and best-effort JSON writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;
use crate::paths::cache_entry_path;

/// TTL for event searches: listings change often.
pub const EVENTS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// TTL for place searches.
pub const PLACES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Separator between key parts. Not expected in query strings.
const KEY_SEPARATOR: char = '\u{1f}';

/// Hex characters kept from the digest.
const KEY_LEN: usize = 16;

/// Derive a cache key from query parameters.
pub fn cache_key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(KEY_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(part.as_bytes());
    }
    let mut key = hex::encode(hasher.finalize());
    key.truncate(KEY_LEN);
    key
}

/// Result of a cache write. Callers are free to ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped { reason: String },
}

/// JSON blob store with one file per key.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        cache_entry_path(&self.dir, key)
    }

    /// Check whether an entry exists and is younger than `ttl`.
    pub fn is_valid(&self, key: &str, ttl: Duration) -> bool {
        match age(&self.entry_path(key)) {
            Some(age) => age < ttl,
            None => false,
        }
    }

    /// Load an entry if it is still valid.
    /// Missing, expired, unreadable, and malformed entries all read as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        if !self.is_valid(key, ttl) {
            debug!(key, "cache miss");
            return None;
        }

        let contents = fs::read_to_string(self.entry_path(key)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(data) => {
                debug!(key, "cache hit");
                Some(data)
            }
            Err(err) => {
                debug!(key, %err, "ignoring malformed cache entry");
                None
            }
        }
    }

    /// Store an entry. Failures are reported in the outcome, never raised.
    pub fn save<T: Serialize>(&self, key: &str, payload: &T) -> SaveOutcome {
        match self.write_entry(key, payload) {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => {
                debug!(key, %err, "cache write skipped");
                SaveOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, payload: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(key);
        let json = serde_json::to_string(payload)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Delete every cached entry, skipping files that cannot be removed.
    /// Returns the number of entries deleted.
    pub fn clear(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };

        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter(|path| match fs::remove_file(path) {
                Ok(()) => true,
                Err(err) => {
                    debug!(path = %path.display(), %err, "could not remove cache entry");
                    false
                }
            })
            .count()
    }
}

/// Age of a file from its modification time.
/// A timestamp in the future counts as age zero.
fn age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}
