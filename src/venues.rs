// Local venue registry.
// Lookup by slug, Ticketmaster id enrichment, and the one-time layout migration.
//
// The canonical file layout is `{"venues": [...]}`. Older registries stored a
// bare list; `migrate` rewrites those once and `load` refuses them afterwards.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DatekitError, Result};

/// Platform tag for venues ticketed through Ticketmaster.
pub const TICKETMASTER_PLATFORM: &str = "ticketmaster";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub ticketing_platform: Option<String>,
    #[serde(default)]
    pub ticketmaster_venue_id: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Fields maintained by other tools, preserved on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    /// The Ticketmaster id, ignoring blank values.
    pub fn platform_id(&self) -> Option<&str> {
        self.ticketmaster_venue_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    pub fn is_ticketmaster(&self) -> bool {
        self.ticketing_platform.as_deref() == Some(TICKETMASTER_PLATFORM)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    venues: Vec<Venue>,
}

/// Outcome of `VenueRegistry::migrate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    Migrated { venues: usize },
    AlreadyCanonical,
}

#[derive(Debug, Clone)]
pub struct VenueRegistry {
    path: PathBuf,
    venues: Vec<Venue>,
}

impl VenueRegistry {
    /// Load a registry in the canonical layout.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        if value.is_array() {
            return Err(DatekitError::LegacyRegistry(path.display().to_string()));
        }

        let file: RegistryFile = serde_json::from_value(value)?;
        Ok(Self {
            path: path.to_path_buf(),
            venues: file.venues,
        })
    }

    /// Rewrite a bare-list registry into the canonical layout.
    pub fn migrate(path: &Path) -> Result<Migration> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        if !value.is_array() {
            return Ok(Migration::AlreadyCanonical);
        }

        let venues: Vec<Venue> = serde_json::from_value(value)?;
        let registry = Self {
            path: path.to_path_buf(),
            venues,
        };
        registry.save()?;
        Ok(Migration::Migrated {
            venues: registry.venues.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    /// Find a venue by exact slug, else by partial slug or name match.
    pub fn find(&self, query: &str) -> Option<&Venue> {
        if let Some(venue) = self.venues.iter().find(|v| v.slug == query) {
            return Some(venue);
        }

        let needle = query.to_lowercase();
        self.venues
            .iter()
            .find(|v| v.slug.contains(&needle) || v.name.to_lowercase().contains(&needle))
    }

    /// Ticketmaster venues still lacking a platform id.
    pub fn missing_platform_ids(&self) -> Vec<&Venue> {
        self.venues
            .iter()
            .filter(|v| v.is_ticketmaster() && v.platform_id().is_none())
            .collect()
    }

    /// Venues that already carry a platform id.
    pub fn with_platform_ids(&self) -> Vec<&Venue> {
        self.venues
            .iter()
            .filter(|v| v.platform_id().is_some())
            .collect()
    }

    /// Record a Ticketmaster id. Returns false when no venue has the slug.
    pub fn set_platform_id(&mut self, slug: &str, id: impl Into<String>) -> bool {
        match self.venues.iter_mut().find(|v| v.slug == slug) {
            Some(venue) => {
                venue.ticketmaster_venue_id = Some(id.into());
                true
            }
            None => false,
        }
    }

    /// Write the registry back in the canonical layout.
    pub fn save(&self) -> Result<()> {
        let file = RegistryFile {
            venues: self.venues.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut out = fs::File::create(&temp_path)?;
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")?;
        out.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
