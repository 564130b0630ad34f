// Command handlers for the datekit CLI.
// Each handler resolves its inputs, calls the clients, and prints JSON to stdout.

pub mod classes;
pub mod events;
pub mod maintenance;
pub mod restaurants;
pub mod venues;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

use crate::cache::DiskCache;
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::paths;
use crate::preferences::Preferences;

/// How JSON output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed with two-space indent.
    Json,
    /// Single line, no whitespace.
    Compact,
}

/// Render a value in the requested format.
pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    })
}

pub fn print_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Shared state for one invocation.
pub struct Context {
    pub config: Config,
    pub http: HttpClient,
    pub cache: DiskCache,
    pub today: NaiveDate,
}

impl Context {
    pub fn new(config: Config, today: NaiveDate) -> Result<Self> {
        let cache = DiskCache::new(config.cache_dir());
        Ok(Self {
            http: HttpClient::new()?,
            cache,
            config,
            today,
        })
    }

    pub fn venues_path(&self) -> std::path::PathBuf {
        paths::venues_path(&self.config.data_dir())
    }

    /// City from the flag, else preferences, else empty.
    pub fn resolve_city(&self, flag: Option<&str>) -> Result<String> {
        if let Some(city) = flag.map(str::trim).filter(|c| !c.is_empty()) {
            return Ok(city.to_string());
        }
        let prefs = Preferences::load(&paths::preferences_path(&self.config.data_dir()))?;
        Ok(prefs.city().unwrap_or_default().to_string())
    }
}

pub(crate) fn warn_missing_city() {
    warn!("No city specified. Use --city or set city in data/preferences.json");
}
