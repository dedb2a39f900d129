//! Layered configuration for reel.
//!
//! Values are merged from, in increasing priority:
//! 1. built-in defaults,
//! 2. an optional TOML/YAML/JSON file (format chosen by extension),
//! 3. `REEL_`-prefixed environment variables, nested with `__`
//!    (`REEL_ENRICHMENT__MAX_CONCURRENCY=8`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "REEL_";
/// Default buffer of pending change notifications per store namespace.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 16;
const DATABASE_FILENAME: &str = "cache.sqlite";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache: CacheConfig,
    pub enrichment: EnrichmentConfig,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Database file. Defaults to the platform cache directory.
    pub path: Option<PathBuf>,
    /// Keep the cache in memory only; `path` is ignored.
    pub in_memory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    /// Cap on concurrent enrichment fetches per batch. Unset is unbounded.
    pub max_concurrency: Option<usize>,
    /// Remember enrichment results for this many seconds. Unset disables it.
    pub memo_ttl_secs: Option<u64>,
}
impl EnrichmentConfig {
    pub fn memo_ttl(&self) -> Option<Duration> {
        self.memo_ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Store writes a stream may fall behind by before it only sees "something changed".
    pub notification_capacity: usize,
}
impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

impl Config {
    /// Load defaults, then `file` (if any), then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Self::defaults();
        if let Some(path) = file {
            figment = figment.merge(file_provider(path)?);
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load defaults, then `path`. The environment is not consulted.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_figment(Self::defaults().merge(file_provider(path)?))
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.cache.path = config.cache.resolved_path()?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.enrichment.max_concurrency == Some(0) {
            exn::bail!(ErrorKind::Invalid("enrichment.max_concurrency must be > 0"));
        }
        if self.enrichment.memo_ttl_secs == Some(0) {
            exn::bail!(ErrorKind::Invalid("enrichment.memo_ttl_secs must be > 0"));
        }
        if self.stream.notification_capacity == 0 {
            exn::bail!(ErrorKind::Invalid("stream.notification_capacity must be > 0"));
        }
        if let Some(path) = &self.cache.path
            && path.as_os_str().is_empty()
        {
            exn::bail!(ErrorKind::Invalid("cache.path must not be empty"));
        }
        Ok(())
    }
}

impl CacheConfig {
    /// Database file to open; `None` for an in-memory cache.
    pub fn location(&self) -> Option<&Path> {
        match self.in_memory {
            true => None,
            false => self.path.as_deref(),
        }
    }

    fn resolved_path(&self) -> Result<Option<PathBuf>> {
        if self.in_memory || self.path.is_some() {
            return Ok(self.path.clone());
        }
        let Some(dirs) = ProjectDirs::from("", "", "reel") else {
            exn::bail!(ErrorKind::Invalid("cache.path has no platform default"));
        };
        Ok(Some(dirs.cache_dir().join(DATABASE_FILENAME)))
    }
}

fn file_provider(path: &Path) -> Result<Figment> {
    // figment treats a missing file as empty; an explicitly named one must exist.
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "configuration file not found");
        exn::bail!(ErrorKind::Load);
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let figment = Figment::new();
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::Invalid("config file extension must be toml, yaml or json")),
    })
}
