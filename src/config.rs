//! Configuration file parser for ~/.config/scrollscholar/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning for each one
//! since they are usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{CatalogError, TopicCatalog};
use crate::topics::SelectorConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Values parse but make no sense together.
    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("Invalid topic list in config: {0}")]
    Topics(#[from] CatalogError),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Durations are plain millisecond counts to keep the file format simple.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of topics selectable at once.
    pub max_selected: usize,

    /// Simulated latency of saving topic preferences.
    pub save_delay_ms: u64,

    /// How long the "preferences saved" confirmation stays up.
    pub settle_ms: u64,

    /// Gap between the picker closing and its selection clearing.
    pub clear_delay_ms: u64,

    /// Simulated latency of the initial article load.
    pub load_delay_ms: u64,

    /// Status line message lifetime.
    pub status_ttl_ms: u64,

    /// Excerpt reveal speed (milliseconds per character). 0 disables the effect.
    pub typewriter_ms: u64,

    /// Seed for Knowledge Roulette. Unset = random per run.
    pub random_seed: Option<u64>,

    /// JSON article list to browse instead of the bundled sample.
    pub articles_file: Option<PathBuf>,

    /// Topic catalog override. Empty = built-in catalog.
    pub topics: Vec<String>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_selected: 5,
            save_delay_ms: 1500,
            settle_ms: 2000,
            clear_delay_ms: 300,
            load_delay_ms: 800,
            status_ttl_ms: 1500,
            typewriter_ms: 30,
            random_seed: None,
            articles_file: None,
            topics: Vec::new(),
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 11] = [
        "max_selected",
        "save_delay_ms",
        "settle_ms",
        "clear_delay_ms",
        "load_delay_ms",
        "status_ttl_ms",
        "typewriter_ms",
        "random_seed",
        "articles_file",
        "topics",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Nonsensical values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid loading a huge file into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            max_selected = config.max_selected,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the state machines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_selected == 0 {
            return Err(ConfigError::Invalid(
                "max_selected must be at least 1".to_string(),
            ));
        }
        if self.status_ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "status_ttl_ms must be greater than 0".to_string(),
            ));
        }
        if !self.topics.is_empty() {
            TopicCatalog::new(&self.topics)?;
        }
        Ok(())
    }

    // ========================================================================
    // Typed views
    // ========================================================================

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            max_selected: self.max_selected,
            settle: Duration::from_millis(self.settle_ms),
            clear_delay: Duration::from_millis(self.clear_delay_ms),
        }
    }

    /// The configured topic catalog, or the built-in one.
    pub fn catalog(&self) -> Result<TopicCatalog, ConfigError> {
        if self.topics.is_empty() {
            Ok(TopicCatalog::default())
        } else {
            Ok(TopicCatalog::new(&self.topics)?)
        }
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }

    /// Per-character reveal interval, or `None` when the effect is off.
    pub fn typewriter_interval(&self) -> Option<Duration> {
        (self.typewriter_ms > 0).then(|| Duration::from_millis(self.typewriter_ms))
    }
}

// ============================================================================
// Tests
// ============================================================================
