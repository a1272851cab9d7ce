//! Application configuration module.
//!
//! Handles loading, validating, and merging the `excursion-cms.toml` file.
//! Stock defaults are overridden by whatever the user file specifies; the
//! file itself is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [database]
//! url = "sqlite://excursion-cms.sqlite3?mode=rwc"
//! max_connections = 5
//!
//! [media]
//! root = "media"            # Directory uploaded images are written to
//! base_url = "/media/"      # URL prefix the web server serves `root` under
//!
//! [images]
//! max_width = 1280          # Default bounding box for compressed image fields
//! max_height = 1280
//! quality = 70              # Default JPEG quality (1-100)
//!
//! [logging]
//! level = "info"            # Overridden by RUST_LOG when set
//! ```
//!
//! The `[images]` values only apply to fields whose own compression policy
//! leaves a value unset.
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [media]
//! root = "/srv/site/media"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{CompressionPolicy, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "excursion-cms.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `excursion-cms.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Relational storage connection.
    pub database: DatabaseConfig,
    /// Where uploaded media is written and served from.
    pub media: MediaConfig,
    /// Default compression policy for image fields.
    pub images: ImagesConfig,
    /// Log verbosity.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.url must not be empty".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.media.root.trim().is_empty() {
            return Err(ConfigError::Validation("media.root must not be empty".into()));
        }
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::Validation(
                "images.max_width and images.max_height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Relational storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://excursion-cms.sqlite3?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Media storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory uploaded files are stored under.
    pub root: String,
    /// Public URL prefix for stored files.
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: "media".to_string(),
            base_url: "/media/".to_string(),
        }
    }
}

/// Default compression policy applied where a field leaves values unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        let policy = CompressionPolicy::default();
        Self {
            max_width: policy.max_width,
            max_height: policy.max_height,
            quality: policy.quality.value(),
        }
    }
}

impl ImagesConfig {
    pub fn policy(&self) -> CompressionPolicy {
        CompressionPolicy {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: Quality::new(self.quality),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"excursion_cms=debug"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `excursion-cms.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# excursion-cms configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Database
# ---------------------------------------------------------------------------
[database]
# SeaORM connection URL. `mode=rwc` creates the SQLite file if missing.
url = "sqlite://excursion-cms.sqlite3?mode=rwc"

# Upper bound on pooled connections.
max_connections = 5

# ---------------------------------------------------------------------------
# Media storage
# ---------------------------------------------------------------------------
[media]
# Directory uploaded images are written to. Files are laid out as
# <app>/<entity>/<field>/<filename>, e.g. main/excursion/cover/sunrise.jpg
root = "media"

# URL prefix the web server exposes `root` under.
base_url = "/media/"

# ---------------------------------------------------------------------------
# Image compression defaults
# ---------------------------------------------------------------------------
[images]
# Bounding box for image fields whose policy does not set its own.
# Images are only ever scaled down, preserving aspect ratio.
max_width = 1280
max_height = 1280

# JPEG quality (1 = worst, 100 = best).
quality = 70

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing filter directive. RUST_LOG takes precedence when set.
level = "info"
"##
}
