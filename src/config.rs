//! Sync configuration.
//!
//! Everything configurable lives in one TOML file, `folio-sync.toml` by
//! default. Resolution is two layers: stock defaults compiled into the
//! binary, with the user's file merged on top key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "site/assets"        # Destination for synced images
//!
//! [gallery]
//! source = "content/project-gallery"
//! data_file = "site/data/project-gallery.json"
//!
//! [series]
//! source = "content/featured-series"
//! data_file = "site/data/featured-series.json"
//!
//! [converter]
//! command = "sips"                  # HEIC to JPEG conversion command
//!
//! [watch]
//! debounce_ms = 2000                # Quiet window between triggered syncs
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only move the assets directory
//! assets_dir = "public/img"
//! ```
//!
//! Unknown keys are rejected to catch typos early, and cross-field rules
//! (an empty converter command, gallery and series writing the same file)
//! are validated before any command runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Sync configuration loaded from `folio-sync.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Destination directory for copied and converted images.
    pub assets_dir: PathBuf,
    /// The flat project gallery.
    pub gallery: CollectionConfig,
    /// The two-level featured series.
    pub series: CollectionConfig,
    /// HEIC conversion settings.
    pub converter: ConverterConfig,
    /// Change watcher settings.
    pub watch: WatchConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("site/assets"),
            gallery: CollectionConfig {
                source: PathBuf::from("content/project-gallery"),
                data_file: PathBuf::from("site/data/project-gallery.json"),
            },
            series: CollectionConfig {
                source: PathBuf::from("content/featured-series"),
                data_file: PathBuf::from("site/data/featured-series.json"),
            },
            converter: ConverterConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Validate the cross-field rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.converter.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "converter.command must not be empty".into(),
            ));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "watch.debounce_ms must be greater than zero".into(),
            ));
        }
        if self.gallery.data_file == self.series.data_file {
            return Err(ConfigError::Validation(format!(
                "gallery and series share the same data_file: {}",
                self.gallery.data_file.display()
            )));
        }
        Ok(())
    }
}

/// Where one collection reads from and writes to.
///
/// No `Default` here: gallery and series want different paths, so defaults
/// live in [`SyncConfig::default`] and reach partial user files via the
/// merge in [`load_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Folder-of-folders to scan.
    pub source: PathBuf,
    /// JSON array the sync writes.
    pub data_file: PathBuf,
}

/// HEIC conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Command used to convert HEIC images to JPEG.
    pub command: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: "sips".to_string(),
        }
    }
}

/// Change watcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Quiet window between change-triggered syncs, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 2000 }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
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
    toml::Value::try_from(SyncConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
/// - Overlay keys unknown to the base survive the merge; deserialization
///   rejects them afterwards.
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

/// Load the config file as a raw TOML value.
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

/// Load the config file at `path`, merged over stock defaults and validated.
///
/// A missing file is not an error: the stock defaults describe the standard
/// site layout and apply as-is.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SyncConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `folio-sync.toml` with all keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-sync Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Paths are resolved relative to the directory folio-sync runs from.
# Unknown keys will cause an error.

# Destination directory for copied and converted images.
assets_dir = "site/assets"

# ---------------------------------------------------------------------------
# Project gallery (flat: one folder per project)
# ---------------------------------------------------------------------------
[gallery]
source = "content/project-gallery"
data_file = "site/data/project-gallery.json"

# ---------------------------------------------------------------------------
# Featured series (two levels: series folders holding photo folders)
# ---------------------------------------------------------------------------
[series]
source = "content/featured-series"
data_file = "site/data/featured-series.json"

# ---------------------------------------------------------------------------
# HEIC conversion
# ---------------------------------------------------------------------------
[converter]
# Command used to convert HEIC images to JPEG.
command = "sips"

# ---------------------------------------------------------------------------
# Change watching
# ---------------------------------------------------------------------------
[watch]
# Quiet window between change-triggered syncs, in milliseconds.
debounce_ms = 2000
"##
}
