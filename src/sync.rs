//! The sync pipeline: source folders in, data file and assets out.
//!
//! Both collections run through the same stages:
//!
//! ```text
//! scan roots          copy / convert            write JSON
//! ──────────▶  folders ──────────────▶  assets  ──────────▶  data file
//!                        │
//!                        └─ each folder: image to assets/,
//!                           story to title + description
//! ```
//!
//! Per-folder problems never abort the run. A folder with no image, a failed
//! copy, or a failed conversion becomes a [`SyncStatus::Skipped`] outcome with
//! a typed reason, and the remaining folders still sync. Errors returned from
//! [`sync_gallery`] and [`sync_series`] are reserved for run-level failures
//! such as a missing source root or an unwritable data file.
//!
//! The data file is replaced atomically: items are serialized to a sibling
//! `.tmp` file first, then renamed over the target. A sync interrupted
//! mid-write leaves the previous data file intact, never a truncated one.
//! An empty collection still writes `[]` so downstream pages render an empty
//! gallery instead of reading stale data.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::{CollectionConfig, SyncConfig};
use crate::convert::{ImageConverter, SipsConverter};
use crate::naming;
use crate::scan::{self, ScanError, SourceFolder};
use crate::story::Story;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to create {0}: {1}")]
    CreateDir(PathBuf, #[source] io::Error),
    #[error("Failed to write {0}: {1}")]
    WriteData(PathBuf, #[source] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry in the output data file.
///
/// Field order is the JSON key order the site's frontend expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Site-relative asset path, e.g. `assets/project_photo1.jpg`.
    pub image: String,
    pub meta: String,
}

/// How a folder's image reached the assets directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetAction {
    Copied,
    Converted,
}

/// Why a folder was left out of the data file.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoImage,
    CopyFailed(String),
    ConvertFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoImage => write!(f, "no image file"),
            SkipReason::CopyFailed(err) => write!(f, "copy failed: {err}"),
            SkipReason::ConvertFailed(err) => write!(f, "conversion failed: {err}"),
        }
    }
}

/// What happened to one source folder.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced { item: Item, action: AssetAction },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderOutcome {
    /// Folder path relative to the collection root, e.g. `photo1` or `s1/p2`.
    pub folder: String,
    pub status: SyncStatus,
}

/// Result of a full sync run, one outcome per scanned folder.
#[derive(Debug)]
pub struct SyncReport {
    pub outcomes: Vec<FolderOutcome>,
    /// The data file that was written.
    pub data_file: PathBuf,
}

impl SyncReport {
    /// Items that made it into the data file, in output order.
    pub fn items(&self) -> Vec<&Item> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                SyncStatus::Synced { item, .. } => Some(item),
                SyncStatus::Skipped(_) => None,
            })
            .collect()
    }

    pub fn synced(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SyncStatus::Synced { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.synced()
    }
}

/// Sync the flat project gallery.
pub fn sync_gallery(config: &SyncConfig, year: i32) -> Result<SyncReport, SyncError> {
    let converter = SipsConverter::new(&config.converter.command);
    sync_gallery_with(&converter, config, year)
}

/// Gallery sync with an injected converter.
pub fn sync_gallery_with(
    converter: &impl ImageConverter,
    config: &SyncConfig,
    year: i32,
) -> Result<SyncReport, SyncError> {
    let folders = scan::scan_gallery(&config.gallery.source)?;
    run_sync(converter, config, &config.gallery, folders, year)
}

/// Sync the two-level featured series.
pub fn sync_series(config: &SyncConfig, year: i32) -> Result<SyncReport, SyncError> {
    let converter = SipsConverter::new(&config.converter.command);
    sync_series_with(&converter, config, year)
}

/// Series sync with an injected converter.
pub fn sync_series_with(
    converter: &impl ImageConverter,
    config: &SyncConfig,
    year: i32,
) -> Result<SyncReport, SyncError> {
    let folders = scan::scan_series(&config.series.source)?;
    run_sync(converter, config, &config.series, folders, year)
}

fn run_sync(
    converter: &impl ImageConverter,
    config: &SyncConfig,
    collection: &CollectionConfig,
    folders: Vec<SourceFolder>,
    year: i32,
) -> Result<SyncReport, SyncError> {
    fs::create_dir_all(&config.assets_dir)
        .map_err(|e| SyncError::CreateDir(config.assets_dir.clone(), e))?;

    let mut outcomes = Vec::new();
    let mut items = Vec::new();
    for folder in folders {
        let status = sync_folder(converter, &config.assets_dir, &folder, year);
        if let SyncStatus::Synced { item, .. } = &status {
            items.push(item.clone());
        }
        outcomes.push(FolderOutcome {
            folder: folder.key.name(),
            status,
        });
    }

    write_data_file(&collection.data_file, &items)?;

    Ok(SyncReport {
        outcomes,
        data_file: collection.data_file.clone(),
    })
}

fn sync_folder(
    converter: &impl ImageConverter,
    assets_dir: &Path,
    folder: &SourceFolder,
    year: i32,
) -> SyncStatus {
    let Some(image) = &folder.image else {
        return SyncStatus::Skipped(SkipReason::NoImage);
    };

    let id = folder.key.id();
    let asset = naming::asset_name(&id, image);
    let dest = assets_dir.join(&asset);

    let action = if scan::is_heic(image) {
        match converter.convert(image, &dest) {
            Ok(()) => AssetAction::Converted,
            Err(err) => return SyncStatus::Skipped(SkipReason::ConvertFailed(err.to_string())),
        }
    } else {
        match fs::copy(image, &dest) {
            Ok(_) => AssetAction::Copied,
            Err(err) => return SyncStatus::Skipped(SkipReason::CopyFailed(err.to_string())),
        }
    };

    let placeholder = folder.key.placeholder_title();
    let story = match &folder.story {
        Some(path) => Story::read(path, &placeholder),
        None => Story::placeholder(&placeholder),
    };

    SyncStatus::Synced {
        item: Item {
            id,
            title: story.title,
            description: story.description,
            image: format!("assets/{asset}"),
            meta: folder.key.meta(year),
        },
        action,
    }
}

/// Serialize items and replace the data file atomically.
fn write_data_file(path: &Path, items: &[Item]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| SyncError::CreateDir(parent.to_path_buf(), e))?;
    }

    let json = serde_json::to_string_pretty(items)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, &json).map_err(|e| SyncError::WriteData(tmp.clone(), e))?;
    fs::rename(&tmp, path).map_err(|e| SyncError::WriteData(path.to_path_buf(), e))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
