//! Folder naming conventions and derived identifiers.
//!
//! Source folders follow a loose personal convention: gallery projects live in
//! folders like `photo1`, `photo2`; featured series are folders `s1`, `s2`,
//! each holding photo folders `p1`, `p2`. Three strings are derived from the
//! folder names:
//!
//! - **id**: stable identifier used in the output JSON and as the asset
//!   filename stem (`project_photo3`, `s1_p2`)
//! - **placeholder title**: shown when a folder has no story file
//!   (`Project 3`, `Series 1 - Photo 2`)
//! - **meta**: category label plus calendar year (`Project • 2026`,
//!   `Series 1 • 2026`)
//!
//! Because the asset stem is the folder id, each source folder maps to exactly
//! one destination file regardless of how the source image itself is named.

use std::path::Path;

/// Identity of a leaf source folder within its collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderKey {
    /// A project folder directly under the gallery root.
    Project { folder: String },
    /// A photo folder one level below its series folder.
    Photo { series: String, photo: String },
}

impl FolderKey {
    /// Identifier used for the JSON `id` field and the asset filename stem.
    pub fn id(&self) -> String {
        match self {
            FolderKey::Project { folder } => format!("project_{folder}"),
            FolderKey::Photo { series, photo } => format!("{series}_{photo}"),
        }
    }

    /// Folder path relative to the scan root, used in report lines.
    pub fn name(&self) -> String {
        match self {
            FolderKey::Project { folder } => folder.clone(),
            FolderKey::Photo { series, photo } => format!("{series}/{photo}"),
        }
    }

    /// Title used when the folder has no story file.
    pub fn placeholder_title(&self) -> String {
        match self {
            FolderKey::Project { folder } => {
                format!("Project {}", folder_label(folder, "photo"))
            }
            FolderKey::Photo { series, photo } => format!(
                "Series {} - Photo {}",
                folder_label(series, "s"),
                folder_label(photo, "p")
            ),
        }
    }

    /// The `meta` field: category label plus calendar year.
    pub fn meta(&self, year: i32) -> String {
        match self {
            FolderKey::Project { .. } => format!("Project \u{2022} {year}"),
            FolderKey::Photo { series, .. } => {
                format!("Series {} \u{2022} {year}", folder_label(series, "s"))
            }
        }
    }
}

/// Extract the display label from a conventionally-named folder.
///
/// The convention prefix is stripped only when the remainder is a plain
/// number, so unconventional folder names stay readable as-is:
/// - `"photo3"` with prefix `"photo"` → `"3"`
/// - `"s12"` with prefix `"s"` → `"12"`
/// - `"spots"` with prefix `"s"` → `"spots"` (remainder not numeric)
/// - `"summer"` with prefix `"photo"` → `"summer"` (no prefix)
pub fn folder_label<'a>(name: &'a str, prefix: &str) -> &'a str {
    match name.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => name,
    }
}

/// Destination filename for a folder's image.
///
/// The extension is carried over from the source verbatim, case included,
/// except HEIC (any case) which always becomes `.jpg` because the image is
/// converted rather than copied.
pub fn asset_name(id: &str, image: &Path) -> String {
    match image.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("heic") => format!("{id}.jpg"),
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
