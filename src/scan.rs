//! Source folder discovery.
//!
//! Both collections are folders-of-folders on disk. The gallery is flat, one
//! folder per project; the featured series adds one nesting level:
//!
//! ```text
//! content/project-gallery/        content/featured-series/
//! ├── photo1/                     ├── s1/
//! │   ├── dawn.jpg                │   ├── p1/
//! │   └── dawn.txt                │   │   ├── ridge.heic
//! ├── photo2/                     │   │   └── ridge.txt
//! │   └── IMG_0042.heic           │   └── p2/
//! └── photo3/                     │       └── river.png
//!     └── (empty, still listed)   └── s2/
//! ```
//!
//! Scanning only looks at names and file types; nothing is read or copied
//! here. Each leaf folder becomes a [`SourceFolder`] carrying its image and
//! story paths (either may be absent). Hidden entries (leading dot) are
//! skipped at every level, and folders come back in name order so repeated
//! runs produce identical output.
//!
//! When a folder holds several images or stories, the alphabetically last one
//! of each kind wins. The rule is arbitrary but stable, which matters more
//! here than the choice itself.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::naming::FolderKey;

/// File extensions recognized as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source folder not found: {0}")]
    MissingRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One leaf folder discovered under a collection root.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFolder {
    pub key: FolderKey,
    /// Path to the folder itself.
    pub path: PathBuf,
    /// The folder's image, if it has one.
    pub image: Option<PathBuf>,
    /// The folder's story file, if it has one.
    pub story: Option<PathBuf>,
}

/// Scan a flat gallery root: every visible subfolder is one project.
pub fn scan_gallery(root: &Path) -> Result<Vec<SourceFolder>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    let mut folders = Vec::new();
    for (name, path) in subdirs(root)? {
        let (image, story) = classify_files(&path)?;
        folders.push(SourceFolder {
            key: FolderKey::Project { folder: name },
            path,
            image,
            story,
        });
    }
    Ok(folders)
}

/// Scan a two-level series root: series folders holding photo folders.
///
/// Files sitting directly inside a series folder are ignored; only its
/// subfolders become items.
pub fn scan_series(root: &Path) -> Result<Vec<SourceFolder>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    let mut folders = Vec::new();
    for (series, series_path) in subdirs(root)? {
        for (photo, path) in subdirs(&series_path)? {
            let (image, story) = classify_files(&path)?;
            folders.push(SourceFolder {
                key: FolderKey::Photo {
                    series: series.clone(),
                    photo,
                },
                path,
                image,
                story,
            });
        }
    }
    Ok(folders)
}

/// Visible subdirectories of `dir`, sorted by name.
///
/// Entries whose names are not valid UTF-8 are skipped; ids and titles are
/// derived from the name, so there is nothing useful to do with them.
fn subdirs(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in dir.read_dir()? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push((name, path));
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Find the image and story inside a leaf folder.
///
/// Files are visited in name order and the last match of each kind is kept.
fn classify_files(dir: &Path) -> io::Result<(Option<PathBuf>, Option<PathBuf>)> {
    let mut files = Vec::new();
    for entry in dir.read_dir()? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut image = None;
    let mut story = None;
    for path in files {
        if is_image(&path) {
            image = Some(path);
        } else if is_story(&path) {
            story = Some(path);
        }
    }
    Ok((image, story))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
}

fn is_story(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// HEIC images get converted to JPEG instead of copied.
pub fn is_heic(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("heic"))
}
