//! Shared test utilities for the folio-sync test suite.
//!
//! Builds throwaway source trees and configs rooted in a temp directory, so
//! tests never depend on the real site layout.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = sync_config(tmp.path());
//! source_folder(
//!     &config.gallery.source,
//!     "photo1",
//!     &[("dawn.jpg", "bytes"), ("dawn.txt", "Dawn\nStory.")],
//! );
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SyncConfig;

/// Config with every path rooted under `root`.
///
/// Sources are not created here; tests create exactly the folders they need.
pub fn sync_config(root: &Path) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.assets_dir = root.join("assets");
    config.gallery.source = root.join("gallery");
    config.gallery.data_file = root.join("data/gallery.json");
    config.series.source = root.join("series");
    config.series.data_file = root.join("data/series.json");
    config
}

/// Create a source folder under `root` containing the given files.
///
/// `name` may be nested (`"s1/p1"`); intermediate folders are created.
pub fn source_folder(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, content) in files {
        fs::write(dir.join(file), content).unwrap();
    }
    dir
}
