//! # folio-sync
//!
//! Keeps a photography portfolio site's data files in step with plain folders
//! of images. Your filesystem is the data source: each folder is one gallery
//! entry, a `.txt` file next to the image is its story, and the folder name
//! carries the id.
//!
//! # Architecture: Two Collections, One Pipeline
//!
//! Two collections feed the site, differing only in nesting and naming:
//!
//! ```text
//! 1. Gallery   content/project-gallery/   →  site/data/project-gallery.json
//!              photo1/, photo2/, …           (flat: one folder per project)
//!
//! 2. Series    content/featured-series/   →  site/data/featured-series.json
//!              s1/p1/, s1/p2/, s2/p1/, …     (two levels: series / photo)
//! ```
//!
//! Both run the same pipeline: scan the source root, copy or convert each
//! folder's image into `site/assets/`, read its story, and atomically replace
//! the JSON array the site's frontend renders. `watch` keeps the gallery
//! fresh while folders are edited.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks collection roots, finds each folder's image and story |
//! | [`naming`] | Folder-name conventions: ids, placeholder titles, meta labels, asset names |
//! | [`story`] | Story file parsing — first line is the title, the rest the description |
//! | [`convert`] | HEIC to JPEG via an external command, behind a trait seam |
//! | [`sync`] | The pipeline: copy/convert assets, build items, write the data file |
//! | [`output`] | CLI report formatting — indexed per-folder lines plus a summary |
//! | [`watch`] | Debounced filesystem watcher that re-runs the gallery sync |
//! | [`config`] | `folio-sync.toml` loading, merging, and validation |
//!
//! # Design Decisions
//!
//! ## Folder Names Are the Schema
//!
//! There is no database and no front-matter. `photo3` becomes id
//! `project_photo3` and, absent a story file, the title "Project 3". A folder
//! dropped in with nothing but an image is immediately publishable; titles
//! and descriptions can be filled in later without re-plumbing anything.
//!
//! ## Per-Folder Outcomes, Not Run Failures
//!
//! One folder missing its image, or one HEIC that fails to convert, must not
//! keep the other twenty folders off the site. Each folder produces a typed
//! outcome ([`sync::SyncStatus`]) — synced with its item, or skipped with a
//! reason — and run-level errors are reserved for problems that invalidate
//! the whole run, like a missing source root.
//!
//! ## Atomic Data Writes
//!
//! The site may be serving (or a dev server watching) `site/data/*.json`
//! while a sync runs. The data file is written to a sibling `.tmp` file and
//! renamed into place, so readers see either the old array or the new one,
//! never a truncated write.
//!
//! ## The Watcher Spawns Child Processes
//!
//! `watch` re-invokes this binary (`folio-sync gallery`) for each debounced
//! change instead of calling the sync in-process. A panic or leak in one run
//! cannot take the watcher down, and config edits are picked up on the next
//! run without restarting the watch.
//!
//! ## External HEIC Conversion
//!
//! HEIC decoding is patent-encumbered and has no settled pure-Rust decoder,
//! while every macOS machine ships `sips`. Conversion shells out (argument
//! vector, checked exit status) and the command is configurable for machines
//! where `sips` is not the right tool.

pub mod config;
pub mod convert;
pub mod naming;
pub mod output;
pub mod scan;
pub mod story;
pub mod sync;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
