//! CLI output formatting.
//!
//! Every folder leads with its positional index and source name, with the
//! destination or skip reason on the same line. A summary closes each run.
//!
//! # Sync
//!
//! ```text
//! 001 photo1 → assets/project_photo1.jpg
//!     Title: Dawn at the Pier
//! 002 photo2 → assets/project_photo2.jpg (converted)
//!     Title: Project 2
//! 003 photo3 skipped: no image file
//!
//! 2 synced, 1 skipped → site/data/project-gallery.json
//! ```
//!
//! # Check
//!
//! ```text
//! 001 photo1 (dawn.jpg, dawn.txt)
//! 002 photo2 (IMG_0042.heic, no story)
//! 003 photo3 (no image)
//!
//! 3 folders
//! ```
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use std::path::Path;

use crate::scan::SourceFolder;
use crate::sync::{AssetAction, SyncReport, SyncStatus};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Sync report
// ============================================================================

/// Format a sync run: one entry per folder, then a summary line.
pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, outcome) in report.outcomes.iter().enumerate() {
        match &outcome.status {
            SyncStatus::Synced { item, action } => {
                let marker = match action {
                    AssetAction::Copied => "",
                    AssetAction::Converted => " (converted)",
                };
                lines.push(format!(
                    "{} {} \u{2192} {}{}",
                    format_index(i + 1),
                    outcome.folder,
                    item.image,
                    marker
                ));
                lines.push(format!("    Title: {}", item.title));
            }
            SyncStatus::Skipped(reason) => {
                lines.push(format!(
                    "{} {} skipped: {}",
                    format_index(i + 1),
                    outcome.folder,
                    reason
                ));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} synced, {} skipped \u{2192} {}",
        report.synced(),
        report.skipped(),
        report.data_file.display()
    ));

    lines
}

/// Print a sync report to stdout.
pub fn print_sync_report(report: &SyncReport) {
    for line in format_sync_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check listing
// ============================================================================

/// Format a dry-run listing of scanned folders, nothing written.
pub fn format_check_output(folders: &[SourceFolder]) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, folder) in folders.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            folder.key.name(),
            folder_contents(folder)
        ));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{} folders", folders.len()));

    lines
}

/// Print a check listing to stdout.
pub fn print_check_output(folders: &[SourceFolder]) {
    for line in format_check_output(folders) {
        println!("{}", line);
    }
}

fn folder_contents(folder: &SourceFolder) -> String {
    let Some(image) = &folder.image else {
        return "no image".to_string();
    };
    match &folder.story {
        Some(story) => format!("{}, {}", file_name(image), file_name(story)),
        None => format!("{}, no story", file_name(image)),
    }
}

// ============================================================================
// Tests
// ============================================================================
