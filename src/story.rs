//! Story file parsing.
//!
//! A story is a plain `.txt` file sitting next to a folder's image. The first
//! non-blank line is the title; everything after it is the description:
//!
//! ```text
//! Dawn at the Pier
//! Shot over three cold mornings in November.
//! The fog never lifted before eight.
//! ```
//!
//! Folders without a story (or with one that cannot be read) still produce an
//! item, falling back to a placeholder title derived from the folder name.

use std::fs;
use std::path::Path;

/// Description used when a story has a title but no body text.
pub const NO_DESCRIPTION: &str = "No description available";

/// Title and description for one gallery or series item.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub title: String,
    pub description: String,
}

impl Story {
    /// Parse story text: first line is the title, the rest is the description.
    ///
    /// Surrounding whitespace is trimmed at every level, so trailing newlines
    /// and indented lines do not leak into the output. Empty or whitespace-only
    /// content falls back to the placeholder title.
    pub fn parse(content: &str, fallback_title: &str) -> Self {
        let mut lines = content.trim().lines();
        let title = lines.next().map(str::trim).unwrap_or(fallback_title);
        let rest = lines.collect::<Vec<_>>().join("\n");
        let rest = rest.trim();
        Story {
            title: title.to_string(),
            description: if rest.is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                rest.to_string()
            },
        }
    }

    /// Read and parse a story file, tolerating read failures.
    ///
    /// An unreadable story is not fatal to the sync: the item keeps the
    /// placeholder title and gets [`NO_DESCRIPTION`].
    pub fn read(path: &Path, fallback_title: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Story::parse(&content, fallback_title),
            Err(_) => Story {
                title: fallback_title.to_string(),
                description: NO_DESCRIPTION.to_string(),
            },
        }
    }

    /// Story for a folder with no story file at all.
    pub fn placeholder(title: &str) -> Self {
        Story {
            title: title.to_string(),
            description: format!("{title} - Add your story in a .txt file"),
        }
    }
}
