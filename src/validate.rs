//! Structural soundness checks.
use std::path::Path;

use tracing::debug;

use crate::{Document, DocumentFile};

pub const REQUIRED_SECTIONS: [&str; 2] = ["General", "GUI"];

/// A document is sound when it has the `General` and `GUI` sections and
/// `General.config_version` parses as an integer.
pub fn is_valid(document: &Document) -> bool {
    REQUIRED_SECTIONS
        .iter()
        .all(|section| document.has_section(section))
        && document
            .get("General", "config_version")
            .is_some_and(|version| version.trim().parse::<i64>().is_ok())
}

/// Loads `path` and applies [`is_valid`]. Unreadable files are invalid.
pub fn is_valid_file(path: &Path) -> bool {
    match DocumentFile::new(path).load() {
        Ok(document) => is_valid(&document),
        Err(err) => {
            debug!("{} is not a readable config: {err}", path.display());
            false
        }
    }
}
