//! Companion repository metadata resolution.
//!
//! Every companion repository ships a metadata descriptor (by default at
//! `.openshiftio/booster.yaml`) holding the booster's display name,
//! description and any free-form key/value entries, plus an optional
//! long-form description file. Both are read from the local checkout; a
//! missing or malformed metadata descriptor drops the entry from the index
//! without aborting the build.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use serde_yaml::Mapping;
use tracing::{debug, warn};

use crate::errors::Error;

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;

/// Conventional location of the optional long-form description within a
/// companion repository.
pub const DESCRIPTION_FILE: &str = ".openshiftio/description.adoc";

/// Read and parse the metadata descriptor at `content_path/descriptor_path`
/// as a generic string-keyed mapping, preserving document order.
///
/// ## Errors
///
/// A missing, unreadable or unparsable file yields [`Error::Metadata`]. The
/// index builder treats this as per-entry: the booster is dropped and the
/// rebuild continues.
pub fn resolve(content_path: &Path, descriptor_path: &str) -> Result<Mapping, Error> {
    let metadata_file = content_path.join(descriptor_path);
    debug!("Resolving metadata from {:?}", metadata_file);
    let file = File::open(&metadata_file).map_err(|e| Error::Metadata {
        path: metadata_file.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_yaml::from_reader(file).map_err(|e| Error::Metadata {
        path: metadata_file.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load the optional long-form description shipped with a companion
/// repository.
///
/// Returns `None` when the file is absent; unreadable files are logged and
/// treated the same way, since the description is auxiliary content.
pub fn load_long_description(content_path: &Path) -> Option<String> {
    let path = content_path.join(DESCRIPTION_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Failed to read description at {:?}: {}", path, e);
            None
        }
    }
}
