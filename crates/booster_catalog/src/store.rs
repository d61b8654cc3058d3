//! The catalog store: atomic snapshot publication and read operations.
//!
//! The store is the single synchronization point between the write side
//! (index builder output) and the read side (lookups and content copies).
//! Publication is atomic: a reader observes the previous snapshot or the
//! new one in its entirety, never a mix, and never blocks on an in-progress
//! rebuild beyond the brief read-lock acquisition.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::booster::{Booster, Mission, Runtime};
use crate::errors::Error;
use crate::index::CatalogSnapshot;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// File and directory names never copied into a generated project:
/// version-control metadata, CI configuration, OS artifacts and the legacy
/// descriptor directory. Compared case-insensitively.
pub const EXCLUDED_PROJECT_FILES: [&str; 6] = [
    ".git",
    ".travis",
    ".travis.yml",
    ".ds_store",
    ".openshiftio",
    ".gitmodules",
];

/// Whether `name` is on the standard copy exclusion denylist.
pub fn is_excluded_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    EXCLUDED_PROJECT_FILES
        .iter()
        .any(|excluded| *excluded == lowered)
}

/// Holds the currently published [`CatalogSnapshot`] and serves reads.
///
/// The snapshot sits behind a reader-writer lock, but the write lock is
/// held only for the pointer swap in [`CatalogStore::publish`]. A rebuild
/// therefore never blocks readers, and never mutates a snapshot a reader
/// already holds.
pub struct CatalogStore {
    snapshot: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(initial: CatalogSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(initial)),
        }
    }

    /// Install `snapshot` as the current one.
    ///
    /// Linearizable: once this returns, every subsequent
    /// [`CatalogStore::snapshot`] call observes the new value or a later
    /// one. Readers holding the previous snapshot keep it unchanged.
    pub fn publish(&self, snapshot: CatalogSnapshot) {
        let snapshot = Arc::new(snapshot);
        let count = snapshot.len();
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
        drop(guard);
        debug!("Published catalog snapshot with {} boosters", count);
    }

    /// The snapshot in force at call time.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All published boosters, sorted by display name.
    pub fn boosters(&self) -> Vec<Booster> {
        self.snapshot().boosters().to_vec()
    }

    /// All mission ids present in the catalog, sorted and deduplicated.
    pub fn missions(&self) -> Vec<Mission> {
        let snapshot = self.snapshot();
        let mut missions: Vec<Mission> = snapshot
            .boosters()
            .iter()
            .map(|booster| booster.mission().clone())
            .collect();
        missions.sort();
        missions.dedup();
        missions
    }

    /// Runtime ids available for `mission`, sorted and deduplicated.
    ///
    /// An empty or unspecified mission yields an empty set.
    pub fn runtimes(&self, mission: &Mission) -> Vec<Runtime> {
        if mission.is_empty() {
            return Vec::new();
        }
        let snapshot = self.snapshot();
        let mut runtimes: Vec<Runtime> = snapshot
            .boosters()
            .iter()
            .filter(|booster| booster.mission() == mission)
            .map(|booster| booster.runtime().clone())
            .collect();
        runtimes.sort();
        runtimes.dedup();
        runtimes
    }

    /// Look up the booster for a `(mission, runtime)` pair.
    ///
    /// Both arguments are required: an empty mission or runtime is a caller
    /// error reported as [`Error::InvalidArgument`], not a catalog miss.
    /// `Ok(None)` means the catalog has no such entry.
    pub fn find_booster(
        &self,
        mission: &Mission,
        runtime: &Runtime,
    ) -> Result<Option<Booster>, Error> {
        if mission.is_empty() {
            return Err(Error::InvalidArgument(
                "mission must not be empty".to_string(),
            ));
        }
        if runtime.is_empty() {
            return Err(Error::InvalidArgument(
                "runtime must not be empty".to_string(),
            ));
        }
        let snapshot = self.snapshot();
        Ok(snapshot
            .boosters()
            .iter()
            .find(|booster| booster.mission() == mission && booster.runtime() == runtime)
            .cloned())
    }

    /// Copy `booster`'s content into `destination` using the standard
    /// exclusion denylist ([`EXCLUDED_PROJECT_FILES`]).
    pub fn copy_to(&self, booster: &Booster, destination: &Path) -> Result<PathBuf, Error> {
        self.copy_filtered(booster, destination, &is_excluded_name)
    }

    /// Copy `booster`'s content into `destination`, skipping every file or
    /// directory whose name matches `exclude`.
    ///
    /// Directory structure is preserved and existing destination files are
    /// overwritten. The booster handle carries its own content location, so
    /// the copy proceeds without holding the store's lock; the published
    /// snapshot is unaffected whether the copy succeeds or fails.
    pub fn copy_filtered(
        &self,
        booster: &Booster,
        destination: &Path,
        exclude: &dyn Fn(&str) -> bool,
    ) -> Result<PathBuf, Error> {
        copy_tree(booster.content_path(), destination, exclude)
    }
}

fn copy_tree(
    source: &Path,
    destination: &Path,
    exclude: &dyn Fn(&str) -> bool,
) -> Result<PathBuf, Error> {
    info!("Copying {:?} into {:?}", source, destination);
    fs::create_dir_all(destination).map_err(|e| Error::Copy {
        path: destination.display().to_string(),
        source: e,
    })?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !exclude(name))
        });
    for entry in walker {
        let entry = entry.map_err(|e| Error::Copy {
            path: source.display().to_string(),
            source: e.into(),
        })?;
        let relative = entry.path().strip_prefix(source).map_err(|e| Error::Copy {
            path: entry.path().display().to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::Copy {
                path: target.display().to_string(),
                source: e,
            })?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::Copy {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::Copy {
                path: target.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(destination.to_path_buf())
}
