//! Catalog index building.
//!
//! The index builder walks a synchronized catalog working copy, turns every
//! eligible descriptor file into a fully resolved [`Booster`], and packages
//! the survivors into an immutable [`CatalogSnapshot`]. Entries are
//! independent: a descriptor that fails to parse, a companion repository
//! that cannot be cloned, or metadata that cannot be resolved drops that one
//! entry with a logged cause and the build continues.
//!
//! Companion repositories are checked out under `modules/` inside the
//! catalog root, keyed by booster id, and that subtree is pruned from the
//! walk. A checkout that already exists is assumed current and is not
//! re-fetched (only the top-level catalog repository is refreshed on every
//! build), unless per-entry refresh is explicitly enabled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git_fetcher::RepoFetcher;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::booster::Booster;
use crate::descriptor::{self, Coordinates};
use crate::errors::Error;
use crate::metadata;

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;

/// Directory under the catalog root where companion repositories are
/// checked out.
pub const MODULES_DIR: &str = "modules";

/// An immutable, fully resolved view of the catalog at one point in time.
///
/// Snapshots are cheap to clone and share: the entries live behind an `Arc`
/// and are sorted by display name. A published snapshot is never mutated;
/// rebuilds produce a new snapshot and replace the old one wholesale.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    boosters: Arc<[Booster]>,
    catalog_root: PathBuf,
}

impl CatalogSnapshot {
    pub(crate) fn new(boosters: Vec<Booster>, catalog_root: PathBuf) -> Self {
        Self {
            boosters: boosters.into(),
            catalog_root,
        }
    }

    /// A snapshot with no entries.
    pub fn empty(catalog_root: impl Into<PathBuf>) -> Self {
        Self::new(Vec::new(), catalog_root.into())
    }

    /// The entries, sorted by display name.
    pub fn boosters(&self) -> &[Booster] {
        &self.boosters
    }

    /// The local working-directory root this snapshot was built from.
    pub fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }

    pub fn len(&self) -> usize {
        self.boosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosters.is_empty()
    }
}

/// Walks a catalog working copy and assembles [`CatalogSnapshot`]s.
pub struct IndexBuilder<'a> {
    fetcher: &'a dyn RepoFetcher,
    refresh_modules: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(fetcher: &'a dyn RepoFetcher) -> Self {
        Self {
            fetcher,
            refresh_modules: false,
        }
    }

    /// Re-sync companion checkouts that already exist on disk instead of
    /// assuming them current. Off by default to bound per-build network
    /// cost; only the top-level catalog repository is refreshed then.
    pub fn refresh_modules(mut self, refresh: bool) -> Self {
        self.refresh_modules = refresh;
        self
    }

    /// Build a snapshot from the catalog working copy at `catalog_root`.
    ///
    /// Every `.yaml`/`.yml` file at least three levels deep
    /// (`<runtime>/<mission>/<file>`) is treated as a descriptor; the
    /// `modules/` checkout area and `.git` are pruned from the walk.
    /// Entries that fail any step are dropped with a logged cause. Zero
    /// surviving entries still yield a valid, empty snapshot.
    pub fn build(&self, catalog_root: &Path) -> Result<CatalogSnapshot, Error> {
        info!("Indexing catalog at {:?}", catalog_root);
        let modules_root = catalog_root.join(MODULES_DIR);

        let mut boosters: Vec<Booster> = Vec::new();
        let walker = WalkDir::new(catalog_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry, &modules_root));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read catalog entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_descriptor_file(&entry) {
                continue;
            }
            if entry.depth() < 3 {
                warn!(
                    "Skipping {:?}: descriptor is not nested under a runtime/mission directory",
                    entry.path()
                );
                continue;
            }
            match self.index_booster(entry.path(), catalog_root) {
                Ok(booster) => {
                    debug!("Indexed booster '{}'", booster.id());
                    boosters.push(booster);
                }
                Err(e) => warn!("Skipping {:?}: {}", entry.path(), e),
            }
        }

        // Stable: entries with the same display name keep their walk
        // encounter order.
        boosters.sort_by_key(|booster| booster.name());
        info!("Indexed {} boosters", boosters.len());
        Ok(CatalogSnapshot::new(boosters, catalog_root.to_path_buf()))
    }

    fn index_booster(&self, file: &Path, catalog_root: &Path) -> Result<Booster, Error> {
        let coordinates = Coordinates::from_path(file).ok_or_else(|| Error::Descriptor {
            path: file.display().to_string(),
            reason: "cannot derive id, mission and runtime from path".to_string(),
        })?;
        let descriptor = descriptor::parse(file)?;

        let module_path = catalog_root.join(MODULES_DIR).join(&coordinates.id);
        if !module_path.exists() {
            self.fetcher
                .clone_at(&descriptor.repo, &descriptor.git_ref, &module_path)?;
        } else if self.refresh_modules {
            self.fetcher
                .sync(&descriptor.repo, &descriptor.git_ref, &module_path)?;
        }

        let metadata = metadata::resolve(&module_path, &descriptor.descriptor_path)?;
        let long_description = metadata::load_long_description(&module_path);
        Ok(Booster::new(
            coordinates,
            descriptor,
            module_path,
            metadata,
            long_description,
        ))
    }
}

fn is_pruned(entry: &DirEntry, modules_root: &Path) -> bool {
    entry.file_name() == ".git" || entry.path().starts_with(modules_root)
}

fn is_descriptor_file(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.ends_with(".yaml") || name.ends_with(".yml"))
}
