//! Shared fixtures for catalog tests: a scripted repository fetcher and
//! helpers that lay out catalog trees on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use git_fetcher::RepoFetcher;

use crate::booster::Booster;
use crate::descriptor::{BoosterDescriptor, Coordinates, DEFAULT_DESCRIPTOR_PATH};

pub(crate) const FIXTURE_REPO: &str = "https://github.com/example/fixture.git";

/// Scripted [`RepoFetcher`] that materializes fixture content on disk
/// instead of touching the network.
pub(crate) struct FixtureFetcher {
    /// Files written into the catalog working copy by `sync`, as
    /// (relative path, content) pairs.
    catalog_files: Vec<(String, String)>,
    /// Files written into the catalog working copy by `sync` from the
    /// second call on, simulating remote changes between refresh cycles.
    later_catalog_files: Vec<(String, String)>,
    clone_calls: AtomicUsize,
    sync_calls: AtomicUsize,
    fail_clone: bool,
    fail_sync: bool,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self {
            catalog_files: Vec::new(),
            later_catalog_files: Vec::new(),
            clone_calls: AtomicUsize::new(0),
            sync_calls: AtomicUsize::new(0),
            fail_clone: false,
            fail_sync: false,
        }
    }

    pub fn with_catalog(files: Vec<(String, String)>) -> Self {
        Self {
            catalog_files: files,
            ..Self::new()
        }
    }

    pub fn with_later_catalog(mut self, files: Vec<(String, String)>) -> Self {
        self.later_catalog_files = files;
        self
    }

    pub fn failing_clone() -> Self {
        Self {
            fail_clone: true,
            ..Self::new()
        }
    }

    pub fn failing_sync() -> Self {
        Self {
            fail_sync: true,
            ..Self::new()
        }
    }

    pub fn clone_count(&self) -> usize {
        self.clone_calls.load(Ordering::SeqCst)
    }

    pub fn sync_count(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }
}

impl RepoFetcher for FixtureFetcher {
    fn clone_at(&self, url: &str, reference: &str, dest: &Path) -> Result<(), git_fetcher::Error> {
        if self.fail_clone {
            return Err(git_fetcher::Error::RefNotFound {
                url: url.to_string(),
                reference: reference.to_string(),
            });
        }
        self.clone_calls.fetch_add(1, Ordering::SeqCst);
        fs::create_dir_all(dest.join(".openshiftio")).unwrap();
        fs::write(
            dest.join(DEFAULT_DESCRIPTOR_PATH),
            "description: cloned fixture\n",
        )
        .unwrap();
        fs::write(dest.join("app.py"), "print('fixture')\n").unwrap();
        Ok(())
    }

    fn sync(&self, url: &str, reference: &str, local_path: &Path) -> Result<(), git_fetcher::Error> {
        if self.fail_sync {
            return Err(git_fetcher::Error::Fetch {
                url: url.to_string(),
                reference: reference.to_string(),
                source: git2_unreachable(),
            });
        }
        let call = self.sync_calls.fetch_add(1, Ordering::SeqCst) + 1;
        fs::create_dir_all(local_path).unwrap();
        for (relative, content) in &self.catalog_files {
            write_relative(local_path, relative, content);
        }
        if call >= 2 {
            for (relative, content) in &self.later_catalog_files {
                write_relative(local_path, relative, content);
            }
        }
        Ok(())
    }
}

fn git2_unreachable() -> git2::Error {
    git2::Error::from_str("network unreachable")
}

fn write_relative(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A minimal valid descriptor body pointing at the fixture repository.
pub(crate) fn descriptor_body() -> String {
    format!("repo: {FIXTURE_REPO}\nref: master\n")
}

/// Write a catalog descriptor at `<root>/<runtime>/<mission>/<id>.yaml`.
pub(crate) fn write_descriptor(root: &Path, runtime: &str, mission: &str, id: &str, body: &str) {
    write_relative(root, &format!("{runtime}/{mission}/{id}.yaml"), body);
}

/// Write companion metadata at `modules/<id>/.openshiftio/booster.yaml`.
pub(crate) fn write_module_metadata(root: &Path, id: &str, yaml: &str) {
    write_relative(
        root,
        &format!("modules/{id}/{DEFAULT_DESCRIPTOR_PATH}"),
        yaml,
    );
}

/// Assemble a booster directly, for store and model tests.
pub(crate) fn make_booster(
    runtime: &str,
    mission: &str,
    id: &str,
    metadata_yaml: &str,
    content_path: impl Into<PathBuf>,
) -> Booster {
    let coordinates = Coordinates {
        id: id.to_string(),
        mission: mission.into(),
        runtime: runtime.into(),
    };
    let descriptor = BoosterDescriptor {
        repo: FIXTURE_REPO.to_string(),
        git_ref: "master".to_string(),
        descriptor_path: DEFAULT_DESCRIPTOR_PATH.to_string(),
    };
    let metadata = serde_yaml::from_str(metadata_yaml).unwrap();
    Booster::new(coordinates, descriptor, content_path.into(), metadata, None)
}
