//! Git repository synchronization for catalog indexing.
//!
//! This crate wraps libgit2 behind two operations the indexing engine needs:
//!
//! - [`sync`] - clone a remote repository on first use, bring the existing
//!   working copy up to date on every use after that (pull semantics: fetch
//!   plus fast-forward, falling back to a hard reset when the local history
//!   has diverged from the remote).
//! - [`clone_at`] - clone a remote repository and pin the working tree to
//!   exactly the requested ref with a detached checkout, so the content on
//!   disk matches the declared revision regardless of later remote changes.
//!
//! Both operations fail fast: a failed fresh clone removes the directory it
//! created, and a failed update leaves the existing working tree untouched.
//!
//! The [`RepoFetcher`] trait is the seam used by the index builder so that
//! catalog indexing can be exercised against scripted fixtures without a
//! network. [`GitFetcher`] is the production implementation.

use std::fs;
use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, FetchOptions, ObjectType, Repository};
use tracing::{debug, error, info};

mod errors;
pub use errors::Error;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Abstraction over repository synchronization.
///
/// The index builder takes a `&dyn RepoFetcher` so tests can substitute a
/// fixture-backed implementation. All methods are blocking; callers that run
/// on an async runtime execute them under `spawn_blocking`.
pub trait RepoFetcher: Send + Sync {
    /// Clone `url` into `dest` and pin the working tree to `reference` with a
    /// detached checkout.
    fn clone_at(&self, url: &str, reference: &str, dest: &Path) -> Result<(), Error>;

    /// Clone `url` at `reference` into `local_path` on first use; update the
    /// existing working copy to the latest remote state of `reference`
    /// otherwise.
    fn sync(&self, url: &str, reference: &str, local_path: &Path) -> Result<(), Error>;
}

/// [`RepoFetcher`] backed by libgit2.
#[derive(Debug, Default, Clone)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl RepoFetcher for GitFetcher {
    fn clone_at(&self, url: &str, reference: &str, dest: &Path) -> Result<(), Error> {
        clone_at(url, reference, dest)
    }

    fn sync(&self, url: &str, reference: &str, local_path: &Path) -> Result<(), Error> {
        sync(url, reference, local_path)
    }
}

/// Synchronize `local_path` with `reference` of the remote repository at
/// `url`.
///
/// Performs a full clone when `local_path` does not exist yet, and a
/// fetch-and-fast-forward update when it does. Calling this again with no
/// intervening remote changes is a no-op besides the network round-trip.
///
/// ## Errors
///
/// Returns an [`Error`] when the remote is unreachable, the ref does not
/// exist, or the local working copy cannot be opened or updated. The on-disk
/// state prior to the call is preserved on failure.
pub fn sync(url: &str, reference: &str, local_path: &Path) -> Result<(), Error> {
    if local_path.exists() {
        update(url, reference, local_path)
    } else {
        info!("Cloning {} at '{}' into {:?}", url, reference, local_path);
        clone_tracking(url, reference, local_path)
    }
}

/// Clone `url` into `dest` and detach HEAD at exactly `reference`.
///
/// The checkout is pinned: `reference` is resolved to a commit (remote
/// branch, tag, or commit id, in that order) and the working tree is left in
/// detached-HEAD state at that commit.
///
/// ## Errors
///
/// Returns an [`Error`] when the clone fails or `reference` cannot be
/// resolved in the cloned repository. A failed call removes the directory it
/// created.
pub fn clone_at(url: &str, reference: &str, dest: &Path) -> Result<(), Error> {
    info!("Cloning {} pinned at '{}' into {:?}", url, reference, dest);

    let mut fetch_options = FetchOptions::new();
    fetch_options.download_tags(AutotagOption::All);

    let repo = RepoBuilder::new()
        .fetch_options(fetch_options)
        .clone(url, dest)
        .map_err(|e| {
            error!("Failed to clone {}: {}", url, e);
            remove_failed_clone(dest);
            Error::Clone {
                url: url.to_string(),
                source: e,
            }
        })?;

    if let Err(e) = pin_to_reference(&repo, url, reference) {
        remove_failed_clone(dest);
        return Err(e);
    }
    Ok(())
}

fn clone_tracking(url: &str, reference: &str, dest: &Path) -> Result<(), Error> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.download_tags(AutotagOption::All);

    RepoBuilder::new()
        .branch(reference)
        .fetch_options(fetch_options)
        .clone(url, dest)
        .map_err(|e| {
            error!("Failed to clone {} at '{}': {}", url, reference, e);
            remove_failed_clone(dest);
            Error::Clone {
                url: url.to_string(),
                source: e,
            }
        })?;
    Ok(())
}

/// Best effort removal of a partially created clone directory.
fn remove_failed_clone(dest: &Path) {
    if dest.exists() {
        if let Err(e) = fs::remove_dir_all(dest) {
            error!("Failed to remove partial clone at {:?}: {}", dest, e);
        }
    }
}

fn pin_to_reference(repo: &Repository, url: &str, reference: &str) -> Result<(), Error> {
    let target = resolve_commit(repo, reference).ok_or_else(|| Error::RefNotFound {
        url: url.to_string(),
        reference: reference.to_string(),
    })?;

    debug!("Pinning working tree to {} ({})", reference, target.id());
    repo.checkout_tree(&target, Some(CheckoutBuilder::new().force()))
        .map_err(|e| Error::Checkout {
            reference: reference.to_string(),
            source: e,
        })?;
    repo.set_head_detached(target.id())
        .map_err(|e| Error::Checkout {
            reference: reference.to_string(),
            source: e,
        })
}

/// Resolve `reference` to a commit, trying remote-tracking branches, tags,
/// and raw revspecs (commit ids) in that order.
fn resolve_commit<'r>(repo: &'r Repository, reference: &str) -> Option<git2::Object<'r>> {
    let candidates = [
        format!("refs/remotes/origin/{reference}"),
        format!("refs/tags/{reference}"),
        reference.to_string(),
    ];
    for candidate in &candidates {
        if let Ok(object) = repo.revparse_single(candidate) {
            if let Ok(commit) = object.peel(ObjectType::Commit) {
                return Some(commit);
            }
        }
    }
    None
}

fn update(url: &str, reference: &str, local_path: &Path) -> Result<(), Error> {
    debug!("Updating working copy at {:?} from {}", local_path, url);

    let repo = Repository::open(local_path).map_err(|e| {
        error!("Failed to open repository at {:?}: {}", local_path, e);
        Error::Open {
            path: local_path.display().to_string(),
            source: e,
        }
    })?;

    let mut remote = repo.find_remote("origin").map_err(|e| Error::Open {
        path: local_path.display().to_string(),
        source: e,
    })?;

    let mut fetch_options = FetchOptions::new();
    fetch_options.download_tags(AutotagOption::All);
    remote
        .fetch(&[reference], Some(&mut fetch_options), None)
        .map_err(|e| {
            error!("Failed to fetch '{}' from {}: {}", reference, url, e);
            Error::Fetch {
                url: url.to_string(),
                reference: reference.to_string(),
                source: e,
            }
        })?;
    drop(remote);

    let map_update = |e: git2::Error| Error::Update {
        path: local_path.display().to_string(),
        source: e,
    };

    let fetch_head = repo.find_reference("FETCH_HEAD").map_err(map_update)?;
    let fetched = repo
        .reference_to_annotated_commit(&fetch_head)
        .map_err(map_update)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched]).map_err(map_update)?;

    if analysis.is_up_to_date() {
        debug!("Working copy at {:?} already up to date", local_path);
        return Ok(());
    }

    if analysis.is_fast_forward() {
        let refname = format!("refs/heads/{reference}");
        if let Ok(mut branch_ref) = repo.find_reference(&refname) {
            debug!("Fast-forwarding {} to {}", refname, fetched.id());
            branch_ref
                .set_target(fetched.id(), "fast-forward")
                .map_err(map_update)?;
            repo.set_head(&refname).map_err(map_update)?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))
                .map_err(map_update)?;
            return Ok(());
        }
    }

    // The working copy is a read-only mirror of the remote; a diverged or
    // detached local state follows the fetched commit.
    info!(
        "Resetting working copy at {:?} to fetched commit {}",
        local_path,
        fetched.id()
    );
    let target = repo.find_object(fetched.id(), None).map_err(map_update)?;
    repo.reset(&target, git2::ResetType::Hard, None)
        .map_err(map_update)
}
