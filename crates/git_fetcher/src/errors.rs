use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during repository synchronization.
///
/// Each variant carries the remote URL, local path, or ref involved so a
/// failed sync can be reported with enough context to act on. Failures never
/// leave a half-written working copy behind: a failed fresh clone removes the
/// directory it created, and update failures abort before touching the
/// working tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Cloning the remote repository failed.
    ///
    /// Typical causes are an unreachable network, an authentication failure,
    /// or a repository that does not exist.
    #[error("Failed to clone {url}: {source}")]
    Clone {
        /// The remote URL that was being cloned.
        url: String,
        #[source]
        source: git2::Error,
    },

    /// An existing local working copy could not be opened.
    ///
    /// Usually means the directory is not a git working copy or has been
    /// corrupted on disk.
    #[error("Failed to open repository at {path}: {source}")]
    Open {
        /// The local path that failed to open.
        path: String,
        #[source]
        source: git2::Error,
    },

    /// Fetching from the remote failed.
    #[error("Failed to fetch '{reference}' from {url}: {source}")]
    Fetch {
        /// The remote URL that was being fetched.
        url: String,
        /// The ref that was requested.
        reference: String,
        #[source]
        source: git2::Error,
    },

    /// The requested ref does not exist in the repository.
    #[error("Ref '{reference}' not found in {url}")]
    RefNotFound {
        /// The remote URL that was searched.
        url: String,
        /// The ref that could not be resolved.
        reference: String,
    },

    /// Checking out the resolved ref into the working tree failed.
    #[error("Failed to check out '{reference}': {source}")]
    Checkout {
        /// The ref that was being checked out.
        reference: String,
        #[source]
        source: git2::Error,
    },

    /// Updating an existing working copy to the fetched state failed.
    #[error("Failed to update working copy at {path}: {source}")]
    Update {
        /// The local path that was being updated.
        path: String,
        #[source]
        source: git2::Error,
    },
}
