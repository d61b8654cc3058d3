//! Error types for catalog indexing and retrieval.
//!
//! The variants map directly onto how failures propagate during a rebuild:
//! a [`Error::Fetch`] raised while synchronizing the top-level catalog
//! repository aborts the whole cycle, while [`Error::Descriptor`] and
//! [`Error::Metadata`] are per-entry conditions that only drop the entry
//! they belong to. Query precondition violations surface as
//! [`Error::InvalidArgument`] without touching any state.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A repository synchronization failed.
    ///
    /// When raised for the top-level catalog repository this aborts the
    /// current rebuild cycle and the previously published snapshot stays
    /// authoritative. When raised for a companion repository it drops only
    /// the entry being indexed.
    #[error("Failed to synchronize repository: {0}")]
    Fetch(#[from] git_fetcher::Error),

    /// A booster descriptor file could not be parsed.
    ///
    /// Covers unreadable files, malformed YAML, missing required fields and
    /// invalid repository URLs. Isolated to the single entry.
    #[error("Failed to parse descriptor {path}: {reason}")]
    Descriptor {
        /// The descriptor file that failed to parse.
        path: String,
        /// Description of what was wrong with it.
        reason: String,
    },

    /// Companion metadata could not be resolved.
    ///
    /// The metadata file inside the companion checkout is missing,
    /// unreadable or unparsable. Isolated to the single entry.
    #[error("Failed to resolve metadata at {path}: {reason}")]
    Metadata {
        /// The metadata file that failed to resolve.
        path: String,
        /// Description of the failure.
        reason: String,
    },

    /// A query was called with arguments that violate its preconditions.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Copying booster content into a target directory failed.
    #[error("Failed to copy {path}: {source}")]
    Copy {
        /// The path that could not be copied.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation outside of content copying failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal failure, such as a panicked background task.
    #[error("Internal error: {reason}")]
    Internal {
        /// Description of the internal failure.
        reason: String,
    },
}
