//! # Booster Catalog
//!
//! Indexing and retrieval engine for "booster" project templates: catalog
//! entries identified by a (mission, runtime) pair, declared in a remote
//! git catalog repository and backed by per-entry companion repositories.
//!
//! ## Overview
//!
//! A rebuild cycle runs through the following steps:
//! 1. Synchronize the catalog repository into a local working directory
//!    (clone on first use, pull afterwards) via the `git_fetcher` crate
//! 2. Walk the working copy for per-booster YAML descriptors
//! 3. Clone each entry's companion repository pinned to its declared ref
//!    (first build only; existing checkouts are reused)
//! 4. Resolve companion metadata and optional long description
//! 5. Assemble the surviving entries into an immutable, sorted
//!    [`CatalogSnapshot`] and publish it atomically to the [`CatalogStore`]
//!
//! Readers query the store concurrently with rebuilds and always observe
//! the last successfully published snapshot; a failed rebuild changes
//! nothing. Entries are independent: one bad descriptor drops that entry,
//! never the build.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use booster_catalog::{CatalogConfig, CatalogService};
//! use git_fetcher::GitFetcher;
//!
//! # async fn example() -> Result<(), booster_catalog::Error> {
//! let config = CatalogConfig::from_env("/tmp/booster-catalog")
//!     .with_index_period_minutes(30);
//! let service = CatalogService::start(config, Arc::new(GitFetcher::new())).await?;
//!
//! for mission in service.missions() {
//!     println!("{mission}");
//!     for runtime in service.runtimes(&mission) {
//!         println!("  {runtime}");
//!     }
//! }
//!
//! service.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod booster;
pub mod configuration;
#[cfg(test)]
pub(crate) mod test_support;
pub mod descriptor;
pub mod errors;
pub mod index;
pub mod metadata;
pub mod service;
pub mod store;

pub use booster::{Booster, Mission, Runtime, DEFAULT_DESCRIPTION};
pub use configuration::CatalogConfig;
pub use descriptor::{BoosterDescriptor, Coordinates, DEFAULT_DESCRIPTOR_PATH};
pub use errors::Error;
pub use index::{CatalogSnapshot, IndexBuilder, MODULES_DIR};
pub use service::CatalogService;
pub use store::{is_excluded_name, CatalogStore, EXCLUDED_PROJECT_FILES};
