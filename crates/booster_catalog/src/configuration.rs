//! Catalog source configuration.
//!
//! Where the catalog comes from, which ref to track, and how often to
//! re-index. Values are opaque strings handed to the repository fetcher;
//! nothing is parsed further here. Resolution order is defaults, then the
//! `BOOSTER_HUB_*` environment variables, then explicit setters.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// Catalog repository indexed when nothing else is configured.
pub const DEFAULT_CATALOG_REPOSITORY: &str =
    "https://github.com/openshiftio/booster-catalog.git";

/// Catalog ref tracked by default.
pub const DEFAULT_CATALOG_REF: &str = "master";

/// Environment variable overriding the catalog repository URL.
pub const CATALOG_REPOSITORY_ENV: &str = "BOOSTER_HUB_CATALOG_REPOSITORY";

/// Environment variable overriding the catalog ref.
pub const CATALOG_REF_ENV: &str = "BOOSTER_HUB_CATALOG_REF";

/// Environment variable setting the re-index period in minutes. `0` or
/// absent means index once and never refresh.
pub const INDEX_PERIOD_ENV: &str = "BOOSTER_HUB_INDEX_PERIOD";

/// Environment variable enabling per-entry refresh of companion checkouts
/// that already exist on disk.
pub const REFRESH_MODULES_ENV: &str = "BOOSTER_HUB_REFRESH_MODULES";

/// Configuration for a [`crate::CatalogService`].
///
/// The catalog root is scratch space for clones; its lifecycle (creation
/// and cleanup) belongs to the embedding process, not to the engine.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    repository: String,
    reference: String,
    index_period: Option<Duration>,
    refresh_modules: bool,
    catalog_root: PathBuf,
}

impl CatalogConfig {
    /// A configuration with all defaults, rooted at `catalog_root`.
    pub fn new(catalog_root: impl Into<PathBuf>) -> Self {
        Self {
            repository: DEFAULT_CATALOG_REPOSITORY.to_string(),
            reference: DEFAULT_CATALOG_REF.to_string(),
            index_period: None,
            refresh_modules: false,
            catalog_root: catalog_root.into(),
        }
    }

    /// A configuration from the `BOOSTER_HUB_*` environment variables,
    /// falling back to defaults for anything unset. Unparsable values are
    /// logged and ignored.
    pub fn from_env(catalog_root: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(catalog_root);
        if let Ok(repository) = env::var(CATALOG_REPOSITORY_ENV) {
            if !repository.is_empty() {
                config.repository = repository;
            }
        }
        if let Ok(reference) = env::var(CATALOG_REF_ENV) {
            if !reference.is_empty() {
                config.reference = reference;
            }
        }
        if let Ok(period) = env::var(INDEX_PERIOD_ENV) {
            match period.parse::<u64>() {
                Ok(minutes) => config = config.with_index_period_minutes(minutes),
                Err(_) => warn!("Ignoring unparsable {}={:?}", INDEX_PERIOD_ENV, period),
            }
        }
        if let Ok(refresh) = env::var(REFRESH_MODULES_ENV) {
            config.refresh_modules = matches!(refresh.as_str(), "1" | "true" | "yes");
        }
        config
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Set the re-index period. `None` or a zero duration disables
    /// periodic refresh (index once at startup).
    pub fn with_index_period(mut self, period: Option<Duration>) -> Self {
        self.index_period = period.filter(|period| !period.is_zero());
        self
    }

    pub fn with_index_period_minutes(self, minutes: u64) -> Self {
        self.with_index_period(Some(Duration::from_secs(minutes * 60)))
    }

    pub fn with_refresh_modules(mut self, refresh: bool) -> Self {
        self.refresh_modules = refresh;
        self
    }

    /// URL of the catalog repository.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Ref of the catalog repository to track.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// How often to rebuild the index; `None` means build once.
    pub fn index_period(&self) -> Option<Duration> {
        self.index_period
    }

    /// Whether existing companion checkouts are re-synced on every build.
    pub fn refresh_modules(&self) -> bool {
        self.refresh_modules
    }

    /// Local working directory the catalog is cloned into.
    pub fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }
}
