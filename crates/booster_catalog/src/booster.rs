//! The booster data model.
//!
//! A [`Booster`] is one catalog entry: a ready-made project template for a
//! specific ([`Mission`], [`Runtime`]) pair, backed by a companion git
//! repository pinned to a declared ref. Boosters are assembled by the index
//! builder and are immutable once constructed; readers only ever see fully
//! resolved instances.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::descriptor::{BoosterDescriptor, Coordinates};

#[cfg(test)]
#[path = "booster_tests.rs"]
mod tests;

/// Placeholder returned by [`Booster::description`] when the metadata
/// carries no `description` entry.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// A capability or application pattern category, such as `rest-api`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mission(String);

impl Mission {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mission {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A language or platform target, such as `spring-boot` or `vert.x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Runtime(String);

impl Runtime {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Runtime {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One catalog entry.
///
/// Identity is the `(id, mission, runtime, source_repository, source_ref)`
/// tuple; equality and hashing ignore the resolved metadata and content
/// location. All fields are fixed at construction time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booster {
    id: String,
    mission: Mission,
    runtime: Runtime,
    source_repository: String,
    source_ref: String,
    descriptor_path: String,
    content_path: PathBuf,
    metadata: Mapping,
    long_description: Option<String>,
}

impl Booster {
    pub(crate) fn new(
        coordinates: Coordinates,
        descriptor: BoosterDescriptor,
        content_path: PathBuf,
        metadata: Mapping,
        long_description: Option<String>,
    ) -> Self {
        Self {
            id: coordinates.id,
            mission: coordinates.mission,
            runtime: coordinates.runtime,
            source_repository: descriptor.repo,
            source_ref: descriptor.git_ref,
            descriptor_path: descriptor.descriptor_path,
            content_path,
            metadata,
            long_description,
        }
    }

    /// Unique identifier, derived from the descriptor file name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// URL of the companion repository holding the template content.
    pub fn source_repository(&self) -> &str {
        &self.source_repository
    }

    /// Branch, tag or commit the companion repository is pinned to.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    /// Path of the metadata descriptor within the companion repository.
    pub fn descriptor_path(&self) -> &str {
        &self.descriptor_path
    }

    /// Local checkout of the companion repository content.
    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// The resolved metadata mapping, in document order.
    pub fn metadata(&self) -> &Mapping {
        &self.metadata
    }

    /// Long-form description text, when the companion repository ships one.
    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    /// Display name: the metadata `name` entry, falling back to the id.
    pub fn name(&self) -> String {
        self.metadata_string("name")
            .unwrap_or_else(|| self.id.clone())
    }

    /// Short description: the metadata `description` entry, falling back to
    /// [`DEFAULT_DESCRIPTION`].
    pub fn description(&self) -> String {
        self.metadata_string("description")
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }

    fn metadata_string(&self, key: &str) -> Option<String> {
        let key = Value::String(key.to_string());
        self.metadata
            .get(&key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

impl PartialEq for Booster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.mission == other.mission
            && self.runtime == other.runtime
            && self.source_repository == other.source_repository
            && self.source_ref == other.source_ref
    }
}

impl Eq for Booster {}

impl Hash for Booster {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.mission.hash(state);
        self.runtime.hash(state);
        self.source_repository.hash(state);
        self.source_ref.hash(state);
    }
}
