//! Per-entry catalog descriptors.
//!
//! Each booster is declared by one small YAML file inside the catalog
//! repository, at `<runtime>/<mission>/<id>.yaml`:
//!
//! ```yaml
//! repo: https://github.com/example/rest-http
//! ref: master
//! descriptorPath: .openshiftio/booster.yaml
//! ```
//!
//! The file carries only what is needed to reach the companion repository.
//! The id, mission and runtime of the entry are never read from the file:
//! they are derived from the file's own position in the catalog tree (see
//! [`Coordinates::from_path`]).

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::booster::{Mission, Runtime};
use crate::errors::Error;

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;

/// Default location of the metadata descriptor within a companion
/// repository.
pub const DEFAULT_DESCRIPTOR_PATH: &str = ".openshiftio/booster.yaml";

/// The parsed contents of one catalog descriptor file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterDescriptor {
    /// URL of the companion repository.
    pub repo: String,

    /// Branch, tag or commit to pin the companion checkout to.
    #[serde(rename = "ref")]
    pub git_ref: String,

    /// Metadata descriptor location within the companion repository.
    #[serde(default = "default_descriptor_path")]
    pub descriptor_path: String,
}

fn default_descriptor_path() -> String {
    DEFAULT_DESCRIPTOR_PATH.to_string()
}

/// Parse the descriptor file at `path`.
///
/// Malformed documents, missing required fields and invalid repository URLs
/// yield [`Error::Descriptor`]. The caller is expected to skip the file and
/// continue; one bad entry never aborts a rebuild.
pub fn parse(path: &Path) -> Result<BoosterDescriptor, Error> {
    debug!("Parsing descriptor {:?}", path);
    let file = File::open(path).map_err(|e| Error::Descriptor {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let descriptor: BoosterDescriptor =
        serde_yaml::from_reader(file).map_err(|e| Error::Descriptor {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Url::parse(&descriptor.repo).map_err(|e| Error::Descriptor {
        path: path.display().to_string(),
        reason: format!("invalid repository URL '{}': {}", descriptor.repo, e),
    })?;
    Ok(descriptor)
}

/// Identity derived from a descriptor file's position in the catalog tree.
///
/// For a descriptor at `<runtime>/<mission>/<file>.yaml`, the mission is the
/// parent directory name, the runtime the grandparent directory name, and
/// the id the file name with its last `.` extension removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub id: String,
    pub mission: Mission,
    pub runtime: Runtime,
}

impl Coordinates {
    pub fn from_path(descriptor_file: &Path) -> Option<Self> {
        let file_name = descriptor_file.file_name()?.to_str()?;
        let mission = descriptor_file.parent()?.file_name()?.to_str()?;
        let runtime = descriptor_file.parent()?.parent()?.file_name()?.to_str()?;
        Some(Self {
            id: remove_file_extension(file_name).to_string(),
            mission: Mission::new(mission),
            runtime: Runtime::new(runtime),
        })
    }
}

/// Strip the last `.` extension from a file name. A leading dot does not
/// count as an extension separator.
pub(crate) fn remove_file_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    }
}
