use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog operation failed; the underlying error says how.
    #[error(transparent)]
    Catalog(#[from] booster_catalog::Error),

    /// The catalog has no entry for the requested pair.
    #[error("No booster found for mission '{mission}' and runtime '{runtime}'")]
    NoSuchBooster { mission: String, runtime: String },

    /// Serializing a booster for `--json` output failed.
    #[error("Failed to serialize booster: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
