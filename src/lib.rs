pub mod canonical;
pub mod compat;
pub mod error;
pub mod normalize;
pub mod raw;
pub mod snapshot;

pub use compat::{ClassifiedChange, Severity, classify};
pub use error::ExtractionError;
pub use normalize::extract_public_surface;
pub use snapshot::{Compatibility, Snapshot};

use anyhow::Context;
use compat::{CompatEngine, RevisionSurfaces};
use raw::RawRevision;
use sha2::{Digest, Sha256};

/// Generates a semantic fingerprint for a raw revision document.
///
/// The fingerprint is a SHA-256 hash of the revision's normalized public
/// surfaces. It is insensitive to parameter names, declaration order, grouping,
/// import aliases and anything unexported.
///
/// # Arguments
///
/// * `revision_json` - The JSON document describing one revision.
///
/// # Returns
///
/// A `Result` containing the hex-encoded SHA-256 fingerprint string,
/// or an error if parsing or extraction fails.
pub fn generate_fingerprint(revision_json: &str) -> anyhow::Result<String> {
    let revision = RawRevision::from_json_str(revision_json).context("Failed to parse revision")?;
    let surfaces = CompatEngine::default().extract_revision(&revision)?;
    fingerprint_surfaces(&surfaces)
}

/// Hashes already extracted surfaces the same way `generate_fingerprint` does.
pub fn fingerprint_surfaces(surfaces: &RevisionSurfaces) -> anyhow::Result<String> {
    let json_string = serde_json::to_string_pretty(surfaces)
        .context("Failed to serialize canonical representation to JSON")?;

    let mut hasher = Sha256::new();
    hasher.update(json_string.as_bytes());
    let hash_result = hasher.finalize();

    Ok(format!("{:x}", hash_result))
}
