//! Provides the high-level Snapshot API for comparing revisions of a Go module.

use crate::compat::{CheckConfig, CompatEngine, CompatReport, RevisionSurfaces};
use crate::fingerprint_surfaces;
use crate::raw::RawRevision;

/// The result of a compatibility comparison between two revisions.
#[derive(Debug, PartialEq, Eq)]
pub enum Compatibility {
    /// The public surfaces are identical.
    Green,
    /// The new revision is backward-compatible with the old one (e.g., a function was added).
    Yellow,
    /// The new revision can break existing callers (e.g., a struct field was removed).
    Red,
}

/// One revision's extracted public surface together with its fingerprint.
pub struct Snapshot {
    /// Revision token the snapshot was taken from, "." for the working tree.
    pub revision: String,
    /// SHA-256 over the normalized surfaces.
    pub fingerprint: String,
    pub surfaces: RevisionSurfaces,
}

impl Snapshot {
    /// Creates a `Snapshot` from a raw revision document (JSON) with default filtering.
    pub fn try_from(content: &str) -> anyhow::Result<Self> {
        let revision = RawRevision::from_json_str(content)?;
        Self::from_revision(&revision, &CompatEngine::default())
    }

    /// Extracts `revision` with the filters configured on `engine`.
    pub fn from_revision(revision: &RawRevision, engine: &CompatEngine) -> anyhow::Result<Self> {
        let surfaces = engine.extract_revision(revision)?;
        let fingerprint = fingerprint_surfaces(&surfaces)?;
        Ok(Snapshot {
            revision: revision.revision.clone().unwrap_or_else(|| ".".to_string()),
            fingerprint,
            surfaces,
        })
    }

    /// Compares this `Snapshot` (the "old" revision) with `new_snapshot`.
    pub fn compare_with(&self, new_snapshot: &Snapshot) -> Compatibility {
        if self.fingerprint == new_snapshot.fingerprint {
            return Compatibility::Green;
        }

        let report = self.check_changes(new_snapshot);
        if report.has_breaking_changes {
            Compatibility::Red
        } else if report.changes.is_empty() {
            Compatibility::Green
        } else {
            Compatibility::Yellow
        }
    }

    /// Classifies every change between this snapshot and `new_snapshot`.
    pub fn check_changes(&self, new_snapshot: &Snapshot) -> CompatReport {
        CompatEngine::default().compare_surfaces(&self.surfaces, &new_snapshot.surfaces)
    }

    /// Like `check_changes`, with the ignore list of `config` applied.
    pub fn check_changes_with_config(
        &self,
        new_snapshot: &Snapshot,
        config: &CheckConfig,
    ) -> anyhow::Result<CompatReport> {
        let engine = CompatEngine::new(config.clone())?;
        Ok(engine.compare_surfaces(&self.surfaces, &new_snapshot.surfaces))
    }
}
