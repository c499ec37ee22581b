//! Change classification for Go public surfaces
//!
//! This module compares the normalized surfaces of two revisions and classifies
//! every difference as non-breaking, unknown or breaking.

pub mod engine;
pub mod equivalence;
pub mod fields;
pub mod handlers;
pub mod severity;
pub mod types;

pub use engine::{CheckConfig, CompatEngine, CompatReport, RevisionSurfaces, classify};
pub use equivalence::{Surfaces, equivalent};
pub use severity::Severity;
pub use types::{ClassifiedChange, Operation, Verdict};
