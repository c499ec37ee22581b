//! Severity levels assigned to classified changes

use serde::{Deserialize, Serialize};

/// How a change affects existing callers, ordered from harmless to breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Nothing observable changed
    None,
    /// The declaration changed but no valid caller can break
    NonBreaking,
    /// The type could not be determined statically; needs a human look
    Unknown,
    /// Previously valid caller code may stop compiling
    Breaking,
}

impl Severity {
    /// Get the string identifier for this severity
    pub fn id(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::NonBreaking => "nonBreaking",
            Severity::Unknown => "unknown",
            Severity::Breaking => "breaking",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Severity::None => "No interface-visible change.",
            Severity::NonBreaking => "Change that cannot break any valid caller.",
            Severity::Unknown => "Change whose impact cannot be determined without type inference.",
            Severity::Breaking => "Change that can make previously valid caller code fail.",
        }
    }

    /// Parse severity from its identifier; `non-breaking` and `non_breaking` are accepted too.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Severity::None),
            "nonbreaking" | "non-breaking" | "non_breaking" => Some(Severity::NonBreaking),
            "unknown" => Some(Severity::Unknown),
            "breaking" => Some(Severity::Breaking),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Severity::None,
            Severity::NonBreaking,
            Severity::Unknown,
            Severity::Breaking,
        ]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown severity: {s}"))
    }
}
