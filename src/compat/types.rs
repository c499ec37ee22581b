//! Core types for change classification

use crate::canonical::{DeclarationId, NormalizedDeclaration};
use crate::compat::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a declaration between the two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Added,
    Removed,
    Changed,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Added => "added",
            Operation::Removed => "removed",
            Operation::Changed => "changed",
        };
        f.write_str(name)
    }
}

/// A single classified difference between two revisions of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    /// Import path of the package the declaration belongs to
    pub package: String,
    /// Declaration id; empty for whole-package changes
    pub id: DeclarationId,
    pub operation: Operation,
    pub severity: Severity,
    /// Human-readable explanation of the verdict
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<NormalizedDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<NormalizedDeclaration>,
}

impl ClassifiedChange {
    pub fn added(package: &str, decl: &NormalizedDeclaration) -> Self {
        Self {
            package: package.to_string(),
            id: decl.id(),
            operation: Operation::Added,
            severity: Severity::NonBreaking,
            reason: "declaration added".to_string(),
            before: None,
            after: Some(decl.clone()),
        }
    }

    pub fn removed(package: &str, decl: &NormalizedDeclaration) -> Self {
        Self {
            package: package.to_string(),
            id: decl.id(),
            operation: Operation::Removed,
            severity: Severity::Breaking,
            reason: "declaration removed".to_string(),
            before: Some(decl.clone()),
            after: None,
        }
    }

    pub fn changed(
        package: &str,
        before: &NormalizedDeclaration,
        after: &NormalizedDeclaration,
        verdict: Verdict,
    ) -> Self {
        Self {
            package: package.to_string(),
            id: before.id(),
            operation: Operation::Changed,
            severity: verdict.severity,
            reason: verdict.reason,
            before: Some(before.clone()),
            after: Some(after.clone()),
        }
    }

    pub fn package_added(package: &str) -> Self {
        Self::package_level(package, Operation::Added, Severity::NonBreaking, "package added")
    }

    pub fn package_removed(package: &str) -> Self {
        Self::package_level(package, Operation::Removed, Severity::Breaking, "package removed")
    }

    fn package_level(package: &str, operation: Operation, severity: Severity, reason: &str) -> Self {
        Self {
            package: package.to_string(),
            id: DeclarationId::new(),
            operation,
            severity,
            reason: reason.to_string(),
            before: None,
            after: None,
        }
    }
}

impl fmt::Display for ClassifiedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "{}: ", self.package)?;
        } else {
            write!(f, "{}: {}: ", self.package, self.id)?;
        }
        writeln!(f, "{} ({} - {})", self.operation, self.severity, self.reason)?;
        if let Some(before) = &self.before {
            writeln!(f, "\t{before}")?;
        }
        if let Some(after) = &self.after {
            writeln!(f, "\t{after}")?;
        }
        Ok(())
    }
}

/// Outcome of comparing two declarations or type descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub severity: Severity,
    pub reason: String,
}

impl Verdict {
    pub fn none() -> Self {
        Self {
            severity: Severity::None,
            reason: String::new(),
        }
    }

    pub fn non_breaking(reason: &str) -> Self {
        Self {
            severity: Severity::NonBreaking,
            reason: reason.to_string(),
        }
    }

    pub fn unknown(reason: &str) -> Self {
        Self {
            severity: Severity::Unknown,
            reason: reason.to_string(),
        }
    }

    pub fn breaking(reason: &str) -> Self {
        Self {
            severity: Severity::Breaking,
            reason: reason.to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.severity == Severity::None
    }

    pub fn is_breaking(&self) -> bool {
        self.severity == Severity::Breaking
    }

    /// Keeps the more severe of the two; on a tie the first reason wins.
    pub fn merge(self, other: Verdict) -> Verdict {
        if other.severity > self.severity {
            other
        } else {
            self
        }
    }
}
