//! Change classification engine
//!
//! `classify` compares two public surfaces of one package. `CompatEngine` drives
//! it over whole revisions: package filtering, parallel extraction, package-level
//! additions and removals, and the ignore list.

use crate::canonical::PublicSurface;
use crate::compat::equivalence::Surfaces;
use crate::compat::handlers::compare_declarations;
use crate::compat::severity::Severity;
use crate::compat::types::ClassifiedChange;
use crate::normalize::extract_files;
use crate::raw::{RawFile, RawPackage, RawRevision};
use anyhow::{Context, bail};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::{debug, info};

/// Classifies every difference between two surfaces of the same package.
///
/// Ids only in `before` are breaking removals, ids only in `after` are
/// non-breaking additions, and shared ids are compared by their declaration
/// handler. Unchanged declarations are dropped. The result is sorted by id.
pub fn classify(before: &PublicSurface, after: &PublicSurface) -> Vec<ClassifiedChange> {
    let package = if after.import_path.is_empty() {
        before.import_path.as_str()
    } else {
        after.import_path.as_str()
    };
    let surfaces = Surfaces::new(before, after);

    let ids: Vec<&String> = before
        .declarations
        .keys()
        .chain(after.declarations.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut changes: Vec<ClassifiedChange> = ids
        .par_iter()
        .filter_map(|id| {
            match (before.declarations.get(*id), after.declarations.get(*id)) {
                (Some(b), None) => Some(ClassifiedChange::removed(package, b)),
                (None, Some(a)) => Some(ClassifiedChange::added(package, a)),
                (Some(b), Some(a)) => {
                    let verdict = compare_declarations(b, a, surfaces);
                    (!verdict.is_none()).then(|| ClassifiedChange::changed(package, b, a, verdict))
                }
                (None, None) => None,
            }
        })
        .collect();

    changes.sort_by(|a, b| a.id.cmp(&b.id));
    changes
}

/// Configuration for a revision comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Regexes matched against file names; matching files are not extracted
    #[serde(default)]
    pub exclude_files: Vec<String>,
    /// Regexes matched against import paths; matching packages are skipped
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    /// Declaration ids (`Name`, `Recv.Method`) or `importpath:id` whose changes are dropped
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Skip packages under `internal/` and `vendor/`
    #[serde(default = "default_true")]
    pub skip_internal: bool,
    /// Skip `package main`
    #[serde(default = "default_true")]
    pub skip_main: bool,
    /// Report non-failing changes too
    #[serde(default)]
    pub show_all: bool,
    /// Severities that make a comparison fail
    #[serde(default = "default_fail_on")]
    pub fail_on: Vec<Severity>,
}

fn default_true() -> bool {
    true
}

fn default_fail_on() -> Vec<Severity> {
    vec![Severity::Breaking]
}

impl CheckConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Load configuration from YAML string; the settings live under `apicompat:`
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct ConfigFile {
            apicompat: Option<CheckConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        Ok(config_file.apicompat.unwrap_or_default())
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            exclude_files: Vec::new(),
            exclude_dirs: Vec::new(),
            ignore: Vec::new(),
            skip_internal: true,
            skip_main: true,
            show_all: false,
            fail_on: default_fail_on(),
        }
    }
}

/// Result of comparing two revisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatReport {
    /// All classified changes, grouped by package and sorted by id
    pub changes: Vec<ClassifiedChange>,
    /// Whether any change is breaking
    pub has_breaking_changes: bool,
    /// Number of changes per severity
    pub summary: BTreeMap<String, usize>,
    /// Number of packages present in either revision after filtering
    pub packages_checked: usize,
}

impl CompatReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            has_breaking_changes: false,
            summary: BTreeMap::new(),
            packages_checked: 0,
        }
    }

    /// Add classified changes to the report
    pub fn add_changes(&mut self, new_changes: Vec<ClassifiedChange>) {
        for change in &new_changes {
            *self.summary.entry(change.severity.id().to_string()).or_insert(0) += 1;
            self.has_breaking_changes |= change.severity == Severity::Breaking;
        }
        self.changes.extend(new_changes);
    }

    /// Changes whose severity is one of `severities`
    pub fn with_severity<'a>(
        &'a self,
        severities: &'a [Severity],
    ) -> impl Iterator<Item = &'a ClassifiedChange> + 'a {
        self.changes
            .iter()
            .filter(move |change| severities.contains(&change.severity))
    }

    /// Whether any change has one of the `fail_on` severities
    pub fn fails(&self, fail_on: &[Severity]) -> bool {
        self.with_severity(fail_on).next().is_some()
    }

    /// Renders the report as text: every change when `show_all` is set, otherwise
    /// only the ones with a `fail_on` severity.
    pub fn render_text(&self, show_all: bool, fail_on: &[Severity]) -> String {
        let mut out = String::new();
        for change in &self.changes {
            if show_all || fail_on.contains(&change.severity) {
                out.push_str(&change.to_string());
            }
        }
        if self.changes.is_empty() {
            out.push_str("No changes detected.\n");
        }
        let counts: Vec<String> = self
            .summary
            .iter()
            .map(|(severity, count)| format!("{severity}: {count}"))
            .collect();
        out.push_str(&format!(
            "Summary: {} packages checked, {} changes ({})\n",
            self.packages_checked,
            self.changes.len(),
            counts.join(", ")
        ));
        out
    }
}

impl Default for CompatReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Public surfaces of one revision, keyed by import path
pub type RevisionSurfaces = BTreeMap<String, PublicSurface>;

/// Main engine for comparing revisions
pub struct CompatEngine {
    config: CheckConfig,
    exclude_files: Vec<Regex>,
    exclude_dirs: Vec<Regex>,
}

impl CompatEngine {
    /// Create an engine, compiling the exclusion patterns of `config`
    pub fn new(config: CheckConfig) -> anyhow::Result<Self> {
        let compile = |patterns: &[String]| -> anyhow::Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|p| Regex::new(p).with_context(|| format!("Invalid exclusion pattern '{p}'")))
                .collect()
        };
        Ok(Self {
            exclude_files: compile(&config.exclude_files)?,
            exclude_dirs: compile(&config.exclude_dirs)?,
            config,
        })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    fn skips_package(&self, package: &RawPackage) -> bool {
        let path = package.import_path.as_str();
        let hidden_dir = |dir: &str| {
            path == dir
                || path.starts_with(&format!("{dir}/"))
                || path.contains(&format!("/{dir}/"))
                || path.ends_with(&format!("/{dir}"))
        };

        (self.config.skip_internal && (hidden_dir("internal") || hidden_dir("vendor")))
            || (self.config.skip_main && package.name == "main")
            || self.exclude_dirs.iter().any(|re| re.is_match(path))
    }

    fn kept_files<'a>(&self, package: &'a RawPackage) -> Vec<&'a RawFile> {
        package
            .files
            .iter()
            .filter(|file| !self.exclude_files.iter().any(|re| re.is_match(&file.name)))
            .collect()
    }

    /// Extracts the public surface of every package in `revision` that passes
    /// the filters. Any extraction error aborts the whole revision.
    pub fn extract_revision(&self, revision: &RawRevision) -> anyhow::Result<RevisionSurfaces> {
        let label = revision.revision.as_deref().unwrap_or(".");

        let mut seen = BTreeSet::new();
        for package in &revision.packages {
            if !seen.insert(package.import_path.as_str()) {
                bail!("Revision {label} lists package {} twice", package.import_path);
            }
        }

        let packages: Vec<&RawPackage> = revision
            .packages
            .iter()
            .filter(|package| {
                let skip = self.skips_package(package);
                if skip {
                    debug!(package = %package.import_path, "skipping package");
                }
                !skip
            })
            .collect();

        let surfaces: Vec<PublicSurface> = packages
            .par_iter()
            .map(|package| {
                extract_files(package, &self.kept_files(package)).with_context(|| {
                    format!(
                        "Failed to extract package {} at revision {label}",
                        package.import_path
                    )
                })
            })
            .collect::<anyhow::Result<_>>()?;

        Ok(surfaces
            .into_iter()
            .map(|surface| (surface.import_path.clone(), surface))
            .collect())
    }

    /// Compares two revisions: both are extracted in parallel, then classified
    /// package by package.
    pub fn check(&self, before: &RawRevision, after: &RawRevision) -> anyhow::Result<CompatReport> {
        let start = Instant::now();
        let (before_surfaces, after_surfaces) = rayon::join(
            || self.extract_revision(before),
            || self.extract_revision(after),
        );
        let before_surfaces = before_surfaces.context("Failed to extract the before revision")?;
        let after_surfaces = after_surfaces.context("Failed to extract the after revision")?;
        debug!(elapsed = ?start.elapsed(), "extracted both revisions");

        Ok(self.compare_surfaces(&before_surfaces, &after_surfaces))
    }

    /// Classifies two already extracted revisions.
    pub fn compare_surfaces(&self, before: &RevisionSurfaces, after: &RevisionSurfaces) -> CompatReport {
        let start = Instant::now();
        let mut report = CompatReport::new();

        let paths: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
        report.packages_checked = paths.len();

        for path in paths {
            let changes = match (before.get(path), after.get(path)) {
                (Some(b), Some(a)) => classify(b, a),
                (Some(_), None) => vec![ClassifiedChange::package_removed(path)],
                (None, Some(_)) => vec![ClassifiedChange::package_added(path)],
                (None, None) => Vec::new(),
            };
            let kept: Vec<ClassifiedChange> =
                changes.into_iter().filter(|c| !self.is_ignored(c)).collect();
            report.add_changes(kept);
        }

        debug!(elapsed = ?start.elapsed(), "classified changes");
        info!(
            packages = report.packages_checked,
            changes = report.changes.len(),
            breaking = report.has_breaking_changes,
            "comparison finished"
        );
        report
    }

    fn is_ignored(&self, change: &ClassifiedChange) -> bool {
        if change.id.is_empty() {
            return false;
        }
        self.config.ignore.iter().any(|entry| match entry.split_once(':') {
            Some((package, id)) => package == change.package && id == change.id,
            None => *entry == change.id,
        })
    }
}

impl Default for CompatEngine {
    fn default() -> Self {
        Self {
            config: CheckConfig::default(),
            exclude_files: Vec::new(),
            exclude_dirs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{FuncSignature, NormalizedDeclaration};
    use crate::compat::types::Operation;

    fn func(name: &str, receiver: Option<&str>) -> NormalizedDeclaration {
        NormalizedDeclaration::Function {
            name: name.to_string(),
            receiver: receiver.map(str::to_string),
            signature: FuncSignature::default(),
        }
    }

    fn surface(decls: Vec<NormalizedDeclaration>) -> PublicSurface {
        PublicSurface {
            import_path: "example.com/lib".to_string(),
            declarations: decls.into_iter().map(|d| (d.id(), d)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_sorts_by_id() {
        let before = surface(vec![func("B", None), func("Z", Some("T"))]);
        let after = surface(vec![func("A", None), func("Z", Some("T"))]);

        let changes = classify(&before, &after);
        let ids: Vec<(&str, Operation)> = changes.iter().map(|c| (c.id.as_str(), c.operation)).collect();
        assert_eq!(ids, [("A", Operation::Added), ("B", Operation::Removed)]);
    }

    #[test]
    fn test_config_defaults_without_section() {
        let config = CheckConfig::from_yaml_str("other: {}\n").unwrap();
        assert!(config.skip_internal && config.skip_main && !config.show_all);
        assert_eq!(config.fail_on, vec![Severity::Breaking]);
    }

    #[test]
    fn test_ignore_entries() {
        let engine = CompatEngine::new(CheckConfig {
            ignore: vec!["F".to_string(), "example.com/other:G".to_string()],
            ..Default::default()
        })
        .unwrap();

        let f = ClassifiedChange::removed("example.com/lib", &func("F", None));
        let g = ClassifiedChange::removed("example.com/lib", &func("G", None));
        let other_g = ClassifiedChange::removed("example.com/other", &func("G", None));
        assert!(engine.is_ignored(&f));
        assert!(!engine.is_ignored(&g));
        assert!(engine.is_ignored(&other_g));
    }

    #[test]
    fn test_invalid_exclusion_pattern() {
        let result = CompatEngine::new(CheckConfig {
            exclude_files: vec!["(".to_string()],
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
