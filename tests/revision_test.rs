//! Whole-revision comparison: package handling, filtering, reports and snapshots.

mod common;

use api_compat::compat::{CheckConfig, CompatEngine, Operation, Severity};
use api_compat::raw::RawRevision;
use api_compat::{Compatibility, Snapshot};
use common::*;
use serde_json::json;
use std::fs;

fn read_revision(file_name: &str) -> RawRevision {
    let content = fs::read_to_string(format!("tests/data/{file_name}")).expect("Could not read test revision");
    RawRevision::from_json_str(&content).unwrap()
}

#[test]
fn test_package_removed_and_added() {
    let before = revision(vec![
        package_with("example.com/a", "a", vec![func_decl("F", vec![], None)], json!({})),
        package_with("example.com/gone", "gone", vec![func_decl("G", vec![], None)], json!({})),
    ]);
    let after = revision(vec![
        package_with("example.com/a", "a", vec![func_decl("F", vec![], None)], json!({})),
        package_with("example.com/new", "new", vec![func_decl("N", vec![], None)], json!({})),
    ]);

    let report = CompatEngine::default().check(&before, &after).unwrap();

    assert_eq!(report.packages_checked, 3);
    assert_eq!(report.changes.len(), 2);
    assert_eq!(report.changes[0].package, "example.com/gone");
    assert_eq!(report.changes[0].id, "");
    assert_eq!(report.changes[0].operation, Operation::Removed);
    assert_eq!(report.changes[0].reason, "package removed");
    assert_eq!(report.changes[1].package, "example.com/new");
    assert_eq!(report.changes[1].severity, Severity::NonBreaking);
    assert!(report.has_breaking_changes);
}

#[test]
fn test_internal_vendor_and_main_packages_are_skipped() {
    let before = revision(vec![
        package_with("example.com/internal/x", "x", vec![func_decl("F", vec![], None)], json!({})),
        package_with("example.com/vendor/y", "y", vec![func_decl("F", vec![], None)], json!({})),
        package_with("example.com/cmd/tool", "main", vec![func_decl("F", vec![], None)], json!({})),
    ]);
    let after = revision(vec![]);

    let report = CompatEngine::default().check(&before, &after).unwrap();
    assert!(report.changes.is_empty());
    assert_eq!(report.packages_checked, 0);

    let engine = CompatEngine::new(CheckConfig {
        skip_internal: false,
        skip_main: false,
        ..Default::default()
    })
    .unwrap();
    let report = engine.check(&before, &after).unwrap();
    assert_eq!(report.changes.len(), 3);
}

#[test]
fn test_exclude_patterns() {
    let two_files = |extra: serde_json::Value| -> api_compat::raw::RawPackage {
        serde_json::from_value(json!({
            "import_path": PKG,
            "name": "lib",
            "files": [
                { "name": "lib.go", "decls": [func_decl("F", vec![], None)] },
                { "name": "zz_generated.go", "decls": [extra] },
            ],
        }))
        .unwrap()
    };
    let before = revision(vec![
        two_files(func_decl("Generated", vec![], None)),
        package_with("example.com/lib/testutil", "testutil", vec![func_decl("H", vec![], None)], json!({})),
    ]);
    let after = revision(vec![two_files(func_decl("Other", vec![], None))]);

    let engine = CompatEngine::new(CheckConfig {
        exclude_files: vec!["^zz_generated".to_string()],
        exclude_dirs: vec!["/testutil$".to_string()],
        ..Default::default()
    })
    .unwrap();

    let report = engine.check(&before, &after).unwrap();
    assert!(report.changes.is_empty(), "unexpected changes: {:?}", report.changes);
}

#[test]
fn test_ignore_list_drops_changes() {
    let before = revision(vec![package(vec![func_decl("Old", vec![], None), func_decl("Legacy", vec![], None)])]);
    let after = revision(vec![package(vec![])]);

    let engine = CompatEngine::new(CheckConfig {
        ignore: vec!["Old".to_string(), format!("{PKG}:Legacy")],
        ..Default::default()
    })
    .unwrap();

    let report = engine.check(&before, &after).unwrap();
    assert!(report.changes.is_empty());
    assert!(!report.has_breaking_changes);
}

#[test]
fn test_extraction_error_aborts_revision() {
    let before = revision(vec![package(vec![json!({ "bad": { "source": "func (" } })])]);
    let after = revision(vec![package(vec![])]);

    let err = CompatEngine::default().check(&before, &after).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("before revision"), "{message}");
    assert!(message.contains(PKG), "{message}");
    assert!(message.contains("unsupported declaration in lib.go"), "{message}");
}

#[test]
fn test_duplicate_package_is_rejected() {
    let before = revision(vec![package(vec![]), package(vec![])]);
    assert!(CompatEngine::default().extract_revision(&before).is_err());
}

#[test]
fn test_fixture_report() {
    let before = read_revision("before.json");
    let after = read_revision("after.json");

    let report = CompatEngine::default().check(&before, &after).unwrap();
    let summary: Vec<(&str, &str, Operation, Severity)> = report
        .changes
        .iter()
        .map(|c| (c.package.as_str(), c.id.as_str(), c.operation, c.severity))
        .collect();

    assert_eq!(
        summary,
        [
            ("example.com/shapes", "Area", Operation::Changed, Severity::NonBreaking),
            ("example.com/shapes", "Circle", Operation::Changed, Severity::NonBreaking),
            ("example.com/shapes", "DefaultColor", Operation::Changed, Severity::Unknown),
            ("example.com/shapes", "Events", Operation::Changed, Severity::NonBreaking),
            ("example.com/shapes", "Perimeter", Operation::Removed, Severity::Breaking),
            ("example.com/shapes", "Shape", Operation::Changed, Severity::Breaking),
            ("example.com/shapes", "Square", Operation::Added, Severity::NonBreaking),
        ]
    );
    assert_eq!(report.summary.get("breaking"), Some(&2));
    assert_eq!(report.summary.get("nonBreaking"), Some(&4));
    assert_eq!(report.summary.get("unknown"), Some(&1));
    assert!(report.fails(&[Severity::Breaking]));
    assert!(report.fails(&[Severity::Unknown]));
    assert!(!report.fails(&[Severity::None]));

    let text = report.render_text(false, &[Severity::Breaking]);
    assert!(text.contains("example.com/shapes: Perimeter: removed (breaking - declaration removed)"));
    assert!(!text.contains("Square"));
    assert!(text.contains("Summary: 1 packages checked, 7 changes"));

    let text = report.render_text(true, &[Severity::Breaking]);
    assert!(text.contains("example.com/shapes: Square: added (nonBreaking - declaration added)"));
}

#[test]
fn test_report_serializes_to_json() {
    let before = read_revision("before.json");
    let after = read_revision("after.json");
    let report = CompatEngine::default().check(&before, &after).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["has_breaking_changes"], json!(true));
    assert_eq!(json["changes"][0]["severity"], json!("nonBreaking"));
    assert_eq!(json["changes"][0]["operation"], json!("changed"));

    let round_trip: api_compat::compat::CompatReport = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip.changes, report.changes);
}

#[test]
fn test_snapshot_compatibility_levels() {
    let load = |file: &str| {
        let content = fs::read_to_string(format!("tests/data/{file}")).unwrap();
        Snapshot::try_from(&content).unwrap()
    };
    let before = load("before.json");
    let reordered = load("before_reordered.json");
    let after = load("after.json");

    assert_eq!(before.compare_with(&reordered), Compatibility::Green);
    assert_eq!(before.compare_with(&after), Compatibility::Red);

    let added_only = Snapshot::from_revision(
        &revision(vec![package(vec![func_decl("F", vec![], None)])]),
        &CompatEngine::default(),
    )
    .unwrap();
    let grown = Snapshot::from_revision(
        &revision(vec![package(vec![func_decl("F", vec![], None), func_decl("G", vec![], None)])]),
        &CompatEngine::default(),
    )
    .unwrap();
    assert_eq!(added_only.compare_with(&grown), Compatibility::Yellow);
    assert_eq!(grown.compare_with(&added_only), Compatibility::Red);
}

#[test]
fn test_snapshot_check_changes_with_config() {
    let content = fs::read_to_string("tests/data/before.json").unwrap();
    let before = Snapshot::try_from(&content).unwrap();
    let content = fs::read_to_string("tests/data/after.json").unwrap();
    let after = Snapshot::try_from(&content).unwrap();

    let config = CheckConfig {
        ignore: vec!["Perimeter".to_string(), "Shape".to_string()],
        ..Default::default()
    };
    let report = before.check_changes_with_config(&after, &config).unwrap();
    assert!(!report.has_breaking_changes);
    assert_eq!(report.changes.len(), 5);
    assert_eq!(before.check_changes(&after).changes.len(), 7);
}
