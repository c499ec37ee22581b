//! Tests for YAML configuration loading and parsing

use api_compat::compat::{CheckConfig, Severity};
use std::io::Write;

#[test]
fn test_load_yaml_config() {
    let yaml_content = r#"
version: v1
apicompat:
  exclude_files:
    - "_test\\.go$"
    - "^zz_generated"
  exclude_dirs:
    - "/examples/"
  ignore:
    - Deprecated
    - example.com/lib:Client.Legacy
  skip_internal: false
  show_all: true
  fail_on:
    - breaking
    - unknown
"#;

    let config = CheckConfig::from_yaml_str(yaml_content).unwrap();

    assert_eq!(config.exclude_files, vec!["_test\\.go$", "^zz_generated"]);
    assert_eq!(config.exclude_dirs, vec!["/examples/"]);
    assert_eq!(config.ignore, vec!["Deprecated", "example.com/lib:Client.Legacy"]);
    assert!(!config.skip_internal);
    assert!(config.skip_main);
    assert!(config.show_all);
    assert_eq!(config.fail_on, vec![Severity::Breaking, Severity::Unknown]);
}

#[test]
fn test_load_minimal_yaml_config() {
    let yaml_content = r#"
apicompat:
  ignore:
    - Foo
"#;

    let config = CheckConfig::from_yaml_str(yaml_content).unwrap();

    assert_eq!(config.ignore, vec!["Foo"]);
    assert!(config.exclude_files.is_empty());
    assert!(config.skip_internal);
    assert!(config.skip_main);
    assert!(!config.show_all);
    assert_eq!(config.fail_on, vec![Severity::Breaking]);
}

#[test]
fn test_missing_section_uses_defaults() {
    let config = CheckConfig::from_yaml_str("version: v1\n").unwrap();
    let defaults = CheckConfig::default();

    assert_eq!(config.fail_on, defaults.fail_on);
    assert_eq!(config.skip_internal, defaults.skip_internal);
    assert!(config.ignore.is_empty());
}

#[test]
fn test_invalid_severity_is_rejected() {
    let yaml_content = r#"
apicompat:
  fail_on:
    - catastrophic
"#;

    assert!(CheckConfig::from_yaml_str(yaml_content).is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "apicompat:\n  fail_on: [nonBreaking, breaking]\n  skip_main: false").unwrap();

    let config = CheckConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.fail_on, vec![Severity::NonBreaking, Severity::Breaking]);
    assert!(!config.skip_main);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = CheckConfig::from_yaml_file(&path).unwrap_err();
    assert!(err.to_string().contains("missing.yaml"));
}
