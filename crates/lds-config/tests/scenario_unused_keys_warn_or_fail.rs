use lds_config::{
    load_layered_yaml_from_strings, profile_consumed_pointers, report_unused_keys,
    UnusedKeyPolicy,
};

/// scenario_unused_keys_warn_or_fail
///
/// Validates:
/// 1) Misspelled profile keys are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Nested values under a consumed key (correction lists) are not flagged.
/// 4) Deterministic ordering of unused pointers.

const KEYS: &[&str] = &["life_term_years", "ratio_policy", "corrections"];

#[test]
fn warn_mode_reports_misspelled_keys_without_error() {
    let yaml = r#"
defaults:
  life_term_years: 20
regions:
  pa:
    ratio_polcy: pooled
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let consumed = profile_consumed_pointers(&loaded.config_json, KEYS);

    let report = report_unused_keys(
        "region=pa",
        &loaded.config_json,
        &consumed,
        UnusedKeyPolicy::Warn,
    )
    .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/regions/pa/ratio_polcy".to_string()]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
defaults:
  life_term_years: 20
unused_section:
  foo: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let consumed = profile_consumed_pointers(&loaded.config_json, KEYS);

    let result = report_unused_keys(
        "region=id",
        &loaded.config_json,
        &consumed,
        UnusedKeyPolicy::Fail,
    );

    let msg = format!("{:?}", result.err().expect("fail policy must error"));
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
    assert!(msg.contains("/unused_section/foo"));
}

#[test]
fn consumed_key_covers_nested_values() {
    let yaml = r#"
defaults:
  corrections: []
regions:
  id:
    corrections:
      - label: "$1"
        game_name_contains: "5x the cash"
        total: 276000
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let consumed = profile_consumed_pointers(&loaded.config_json, KEYS);

    let report = report_unused_keys(
        "region=id",
        &loaded.config_json,
        &consumed,
        UnusedKeyPolicy::Fail,
    )
    .expect("all keys are consumed");

    assert!(report.is_clean());
}

#[test]
fn deterministic_unused_pointer_ordering() {
    let yaml = r#"
unused:
  b: 2
  a: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");

    let report = report_unused_keys("any", &loaded.config_json, &[], UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/unused/a".to_string(), "/unused/b".to_string()],
    );
}
