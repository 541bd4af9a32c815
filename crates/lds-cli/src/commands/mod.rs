//! Command handler modules for lds-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod reconcile;
pub mod report;

use anyhow::{Context, Result};
use lds_config::{
    load_layered_yaml_from_strings, profile_consumed_pointers, report_unused_keys, LoadedConfig,
    UnusedKeyPolicy,
};
use lds_reconcile::ReconcileProfile;
use std::fs;

/// Shipped defaults; always the first config layer.
const DEFAULT_CONFIG: &str = include_str!("../../../../config/defaults/base.yaml");

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Read a UTF-8 input file, dropping a leading BOM.
pub fn read_input(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read input failed: {}", path))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    String::from_utf8(bytes.to_vec()).context("input must be UTF-8 text")
}

/// Shipped defaults layered with `config_paths`, in order.
pub fn load_config(config_paths: &[String]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = vec![DEFAULT_CONFIG.to_string()];
    for p in config_paths {
        let raw = fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Resolve the reconcile profile for `region`, running the unused-key guard
/// over the whole config first.
pub fn load_profile(
    region: &str,
    config_paths: &[String],
    strict: bool,
) -> Result<ReconcileProfile> {
    let region = region.trim().to_ascii_lowercase();
    let loaded = load_config(config_paths)?;

    let consumed = profile_consumed_pointers(&loaded.config_json, ReconcileProfile::KEYS);
    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(
        &format!("region={region}"),
        &loaded.config_json,
        &consumed,
        policy,
    )?;
    for ptr in &report.unused_leaf_pointers {
        tracing::warn!(pointer = %ptr, "unused config key");
    }

    if !loaded.regions().contains(&region) {
        tracing::warn!(region = %region, "no config section for region; using defaults");
    }

    let mut profile: ReconcileProfile = loaded.region_profile(&region)?;
    profile.region = region;

    tracing::info!(
        region = %profile.region,
        config_hash = %loaded.config_hash,
        ratio_policy = ?profile.ratio_policy,
        merge_duplicate_tiers = profile.merge_duplicate_tiers,
        "reconcile profile loaded"
    );

    Ok(profile)
}
