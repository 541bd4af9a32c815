use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

/// Pointer of the profile every region starts from.
pub const DEFAULTS_POINTER: &str = "/defaults";

/// Pointer of the per-region override sections (`/regions/<code>`).
pub const REGIONS_POINTER: &str = "/regions";

/// Config Consumption Map + Unused-Key Guard
///
/// Consumers (the CLI) decide whether unused keys are warnings or errors by
/// calling `report_unused_keys(scope, &config_json, &consumed, UnusedKeyPolicy::Warn|Fail)`.
///
/// "Consumed pointers" are JSON Pointer prefixes. If a leaf pointer is under any consumed
/// prefix, that leaf is considered consumed. Any leaf not covered is "unused".
///
/// Examples:
/// - consumed prefix "/defaults/corrections" consumes "/defaults/corrections/0/label"
/// - consumed prefix "/regions/pa/ratio_policy" does NOT consume "/regions/pa/ratio_polcy"

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// What the config was checked for (e.g. `region=pa`).
    pub scope: String,
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Minimal set of unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Consumed pointers for a profile made of `keys`: each key under
/// `/defaults` and under every region section present in the config.
pub fn profile_consumed_pointers(config_json: &Value, keys: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for k in keys {
        out.push(format!("{DEFAULTS_POINTER}/{}", escape_pointer_token(k)));
    }
    for region in region_codes(config_json) {
        for k in keys {
            out.push(format!(
                "{REGIONS_POINTER}/{}/{}",
                escape_pointer_token(&region),
                escape_pointer_token(k)
            ));
        }
    }
    out
}

/// Produce an unused-key report against a set of consumed prefixes.
/// If `policy == Fail`, returns an error when unused keys exist.
/// If `policy == Warn`, always returns Ok(report).
pub fn report_unused_keys(
    scope: &str,
    config_json: &Value,
    consumed_pointers: &[String],
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    // Normalize prefixes: unique + sorted
    let consumed: BTreeSet<String> = consumed_pointers
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    // Empty containers carry no settings.
    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| config_json.pointer(lp).is_some_and(|v| !is_empty_container(v)))
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();

    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        scope: scope.to_string(),
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS ({}): {} unused config leaf key(s) detected. \
            Remove them or fix their spelling. First few: {}",
            report.scope,
            report.unused_leaf_pointers.len(),
            preview_list(&report.unused_leaf_pointers, 12)
        );
    }

    Ok(report)
}

fn is_empty_container(v: &Value) -> bool {
    match v {
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Normalize JSON pointer:
/// - must begin with "/"
/// - no trailing "/" unless it's just "/"
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// Return true if `prefix` is a JSON-pointer prefix of `leaf`.
///
/// Rules:
/// - prefix "/" consumes everything
/// - exact match consumes
/// - "/a/b" consumes "/a/b/c" but NOT "/a/bc"
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    if leaf == prefix {
        return true;
    }
    if leaf.starts_with(prefix) {
        return leaf
            .get(prefix.len()..prefix.len() + 1)
            .map(|c| c == "/")
            .unwrap_or(false);
    }
    false
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            // Leaf (scalars and empty containers)
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).cloned().collect::<Vec<_>>();
    format!("{:?}", take)
}

/// Region codes with a section under `/regions`, sorted.
fn region_codes(config_json: &Value) -> Vec<String> {
    let mut codes: Vec<String> = config_json
        .pointer(REGIONS_POINTER)
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    codes.sort();
    codes
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Region codes that carry their own overrides.
    pub fn regions(&self) -> Vec<String> {
        region_codes(&self.config_json)
    }

    /// `/defaults` deep-merged with `/regions/<region>` (either may be absent).
    pub fn region_profile_json(&self, region: &str) -> Value {
        let defaults = self
            .config_json
            .pointer(DEFAULTS_POINTER)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));
        let overrides = self
            .config_json
            .pointer(REGIONS_POINTER)
            .and_then(|r| r.get(region))
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));
        deep_merge(defaults, overrides)
    }

    /// Typed region profile. Missing keys fall back to `T`'s own defaults.
    pub fn region_profile<T: DeserializeOwned>(&self, region: &str) -> Result<T> {
        let v = self.region_profile_json(region);
        serde_json::from_value(v)
            .with_context(|| format!("invalid reconcile profile for region '{region}'"))
    }

    /// Typed section at a JSON pointer; an absent section is an error.
    pub fn section<T: DeserializeOwned>(&self, pointer: &str) -> Result<T> {
        let ptr = normalize_pointer(pointer);
        let Some(v) = self.config_json.pointer(&ptr) else {
            bail!("config section missing: {ptr}");
        };
        serde_json::from_value(v.clone()).with_context(|| format!("invalid config section: {ptr}"))
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    // Merge YAML docs in order: earlier docs are base, later docs override.
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        // An empty YAML document is null; treat it as an empty layer.
        if v_json.is_null() {
            continue;
        }
        if !v_json.is_object() {
            bail!("config layer must be a mapping at the top level");
        }
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Objects merge key by key; anything else in `b` replaces `a`.
pub fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's Map is a BTreeMap without `preserve_order`, so keys
    // serialize sorted.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    hex::encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_prefix_rules() {
        assert!(is_prefix_pointer("/", "/a"));
        assert!(is_prefix_pointer("/a/b", "/a/b"));
        assert!(is_prefix_pointer("/a/b", "/a/b/c"));
        assert!(!is_prefix_pointer("/a/b", "/a/bc"));
    }

    #[test]
    fn normalize_pointer_forms() {
        assert_eq!(normalize_pointer(""), "/");
        assert_eq!(normalize_pointer("a/b/"), "/a/b");
        assert_eq!(normalize_pointer("/a"), "/a");
    }

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let merged = deep_merge(
            json!({"a": {"x": 1, "y": 2}, "list": [1, 2]}),
            json!({"a": {"y": 3}, "list": [9]}),
        );
        assert_eq!(merged, json!({"a": {"x": 1, "y": 3}, "list": [9]}));
    }

    #[test]
    fn escaped_tokens() {
        assert_eq!(escape_pointer_token("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn region_profile_merges_defaults() {
        let cfg = load_layered_yaml_from_strings(&[r#"
defaults:
  life_term_years: 20
  merge_duplicate_tiers: false
regions:
  pa:
    merge_duplicate_tiers: true
"#])
        .unwrap();
        assert_eq!(
            cfg.region_profile_json("pa"),
            json!({"life_term_years": 20, "merge_duplicate_tiers": true})
        );
        assert_eq!(
            cfg.region_profile_json("zz"),
            json!({"life_term_years": 20, "merge_duplicate_tiers": false})
        );
        assert_eq!(cfg.regions(), vec!["pa".to_string()]);
    }

    #[test]
    fn non_mapping_layer_rejected() {
        assert!(load_layered_yaml_from_strings(&["- 1\n- 2\n"]).is_err());
    }

    #[test]
    fn empty_layer_is_skipped() {
        let a = load_layered_yaml_from_strings(&["", "defaults: {}\n"]).unwrap();
        let b = load_layered_yaml_from_strings(&["defaults: {}\n"]).unwrap();
        assert_eq!(a.config_hash, b.config_hash);
    }
}
