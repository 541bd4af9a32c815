//! Field validation for loosely-typed and typed Game records.
//!
//! Validation never stops at the first defect: every failing field is
//! reported as a [`FieldError`] so a caller sees the complete defect set.
//! Nested prize fields are reported with indexed paths such as
//! `prizes[2].available`.

use std::fmt;

use serde_json::{Map, Value};

use crate::lenient::{parse_integer_str, parse_number_str, parse_timestamp};
use crate::Game;

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldError {
    /// Field path (`game_id`, `prizes[0].value`, ...). `$` is the record itself.
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

fn check_region_code(field: &str, code: &str, errors: &mut Vec<FieldError>) {
    let len = code.chars().count();
    if !(2..=3).contains(&len) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(FieldError::new(
            field,
            format!("expected a 2-3 letter region code, got '{code}'"),
        ));
    }
}

fn check_non_negative_number(field: &str, v: f64, errors: &mut Vec<FieldError>) {
    if !v.is_finite() {
        errors.push(FieldError::new(field, format!("must be finite, got {v}")));
    } else if v < 0.0 {
        errors.push(FieldError::new(field, format!("must be >= 0, got {v}")));
    }
}

fn check_non_negative_count(field: &str, v: i64, errors: &mut Vec<FieldError>) {
    if v < 0 {
        errors.push(FieldError::new(field, format!("must be >= 0, got {v}")));
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Loosely-typed records
// ---------------------------------------------------------------------------

/// Semantic type of a record field.
#[derive(Clone, Copy)]
enum FieldKind {
    Str,
    RegionCode,
    Number,
    Count,
    Timestamp,
    StringList,
}

/// `(name, kind, nullable)` for every scalar Game field except `game_id`.
const GAME_FIELDS: &[(&str, FieldKind, bool)] = &[
    ("name", FieldKind::Str, false),
    ("state", FieldKind::RegionCode, false),
    ("price", FieldKind::Number, false),
    ("url", FieldKind::Str, true),
    ("image_urls", FieldKind::StringList, true),
    ("how_to_play", FieldKind::Str, true),
    ("description", FieldKind::Str, true),
    ("num_tx_initial", FieldKind::Count, true),
    ("created_at", FieldKind::Timestamp, true),
    ("updated_at", FieldKind::Timestamp, true),
];

/// Prize fields are all required.
const PRIZE_FIELDS: &[(&str, FieldKind)] = &[
    ("prize", FieldKind::Str),
    ("value", FieldKind::Number),
    ("available", FieldKind::Count),
    ("claimed", FieldKind::Count),
];

fn check_value(path: &str, kind_: FieldKind, v: &Value, errors: &mut Vec<FieldError>) {
    match kind_ {
        FieldKind::Str => {
            if !v.is_string() {
                errors.push(FieldError::new(
                    path,
                    format!("expected a string, got {}", kind(v)),
                ));
            }
        }
        FieldKind::RegionCode => match v.as_str() {
            Some(s) => check_region_code(path, s, errors),
            None => errors.push(FieldError::new(
                path,
                format!("expected a string, got {}", kind(v)),
            )),
        },
        FieldKind::Number => {
            let n = match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => parse_number_str(s),
                _ => None,
            };
            match n {
                Some(n) => check_non_negative_number(path, n, errors),
                None => errors.push(FieldError::new(
                    path,
                    format!("expected a number, got {}", kind(v)),
                )),
            }
        }
        FieldKind::Count => {
            let n = match v {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                            .map(|f| f as i64)
                    }),
                Value::String(s) => parse_integer_str(s),
                _ => None,
            };
            match n {
                Some(n) => check_non_negative_count(path, n, errors),
                None => errors.push(FieldError::new(
                    path,
                    format!("expected an integer, got {}", kind(v)),
                )),
            }
        }
        FieldKind::Timestamp => {
            if v.as_str().and_then(parse_timestamp).is_none() {
                errors.push(FieldError::new(path, "not a valid datetime"));
            }
        }
        FieldKind::StringList => match v {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        errors.push(FieldError::new(
                            format!("{path}[{i}]"),
                            format!("expected a string, got {}", kind(item)),
                        ));
                    }
                }
            }
            // Legacy exchange format carried the list JSON-encoded.
            Value::String(s) => {
                if !s.trim().is_empty() && serde_json::from_str::<Vec<String>>(s).is_err() {
                    errors.push(FieldError::new(path, "not a JSON string array"));
                }
            }
            other => errors.push(FieldError::new(
                path,
                format!("expected an array of strings, got {}", kind(other)),
            )),
        },
    }
}

fn check_prize(index: usize, v: &Value, errors: &mut Vec<FieldError>) {
    let Some(obj) = v.as_object() else {
        errors.push(FieldError::new(
            format!("prizes[{index}]"),
            format!("expected an object, got {}", kind(v)),
        ));
        return;
    };
    for (name, kind_) in PRIZE_FIELDS {
        let path = format!("prizes[{index}].{name}");
        match obj.get(*name) {
            None => errors.push(FieldError::new(path, "missing required field")),
            Some(v) => check_value(&path, *kind_, v, errors),
        }
    }
}

fn check_game_id(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) {
    match obj.get("game_id") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("game_id", "missing required field"))
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new("game_id", "must not be empty"))
        }
        Some(Value::String(_)) => {}
        Some(other) => errors.push(FieldError::new(
            "game_id",
            format!("expected a string, got {}", kind(other)),
        )),
    }
}

/// Validate a loosely-typed Game record (as parsed from exchange text).
///
/// Returns every failed constraint; an empty vector means the record is valid.
pub fn validate(record: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let Some(obj) = record.as_object() else {
        errors.push(FieldError::new(
            "$",
            format!("expected an object, got {}", kind(record)),
        ));
        return errors;
    };

    check_game_id(obj, &mut errors);

    for (name, kind_, nullable) in GAME_FIELDS {
        match obj.get(*name) {
            None => {}
            Some(Value::Null) if *nullable => {}
            Some(v) => check_value(name, *kind_, v, &mut errors),
        }
    }

    match obj.get("prizes") {
        None => {}
        Some(Value::Array(prizes)) => {
            for (i, p) in prizes.iter().enumerate() {
                check_prize(i, p, &mut errors);
            }
        }
        Some(other) => errors.push(FieldError::new(
            "prizes",
            format!("expected an array, got {}", kind(other)),
        )),
    }

    errors
}

// ---------------------------------------------------------------------------
// Typed records
// ---------------------------------------------------------------------------

/// Validate a typed [`Game`]. Type constraints hold by construction, so this
/// checks value constraints only (ranges, finiteness, region code shape).
pub fn validate_game(game: &Game) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if game.game_id.trim().is_empty() {
        errors.push(FieldError::new("game_id", "must not be empty"));
    }
    if !game.state.is_empty() {
        check_region_code("state", &game.state, &mut errors);
    }
    check_non_negative_number("price", game.price, &mut errors);
    if let Some(n) = game.num_tx_initial {
        check_non_negative_count("num_tx_initial", n, &mut errors);
    }
    for (i, p) in game.prizes.iter().enumerate() {
        check_non_negative_number(&format!("prizes[{i}].value"), p.value, &mut errors);
        check_non_negative_count(&format!("prizes[{i}].available"), p.available, &mut errors);
        check_non_negative_count(&format!("prizes[{i}].claimed"), p.claimed, &mut errors);
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
