//! JSON exchange codec for [`Game`] records.
//!
//! Output rules:
//! - `image_urls` is always present as an array (`[]` when empty).
//! - numeric fields are JSON numbers, even when the source delivered strings.
//! - absent optional fields are omitted rather than written as `null`.
//!
//! `deserialize(serialize(g)) == g` for every game with finite numbers and a
//! `created_at` timestamp; an absent `created_at` comes back as the
//! deserialization time.

use std::fmt;

use serde_json::Value;

use crate::Game;

/// Malformed exchange text, or a record that cannot be represented.
#[derive(Debug, PartialEq)]
pub enum FormatError {
    /// The text is not well-formed JSON.
    Syntax { line: usize, column: usize, msg: String },
    /// Well-formed JSON whose shape does not match a Game record.
    Shape { record: Option<usize>, msg: String },
    /// A numeric field holds NaN or infinity, which JSON cannot carry.
    NonFinite { game_id: String, field: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Syntax { line, column, msg } => {
                write!(f, "malformed JSON at line {line} column {column}: {msg}")
            }
            FormatError::Shape {
                record: Some(i),
                msg,
            } => write!(f, "record[{i}] does not match the game schema: {msg}"),
            FormatError::Shape { record: None, msg } => {
                write!(f, "record does not match the game schema: {msg}")
            }
            FormatError::NonFinite { game_id, field } => {
                write!(f, "game '{game_id}': field '{field}' is not a finite number")
            }
        }
    }
}

impl std::error::Error for FormatError {}

fn from_json_error(e: serde_json::Error, record: Option<usize>) -> FormatError {
    use serde_json::error::Category;
    match e.classify() {
        Category::Syntax | Category::Eof | Category::Io => FormatError::Syntax {
            line: e.line(),
            column: e.column(),
            msg: e.to_string(),
        },
        Category::Data => FormatError::Shape {
            record,
            msg: e.to_string(),
        },
    }
}

fn ensure_finite(game: &Game) -> Result<(), FormatError> {
    let non_finite = |field: String| FormatError::NonFinite {
        game_id: game.game_id.clone(),
        field,
    };
    if !game.price.is_finite() {
        return Err(non_finite("price".to_string()));
    }
    for (i, p) in game.prizes.iter().enumerate() {
        if !p.value.is_finite() {
            return Err(non_finite(format!("prizes[{i}].value")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serialize
// ---------------------------------------------------------------------------

pub fn serialize(game: &Game) -> Result<String, FormatError> {
    ensure_finite(game)?;
    serde_json::to_string(game).map_err(|e| from_json_error(e, None))
}

pub fn serialize_pretty(game: &Game) -> Result<String, FormatError> {
    ensure_finite(game)?;
    serde_json::to_string_pretty(game).map_err(|e| from_json_error(e, None))
}

/// Serialize a batch as a JSON array.
pub fn serialize_many(games: &[Game]) -> Result<String, FormatError> {
    games.iter().try_for_each(ensure_finite)?;
    serde_json::to_string(games).map_err(|e| from_json_error(e, None))
}

pub fn serialize_many_pretty(games: &[Game]) -> Result<String, FormatError> {
    games.iter().try_for_each(ensure_finite)?;
    serde_json::to_string_pretty(games).map_err(|e| from_json_error(e, None))
}

// ---------------------------------------------------------------------------
// Deserialize
// ---------------------------------------------------------------------------

/// Parse one Game record.
pub fn deserialize(text: &str) -> Result<Game, FormatError> {
    serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| from_json_error(e, None))
}

/// Parse a batch. Accepts a JSON array of records or a single record object.
pub fn deserialize_many(text: &str) -> Result<Vec<Game>, FormatError> {
    let v: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| from_json_error(e, None))?;
    match v {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| serde_json::from_value(item).map_err(|e| from_json_error(e, Some(i))))
            .collect(),
        obj @ Value::Object(_) => serde_json::from_value(obj)
            .map(|g| vec![g])
            .map_err(|e| from_json_error(e, None)),
        other => Err(FormatError::Shape {
            record: None,
            msg: format!("expected an array or object, got {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
