//! JSON ingestion of raw game observations.
//!
//! Scrapers dump their observations either as one JSON array of
//! [`RawGame`] objects or as JSON lines (one object per line). Both shapes
//! are accepted; blank lines in JSON-lines input are skipped.
//!
//! This is the **read** side only: no reconciliation, no validation.

use std::path::{Path, PathBuf};

use crate::provider::{RawGame, RegionSource, SourceError};

/// Parse observations from a file. See [`parse_observations_str`].
pub fn parse_observations_file(path: &Path) -> Result<Vec<RawGame>, SourceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SourceError::Io(format!("read '{}': {e}", path.display())))?;
    parse_observations_str(&raw)
}

/// Parse observations from a string slice (JSON array or JSON lines).
pub fn parse_observations_str(src: &str) -> Result<Vec<RawGame>, SourceError> {
    let src = src.trim_start_matches('\u{feff}').trim();
    if src.is_empty() {
        return Ok(Vec::new());
    }

    if src.starts_with('[') {
        return serde_json::from_str(src).map_err(|e| SourceError::Decode {
            line: Some(e.line()),
            msg: e.to_string(),
        });
    }

    let mut out = Vec::new();
    for (i, line) in src.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let game: RawGame = serde_json::from_str(line).map_err(|e| SourceError::Decode {
            line: Some(i + 1),
            msg: e.to_string(),
        })?;
        out.push(game);
    }
    Ok(out)
}

/// A [`RegionSource`] backed by an observation dump on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    region: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(region: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            region: region.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegionSource for JsonFileSource {
    fn region(&self) -> &str {
        &self.region
    }

    fn games(&self) -> Result<Vec<RawGame>, SourceError> {
        parse_observations_file(&self.path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
