//! lds-ingest
//!
//! Input boundary between per-region scrapers and the reconciliation core.
//!
//! Scrapers (out of tree) fetch and parse a region's pages and hand over a
//! loosely-typed bag of fields per game: [`RawGame`] with its [`RawTier`]s.
//! This crate owns those raw types, the [`RegionSource`] adapter trait and a
//! JSON / JSON-lines reader for observations dumped to disk.
//! It does **not** fetch pages, parse markup, or interpret any field.

pub mod ingest_json;
pub mod provider;

pub use ingest_json::{parse_observations_file, parse_observations_str, JsonFileSource};
pub use provider::{RawGame, RawTier, RegionSource, SourceError};
