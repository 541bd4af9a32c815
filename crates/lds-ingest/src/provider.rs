//! Raw observation types and the region adapter contract.
//!
//! Every scalar stays a string exactly as the scraper extracted it
//! (`"1,350,500"`, `"1 in 4.25"`, `"$50 A WEEK FOR LIFE"`). Numbers that a
//! JSON-speaking source already typed are accepted and stringified, so the
//! reconciler applies one parsing policy to every region.

use std::fmt;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw types
// ---------------------------------------------------------------------------

/// One prize tier as observed on a source page, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTier {
    /// Tier label as published (e.g. `"$100,000"`, `"FREE TICKET"`).
    #[serde(default, deserialize_with = "loose_string")]
    pub label: Option<String>,
    /// Prizes printed for this tier.
    #[serde(default, deserialize_with = "loose_string")]
    pub total: Option<String>,
    /// Prizes already paid out.
    #[serde(default, alias = "paid", deserialize_with = "loose_string")]
    pub claimed: Option<String>,
    /// Prizes not yet claimed.
    #[serde(default, alias = "available", deserialize_with = "loose_string")]
    pub remaining: Option<String>,
    /// Per-tier odds (`"1 in 480,000"`).
    #[serde(default, deserialize_with = "loose_string")]
    pub odds: Option<String>,
    /// Value text when the source publishes it apart from the label.
    #[serde(default, deserialize_with = "loose_string")]
    pub value: Option<String>,
}

impl RawTier {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn total(mut self, v: impl Into<String>) -> Self {
        self.total = Some(v.into());
        self
    }

    pub fn claimed(mut self, v: impl Into<String>) -> Self {
        self.claimed = Some(v.into());
        self
    }

    pub fn remaining(mut self, v: impl Into<String>) -> Self {
        self.remaining = Some(v.into());
        self
    }

    pub fn odds(mut self, v: impl Into<String>) -> Self {
        self.odds = Some(v.into());
        self
    }

    pub fn value(mut self, v: impl Into<String>) -> Self {
        self.value = Some(v.into());
        self
    }
}

/// Top-level fields of one game plus its tiers, as observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default, deserialize_with = "loose_string")]
    pub game_id: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    /// Region code; the caller's region is used when absent.
    #[serde(default, alias = "region", deserialize_with = "loose_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub how_to_play: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    /// Overall odds of winning any prize (`"1 in 3.92"`).
    #[serde(default, deserialize_with = "loose_string")]
    pub overall_odds: Option<String>,
    /// Tickets printed, for sources that publish it directly.
    #[serde(default, deserialize_with = "loose_string")]
    pub tickets_printed: Option<String>,
    #[serde(default)]
    pub tiers: Vec<RawTier>,
}

/// Accept a JSON string or number; `null` and blank strings become `None`.
fn loose_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Str(String),
        Num(serde_json::Number),
        Bool(bool),
    }

    Ok(match Option::<Loose>::deserialize(d)? {
        None => None,
        Some(Loose::Str(s)) if s.trim().is_empty() => None,
        Some(Loose::Str(s)) => Some(s),
        Some(Loose::Num(n)) => Some(n.to_string()),
        Some(Loose::Bool(b)) => Some(b.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`RegionSource`] may return.
#[derive(Debug)]
pub enum SourceError {
    /// Reading the observations failed.
    Io(String),
    /// The observations could not be decoded.
    Decode { line: Option<usize>, msg: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(msg) => write!(f, "source io error: {msg}"),
            SourceError::Decode {
                line: Some(line),
                msg,
            } => write!(f, "source decode error at line {line}: {msg}"),
            SourceError::Decode { line: None, msg } => {
                write!(f, "source decode error: {msg}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

// ---------------------------------------------------------------------------
// Adapter trait
// ---------------------------------------------------------------------------

/// One region's extraction recipe, seen from the core.
///
/// Implementations do whatever fetching and markup parsing their site
/// needs and return every game they found, tiers in source order. The
/// core never depends on how many regions exist.
pub trait RegionSource {
    /// Region code stamped on games that do not carry one (e.g. `"id"`).
    fn region(&self) -> &str;

    /// All raw game observations for this run.
    fn games(&self) -> Result<Vec<RawGame>, SourceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        games: Vec<RawGame>,
    }

    impl RegionSource for FixedSource {
        fn region(&self) -> &str {
            "id"
        }

        fn games(&self) -> Result<Vec<RawGame>, SourceError> {
            Ok(self.games.clone())
        }
    }

    #[test]
    fn source_is_object_safe() {
        let src: Box<dyn RegionSource> = Box::new(FixedSource {
            games: vec![RawGame::default()],
        });
        assert_eq!(src.region(), "id");
        assert_eq!(src.games().unwrap().len(), 1);
    }

    #[test]
    fn numbers_are_stringified() {
        let t: RawTier =
            serde_json::from_str(r#"{"label":"$5","total":1200,"available":"1,100","odds":4.5}"#)
                .unwrap();
        assert_eq!(t.total.as_deref(), Some("1200"));
        assert_eq!(t.remaining.as_deref(), Some("1,100"));
        assert_eq!(t.odds.as_deref(), Some("4.5"));
        assert_eq!(t.claimed, None);
    }

    #[test]
    fn blank_and_null_are_missing() {
        let t: RawTier = serde_json::from_str(r#"{"label":"$5","total":" ","paid":null}"#).unwrap();
        assert_eq!(t.total, None);
        assert_eq!(t.claimed, None);
    }

    #[test]
    fn aliases_accepted() {
        let g: RawGame =
            serde_json::from_str(r#"{"game_id":"0042","region":"pa","tiers":[{"paid":"3"}]}"#)
                .unwrap();
        assert_eq!(g.state.as_deref(), Some("pa"));
        assert_eq!(g.tiers[0].claimed.as_deref(), Some("3"));
    }

    #[test]
    fn builder_sets_fields() {
        let t = RawTier::labelled("$100").total("10").remaining("4").odds("1 in 5000");
        assert_eq!(t.label.as_deref(), Some("$100"));
        assert_eq!(t.total.as_deref(), Some("10"));
        assert_eq!(t.remaining.as_deref(), Some("4"));
        assert_eq!(t.odds.as_deref(), Some("1 in 5000"));
    }

    #[test]
    fn error_display() {
        let e = SourceError::Decode {
            line: Some(3),
            msg: "expected value".to_string(),
        };
        assert_eq!(e.to_string(), "source decode error at line 3: expected value");
        assert_eq!(
            SourceError::Io("denied".to_string()).to_string(),
            "source io error: denied"
        );
    }
}
