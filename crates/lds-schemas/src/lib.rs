//! lds-schemas
//!
//! Canonical scratch-ticket records shared by every region adapter:
//! [`Game`] owns an ordered list of [`Prize`] tiers.
//!
//! This crate owns the record shape, the field validator ([`validate`]) and
//! the JSON exchange codec ([`serialize`] / [`deserialize`]).
//! It does **not** reconcile counts or parse prize labels (see lds-reconcile),
//! and it never touches the network or a database.

mod codec;
mod lenient;
mod validate;

pub use codec::{
    deserialize, deserialize_many, serialize, serialize_many, serialize_many_pretty,
    serialize_pretty, FormatError,
};
pub use validate::{validate, validate_game, FieldError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prize tier within a [`Game`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    /// Tier label exactly as published (e.g. `"$50 A WEEK FOR LIFE"`).
    pub prize: String,
    /// Value of a single win in currency units. Annuity tiers carry the
    /// total lifetime payout.
    #[serde(deserialize_with = "lenient::number")]
    pub value: f64,
    /// Prizes of this tier not yet claimed.
    #[serde(deserialize_with = "lenient::count")]
    pub available: i64,
    /// Prizes of this tier already paid out.
    #[serde(deserialize_with = "lenient::count")]
    pub claimed: i64,
}

impl Prize {
    pub fn new(prize: impl Into<String>, value: f64, available: i64, claimed: i64) -> Self {
        Self {
            prize: prize.into(),
            value,
            available,
            claimed,
        }
    }

    /// Prizes printed for this tier (`available + claimed`), saturating.
    pub fn total(&self) -> i64 {
        self.available.saturating_add(self.claimed)
    }
}

/// One scratch-ticket product as published by a region.
///
/// A `Game` is always a complete snapshot: a new extraction run replaces the
/// whole record, prizes included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Opaque identifier as published. Leading zeros are significant.
    pub game_id: String,
    #[serde(default)]
    pub name: String,
    /// Source-region code (`"id"`, `"pa"`, ...).
    #[serde(default, alias = "region")]
    pub state: String,
    /// Ticket price in currency units.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Always serialized, `[]` when empty.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_play: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Estimated tickets printed at launch.
    #[serde(
        default,
        deserialize_with = "lenient::opt_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub num_tx_initial: Option<i64>,
    #[serde(default)]
    pub prizes: Vec<Prize>,
    /// Set by the persistence boundary. Defaults to the deserialization time
    /// when absent on input.
    #[serde(
        default = "lenient::now",
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Game {
    /// A game with no prizes and no provenance metadata.
    pub fn new(
        game_id: impl Into<String>,
        name: impl Into<String>,
        state: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            name: name.into(),
            state: state.into(),
            price,
            url: None,
            image_urls: Vec::new(),
            how_to_play: None,
            description: None,
            num_tx_initial: None,
            prizes: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sum of `available + claimed` across all tiers.
    pub fn prizes_printed(&self) -> i64 {
        self.prizes
            .iter()
            .map(Prize::total)
            .fold(0i64, i64::saturating_add)
    }

    /// Sum of `available` across all tiers.
    pub fn prizes_available(&self) -> i64 {
        self.prizes
            .iter()
            .map(|p| p.available)
            .fold(0i64, i64::saturating_add)
    }
}
