use serde::{Deserialize, Serialize};

use lds_schemas::Prize;

use crate::value::ValueRules;

/// Default years an annuity "for life" is paid out over.
pub const DEFAULT_LIFE_TERM_YEARS: u32 = 20;

/// Default currency units per "million".
pub const DEFAULT_MILLION_MULTIPLIER: f64 = 1_000_000.0;

/// Which ratio fills gaps in a tier's counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioPolicy {
    /// The remaining ratio of the most recent tier with an observed remaining.
    #[default]
    MostRecent,
    /// One ratio pooled over every tier that reports both counts.
    Pooled,
}

/// Which odds figure drives the printed-ticket estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsBasis {
    /// Overall odds when published, else the top tier's odds.
    #[default]
    Auto,
    Overall,
    TopTier,
}

/// A fix for a count a source is known to publish wrong.
///
/// Matches tiers whose label equals `label` exactly and, when
/// `game_name_contains` is set, only in games whose name contains it
/// (case-insensitive).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Correction {
    pub label: String,
    pub game_name_contains: Option<String>,
    pub total: Option<i64>,
    pub remaining: Option<i64>,
    /// Drop the observed remaining so it is estimated from the carried ratio.
    pub estimate_remaining: bool,
}

impl Correction {
    pub fn matches(&self, game_name: &str, label: &str) -> bool {
        if self.label != label {
            return false;
        }
        match &self.game_name_contains {
            Some(needle) => game_name
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// Per-region reconciliation knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileProfile {
    /// Region code stamped on games that carry none. Not read from config.
    #[serde(skip)]
    pub region: String,
    pub life_term_years: u32,
    pub million_multiplier: f64,
    pub ratio_policy: RatioPolicy,
    pub merge_duplicate_tiers: bool,
    pub odds_basis: OddsBasis,
    pub corrections: Vec<Correction>,
}

impl Default for ReconcileProfile {
    fn default() -> Self {
        Self {
            region: String::new(),
            life_term_years: DEFAULT_LIFE_TERM_YEARS,
            million_multiplier: DEFAULT_MILLION_MULTIPLIER,
            ratio_policy: RatioPolicy::MostRecent,
            merge_duplicate_tiers: false,
            odds_basis: OddsBasis::Auto,
            corrections: Vec::new(),
        }
    }
}

impl ReconcileProfile {
    /// Config keys this profile consumes, relative to a profile section.
    pub const KEYS: &'static [&'static str] = &[
        "life_term_years",
        "million_multiplier",
        "ratio_policy",
        "merge_duplicate_tiers",
        "odds_basis",
        "corrections",
    ];

    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    pub fn value_rules(&self) -> ValueRules {
        ValueRules {
            life_term_years: self.life_term_years,
            million_multiplier: self.million_multiplier,
        }
    }

    /// First correction matching this tier, if any.
    pub fn correction_for(&self, game_name: &str, label: &str) -> Option<&Correction> {
        self.corrections.iter().find(|c| c.matches(game_name, label))
    }
}

/// A tier after parsing and value normalization, counts still unresolved.
#[derive(Clone, Debug, PartialEq)]
pub struct TierCounts {
    pub label: String,
    pub value: f64,
    pub total: Option<i64>,
    pub remaining: Option<i64>,
    pub claimed: Option<i64>,
    /// Per-tier odds as `N` in "1 in N".
    pub odds: Option<f64>,
}

impl TierCounts {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            total: None,
            remaining: None,
            claimed: None,
            odds: None,
        }
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_remaining(mut self, remaining: i64) -> Self {
        self.remaining = Some(remaining);
        self
    }

    pub fn with_claimed(mut self, claimed: i64) -> Self {
        self.claimed = Some(claimed);
        self
    }

    pub fn with_odds(mut self, odds: f64) -> Self {
        self.odds = Some(odds);
        self
    }

    /// `(total, remaining)` with a gap filled from the reported claimed
    /// count, when one is reported and consistent.
    pub fn counts_with_claimed(&self) -> (Option<i64>, Option<i64>) {
        let (mut total, mut remaining) = (self.total, self.remaining);
        if let Some(claimed) = self.claimed {
            match (total, remaining) {
                (Some(t), None) if claimed <= t => remaining = Some(t - claimed),
                (None, Some(r)) => total = r.checked_add(claimed),
                _ => {}
            }
        }
        (total, remaining)
    }
}

/// A tier with fully resolved, mutually consistent counts.
///
/// `claimed == total - remaining` and every count is `>= 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciledTier {
    pub label: String,
    pub value: f64,
    pub total: i64,
    pub remaining: i64,
    pub claimed: i64,
    pub odds: Option<f64>,
}

impl ReconciledTier {
    pub fn to_prize(&self) -> Prize {
        Prize::new(self.label.clone(), self.value, self.remaining, self.claimed)
    }
}
