use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{OddsBasis, ReconciledTier};

/// Where a game's `num_tx_initial` came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateBasis {
    /// The source publishes tickets printed.
    TicketsPrinted,
    /// `overall_odds × Σ total`.
    OverallOdds,
    /// `odds × total` of the highest-value tier.
    TopTierOdds,
}

impl fmt::Display for EstimateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstimateBasis::TicketsPrinted => "tickets_printed",
            EstimateBasis::OverallOdds => "overall_odds",
            EstimateBasis::TopTierOdds => "top_tier_odds",
        };
        f.write_str(s)
    }
}

/// Estimate tickets printed at launch.
///
/// A published printed count wins. Otherwise `basis` picks overall odds,
/// the top tier's odds, or (`Auto`) overall odds falling back to the top
/// tier. `None` when the chosen inputs are missing.
pub fn estimate_initial_tickets(
    tiers: &[ReconciledTier],
    overall_odds: Option<f64>,
    tickets_printed: Option<i64>,
    basis: OddsBasis,
) -> Option<(i64, EstimateBasis)> {
    if let Some(n) = tickets_printed {
        return Some((n, EstimateBasis::TicketsPrinted));
    }

    let overall = || {
        let odds = overall_odds?;
        let printed = tiers
            .iter()
            .map(|t| t.total)
            .fold(0i64, i64::saturating_add);
        Some((round_count(odds * printed as f64)?, EstimateBasis::OverallOdds))
    };
    let top = || {
        let tier = top_tier(tiers)?;
        let odds = tier.odds?;
        Some((round_count(odds * tier.total as f64)?, EstimateBasis::TopTierOdds))
    };

    match basis {
        OddsBasis::Auto => overall().or_else(top),
        OddsBasis::Overall => overall(),
        OddsBasis::TopTier => top(),
    }
}

/// Highest-value tier, first on ties.
fn top_tier(tiers: &[ReconciledTier]) -> Option<&ReconciledTier> {
    tiers.iter().fold(None, |best: Option<&ReconciledTier>, t| match best {
        Some(b) if b.value >= t.value => Some(b),
        _ => Some(t),
    })
}

fn round_count(v: f64) -> Option<i64> {
    (v.is_finite() && v >= 0.0 && v < i64::MAX as f64).then(|| v.round() as i64)
}
