//! Count reconciliation.
//!
//! Tiers are walked strictly in source order. Each tier depends only on
//! itself and the [`RatioTracker`] carried from the tiers before it:
//!
//! - missing total: `total = round(remaining / ratio)`
//! - `remaining > total` (stale total): `total = round(remaining / ratio)`
//! - missing remaining: `remaining = round(total * ratio)`
//! - `claimed = total - remaining`
//!
//! A reported claimed count only fills a gap before those rules run.

use crate::error::ReconcileError;
use crate::types::{RatioPolicy, ReconciledTier, TierCounts};

/// Remaining/total ratio carried from tier to tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioTracker {
    ratio: f64,
    follow: bool,
}

impl Default for RatioTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatioTracker {
    /// Starts at 1.0 (nothing claimed) and follows every observed tier.
    pub fn new() -> Self {
        Self {
            ratio: 1.0,
            follow: true,
        }
    }

    /// One ratio for the whole game: `Σremaining / Σtotal` over tiers that
    /// report both counts consistently. 1.0 when no tier does.
    pub fn pooled(tiers: &[TierCounts]) -> Self {
        let (rem, tot) = tiers
            .iter()
            .filter_map(|t| match (t.total, t.remaining) {
                (Some(total), Some(remaining)) if total > 0 && remaining <= total => {
                    Some((remaining, total))
                }
                _ => None,
            })
            .fold((0i64, 0i64), |(r, t), (rem, tot)| {
                (r.saturating_add(rem), t.saturating_add(tot))
            });
        let ratio = if tot > 0 { rem as f64 / tot as f64 } else { 1.0 };
        Self {
            ratio,
            follow: false,
        }
    }

    pub fn for_policy(policy: RatioPolicy, tiers: &[TierCounts]) -> Self {
        match policy {
            RatioPolicy::MostRecent => Self::new(),
            RatioPolicy::Pooled => Self::pooled(tiers),
        }
    }

    pub fn current(&self) -> f64 {
        self.ratio
    }

    /// Record a tier with an observed remaining count. Ignored for pooled
    /// trackers and non-positive totals.
    pub fn observe(&mut self, total: i64, remaining: i64) {
        if self.follow && total > 0 {
            self.ratio = remaining as f64 / total as f64;
        }
    }
}

/// Resolve every tier's counts, in order.
///
/// Fails the whole game on the first tier that cannot be resolved.
pub fn reconcile_counts(
    game_id: &str,
    tiers: &[TierCounts],
    policy: RatioPolicy,
) -> Result<Vec<ReconciledTier>, ReconcileError> {
    let mut tracker = RatioTracker::for_policy(policy, tiers);
    let mut out = Vec::with_capacity(tiers.len());

    for tier in tiers {
        let (resolved, observed) = resolve_tier(game_id, tier, tracker.current())?;
        if observed {
            tracker.observe(resolved.total, resolved.remaining);
        }
        out.push(resolved);
    }

    Ok(out)
}

/// Returns the resolved tier and whether its remaining count was observed
/// (as opposed to estimated).
fn resolve_tier(
    game_id: &str,
    tier: &TierCounts,
    ratio: f64,
) -> Result<(ReconciledTier, bool), ReconcileError> {
    let (total, remaining) = tier.counts_with_claimed();

    let observed = remaining.is_some();
    let (total, remaining) = match (total, remaining) {
        (None, None) => {
            return Err(ReconcileError::UnresolvableTier {
                game_id: game_id.to_string(),
                label: tier.label.clone(),
            })
        }
        (None, Some(r)) => (total_from_remaining(game_id, tier, r, ratio)?, r),
        (Some(t), Some(r)) if r > t => (total_from_remaining(game_id, tier, r, ratio)?, r),
        (Some(t), Some(r)) => (t, r),
        (Some(t), None) => {
            let r = ((t as f64 * ratio).round() as i64).clamp(0, t);
            (t, r)
        }
    };

    Ok((
        ReconciledTier {
            label: tier.label.clone(),
            value: tier.value,
            total,
            remaining,
            claimed: total - remaining,
            odds: tier.odds,
        },
        observed,
    ))
}

fn total_from_remaining(
    game_id: &str,
    tier: &TierCounts,
    remaining: i64,
    ratio: f64,
) -> Result<i64, ReconcileError> {
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(ReconcileError::ZeroRatio {
            game_id: game_id.to_string(),
            label: tier.label.clone(),
        });
    }
    // total >= remaining even if the ratio exceeds 1.0.
    Ok(((remaining as f64 / ratio).round() as i64).max(remaining))
}
