//! Per-game and batch entry points.

use lds_ingest::{RawGame, RawTier, RegionSource, SourceError};
use lds_schemas::Game;

use crate::counts::{parse_count, parse_currency, parse_odds};
use crate::engine::reconcile_counts;
use crate::error::{GameFailure, ReconcileError, ValueParseError};
use crate::estimate::{estimate_initial_tickets, EstimateBasis};
use crate::merge::merge_tiers;
use crate::types::{ReconcileProfile, TierCounts};
use crate::value::{normalize_value, ValueRules};

/// A fully reconciled game plus what was dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledGame {
    pub game: Game,
    /// Tiers left out because their value could not be parsed.
    pub value_errors: Vec<ValueParseError>,
    /// How `game.num_tx_initial` was obtained; `None` when absent.
    pub estimate_basis: Option<EstimateBasis>,
}

/// Reconcile one raw observation into a [`Game`].
///
/// Pipeline: value normalization, corrections, optional tier merge, count
/// reconciliation, initial-ticket estimate.
pub fn reconcile_game(
    raw: &RawGame,
    profile: &ReconcileProfile,
) -> Result<ReconciledGame, ReconcileError> {
    let game_id = raw
        .game_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ReconcileError::MissingGameId)?
        .to_string();

    let price = raw
        .price
        .as_deref()
        .and_then(parse_currency)
        .ok_or_else(|| ReconcileError::InvalidPrice {
            game_id: game_id.clone(),
            raw: raw.price.clone(),
        })?;

    let name = raw.name.as_deref().map(str::trim).unwrap_or_default();
    let rules = profile.value_rules();

    let mut tiers = Vec::with_capacity(raw.tiers.len());
    let mut value_errors = Vec::new();
    for raw_tier in &raw.tiers {
        match parse_tier(raw_tier, price, &rules) {
            Some(tier) => tiers.push(tier),
            None => value_errors.push(ValueParseError {
                game_id: game_id.clone(),
                label: raw_tier
                    .label
                    .clone()
                    .or_else(|| raw_tier.value.clone())
                    .unwrap_or_default(),
            }),
        }
    }

    for tier in &mut tiers {
        if let Some(fix) = profile.correction_for(name, &tier.label) {
            tracing::debug!(game_id = %game_id, label = %tier.label, "applying count correction");
            if fix.total.is_some() {
                tier.total = fix.total;
            }
            if fix.remaining.is_some() {
                tier.remaining = fix.remaining;
            }
            if fix.estimate_remaining {
                tier.remaining = None;
                tier.claimed = None;
            }
        }
    }

    if profile.merge_duplicate_tiers {
        tiers = merge_tiers(tiers);
    }

    if tiers.is_empty() {
        return Err(ReconcileError::NoUsableTiers { game_id });
    }

    let resolved = reconcile_counts(&game_id, &tiers, profile.ratio_policy)?;

    let overall_odds = raw.overall_odds.as_deref().and_then(parse_odds);
    let tickets_printed = raw.tickets_printed.as_deref().and_then(parse_count);
    let estimate =
        estimate_initial_tickets(&resolved, overall_odds, tickets_printed, profile.odds_basis);

    let state = raw
        .state
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(profile.region.as_str())
        .to_ascii_lowercase();

    let mut game = Game::new(game_id, name, state, price);
    game.url = raw.url.clone();
    game.image_urls = raw.image_urls.clone();
    game.how_to_play = raw.how_to_play.clone();
    game.description = raw.description.clone();
    game.num_tx_initial = estimate.map(|(n, _)| n);
    game.prizes = resolved.iter().map(|t| t.to_prize()).collect();

    tracing::debug!(
        game_id = %game.game_id,
        tiers = game.prizes.len(),
        skipped = value_errors.len(),
        num_tx_initial = ?game.num_tx_initial,
        "game reconciled"
    );

    Ok(ReconciledGame {
        game,
        value_errors,
        estimate_basis: estimate.map(|(_, basis)| basis),
    })
}

/// Value text is normalized; the label is kept verbatim (or taken from the
/// value text when missing).
fn parse_tier(raw: &RawTier, price: f64, rules: &ValueRules) -> Option<TierCounts> {
    let value_text = raw.value.as_deref().or(raw.label.as_deref())?;
    let label = raw.label.as_deref().unwrap_or(value_text).trim();
    let value = normalize_value(value_text, price, rules)?;

    Some(TierCounts {
        label: label.to_string(),
        value,
        total: raw.total.as_deref().and_then(parse_count),
        remaining: raw.remaining.as_deref().and_then(parse_count),
        claimed: raw.claimed.as_deref().and_then(parse_count),
        odds: raw.odds.as_deref().and_then(parse_odds),
    })
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Result of reconciling a batch: every game that succeeded, in input
/// order, and every one that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub games: Vec<ReconciledGame>,
    pub failures: Vec<GameFailure>,
}

impl BatchOutcome {
    /// Tiers dropped across all reconciled games.
    pub fn skipped_tiers(&self) -> usize {
        self.games.iter().map(|g| g.value_errors.len()).sum()
    }

    pub fn into_games(self) -> Vec<Game> {
        self.games.into_iter().map(|g| g.game).collect()
    }
}

/// Reconcile every observation. A failing game never aborts the batch.
pub fn reconcile_batch(raws: &[RawGame], profile: &ReconcileProfile) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, raw) in raws.iter().enumerate() {
        match reconcile_game(raw, profile) {
            Ok(reconciled) => {
                for e in &reconciled.value_errors {
                    tracing::warn!(game_id = %e.game_id, label = %e.label, "prize tier skipped: unparseable value");
                }
                outcome.games.push(reconciled);
            }
            Err(error) => {
                tracing::warn!(
                    index,
                    game_id = error.game_id().unwrap_or("-"),
                    url = raw.url.as_deref().unwrap_or("-"),
                    %error,
                    "game failed to reconcile"
                );
                outcome.failures.push(GameFailure {
                    index,
                    url: raw.url.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        region = %profile.region,
        reconciled = outcome.games.len(),
        failed = outcome.failures.len(),
        skipped_tiers = outcome.skipped_tiers(),
        "batch reconciled"
    );

    outcome
}

/// Pull every observation from `source` and reconcile them. Games without a
/// region of their own get the source's region.
pub fn reconcile_source(
    source: &dyn RegionSource,
    profile: &ReconcileProfile,
) -> Result<BatchOutcome, SourceError> {
    let raws = source.games()?;
    let profile = ReconcileProfile {
        region: source.region().to_string(),
        ..profile.clone()
    };
    Ok(reconcile_batch(&raws, &profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Correction;

    fn raw(tiers: Vec<RawTier>) -> RawGame {
        RawGame {
            game_id: Some("0042".to_string()),
            name: Some("Lucky 7s".to_string()),
            price: Some("$10".to_string()),
            tiers,
            ..RawGame::default()
        }
    }

    #[test]
    fn reconciles_end_to_end() {
        let mut g = raw(vec![
            RawTier::labelled("$100,000").total("10").remaining("4").odds("1 in 33,990"),
            RawTier::labelled("$50").remaining("200"),
        ]);
        g.url = Some("https://example.test/0042".to_string());
        let out = reconcile_game(&g, &ReconcileProfile::for_region("ID")).unwrap();

        assert_eq!(out.game.game_id, "0042");
        assert_eq!(out.game.state, "id");
        assert_eq!(out.game.price, 10.0);
        assert_eq!(out.game.prizes.len(), 2);
        assert_eq!(out.game.prizes[0].value, 100_000.0);
        assert_eq!(out.game.prizes[1].available, 200);
        assert_eq!(out.game.prizes[1].claimed, 300);
        assert_eq!(out.game.num_tx_initial, Some(339_900));
        assert_eq!(out.estimate_basis, Some(EstimateBasis::TopTierOdds));
        assert_eq!(out.game.url.as_deref(), Some("https://example.test/0042"));
        assert!(out.game.created_at.is_none());
    }

    #[test]
    fn unparseable_value_drops_tier_only() {
        let g = raw(vec![
            RawTier::labelled("$100").total("10").remaining("5"),
            RawTier::labelled("MYSTERY PRIZE").total("999").remaining("1"),
            RawTier::labelled("$5").total("100"),
        ]);
        let out = reconcile_game(&g, &ReconcileProfile::default()).unwrap();
        assert_eq!(out.game.prizes.len(), 2);
        assert_eq!(out.value_errors.len(), 1);
        assert_eq!(out.value_errors[0].label, "MYSTERY PRIZE");
        // Ratio still comes from the $100 tier.
        assert_eq!(out.game.prizes[1].available, 50);
    }

    #[test]
    fn separate_value_text_keeps_label() {
        let g = raw(vec![RawTier::labelled("Top Prize")
            .value("$50 A WEEK FOR LIFE")
            .total("2")
            .remaining("2")]);
        let out = reconcile_game(&g, &ReconcileProfile::default()).unwrap();
        assert_eq!(out.game.prizes[0].prize, "Top Prize");
        assert_eq!(out.game.prizes[0].value, 52_000.0);
    }

    #[test]
    fn correction_applies_before_ratio() {
        let mut g = raw(vec![
            RawTier::labelled("$100").total("10").remaining("5"),
            RawTier::labelled("$1").total("2760").remaining("138000"),
        ]);
        g.name = Some("5X THE CASH".to_string());
        let profile = ReconcileProfile {
            corrections: vec![Correction {
                label: "$1".to_string(),
                game_name_contains: Some("5x the cash".to_string()),
                total: Some(276_000),
                ..Correction::default()
            }],
            ..ReconcileProfile::default()
        };
        let out = reconcile_game(&g, &profile).unwrap();
        assert_eq!(out.game.prizes[1].total(), 276_000);
        assert_eq!(out.game.prizes[1].available, 138_000);
    }

    #[test]
    fn correction_can_force_remaining_estimate() {
        let g = raw(vec![
            RawTier::labelled("$100").total("10").remaining("5"),
            RawTier::labelled("$2").total("100").remaining("100").claimed("0"),
        ]);
        let profile = ReconcileProfile {
            corrections: vec![Correction {
                label: "$2".to_string(),
                estimate_remaining: true,
                ..Correction::default()
            }],
            ..ReconcileProfile::default()
        };
        let out = reconcile_game(&g, &profile).unwrap();
        assert_eq!(out.game.prizes[1].available, 50);
    }

    #[test]
    fn merge_follows_profile() {
        let g = raw(vec![
            RawTier::labelled("$5,000").total("3").remaining("3"),
            RawTier::labelled("$5,000 Second Chance")
                .value("$5,000")
                .total("7")
                .remaining("7"),
        ]);
        let kept = reconcile_game(&g, &ReconcileProfile::default()).unwrap();
        assert_eq!(kept.game.prizes.len(), 2);

        let profile = ReconcileProfile {
            merge_duplicate_tiers: true,
            ..ReconcileProfile::default()
        };
        let merged = reconcile_game(&g, &profile).unwrap();
        assert_eq!(merged.game.prizes.len(), 1);
        assert_eq!(merged.game.prizes[0].total(), 10);
    }

    #[test]
    fn whole_game_errors() {
        let mut g = raw(vec![RawTier::labelled("$5").total("1")]);
        g.game_id = Some("  ".to_string());
        assert_eq!(
            reconcile_game(&g, &ReconcileProfile::default()).unwrap_err(),
            ReconcileError::MissingGameId
        );

        let mut g = raw(vec![RawTier::labelled("$5").total("1")]);
        g.price = Some("free".to_string());
        assert!(matches!(
            reconcile_game(&g, &ReconcileProfile::default()).unwrap_err(),
            ReconcileError::InvalidPrice { .. }
        ));

        let g = raw(vec![RawTier::labelled("???").total("1")]);
        assert!(matches!(
            reconcile_game(&g, &ReconcileProfile::default()).unwrap_err(),
            ReconcileError::NoUsableTiers { .. }
        ));
    }

    #[test]
    fn batch_collects_failures() {
        let good = raw(vec![RawTier::labelled("$5").total("10").remaining("5")]);
        let mut bad = raw(vec![RawTier::labelled("$5").odds("1 in 4")]);
        bad.url = Some("https://example.test/bad".to_string());

        let outcome = reconcile_batch(&[good.clone(), bad, good], &ReconcileProfile::default());
        assert_eq!(outcome.games.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(outcome.failures[0].url.as_deref(), Some("https://example.test/bad"));
        assert_eq!(outcome.into_games().len(), 2);
    }
}
