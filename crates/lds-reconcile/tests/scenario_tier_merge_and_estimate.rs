use lds_ingest::{RawGame, RawTier};
use lds_reconcile::*;

#[test]
fn scenario_adjacent_equal_value_tiers_merge_before_reconciliation() {
    let raw = RawGame {
        game_id: Some("1488".to_string()),
        name: Some("$3 Million Mega Stacks".to_string()),
        price: Some("30".to_string()),
        tiers: vec![
            RawTier::labelled("$3 Million").total("4").remaining("3").odds("1 in 1,800,000"),
            RawTier::labelled("$5,000").total("3").remaining("1").odds("1 in 40,000"),
            RawTier::labelled("$5,000").total("7").remaining("3").odds("1 in 40,000"),
            RawTier::labelled("$30").total("200,000"),
        ],
        ..RawGame::default()
    };
    let profile = ReconcileProfile {
        merge_duplicate_tiers: true,
        ratio_policy: RatioPolicy::Pooled,
        odds_basis: OddsBasis::TopTier,
        ..ReconcileProfile::default()
    };

    let out = reconcile_game(&raw, &profile).unwrap();
    let prizes = &out.game.prizes;
    assert_eq!(prizes.len(), 3);
    assert_eq!(prizes[0].value, 3_000_000.0);
    assert_eq!(prizes[1].total(), 10);
    assert_eq!(prizes[1].available, 4);
    // (3 + 4) / (4 + 10)
    assert_eq!(prizes[2].available, 100_000);

    assert_eq!(out.game.num_tx_initial, Some(7_200_000));
    assert_eq!(out.estimate_basis, Some(EstimateBasis::TopTierOdds));
}

#[test]
fn scenario_merging_never_breaks_a_game_that_reconciles_unmerged() {
    let raw = RawGame {
        game_id: Some("1".to_string()),
        price: Some("5".to_string()),
        tiers: vec![
            RawTier::labelled("$100").total("10").remaining("5"),
            RawTier::labelled("$5").total("3"),
            RawTier::labelled("$5").remaining("7"),
            RawTier::labelled("$5").total("6").claimed("2"),
            RawTier::labelled("$5").total("4").remaining("1"),
        ],
        ..RawGame::default()
    };
    let unmerged = reconcile_game(&raw, &ReconcileProfile::default()).unwrap();
    assert_eq!(unmerged.game.prizes.len(), 5);

    let profile = ReconcileProfile {
        merge_duplicate_tiers: true,
        ..ReconcileProfile::default()
    };
    let merged = reconcile_game(&raw, &profile).unwrap();
    let prizes = &merged.game.prizes;
    // total-only and remaining-only tiers stay apart; the last two fold.
    assert_eq!(prizes.len(), 4);
    assert_eq!(prizes[2].available, 7);
    assert_eq!(prizes[3].total(), 10);
    assert_eq!(prizes[3].available, 5);
}

#[test]
fn scenario_merge_is_identity_on_distinct_values() {
    let tiers = vec![
        TierCounts::new("$100", 100.0).with_total(10),
        TierCounts::new("$50", 50.0).with_remaining(3),
        TierCounts::new("$100", 100.0).with_total(2),
    ];
    assert_eq!(merge_tiers(tiers.clone()), tiers);
}

#[test]
fn scenario_published_printed_count_beats_odds() {
    let raw = RawGame {
        game_id: Some("0099".to_string()),
        price: Some("$10".to_string()),
        overall_odds: Some("1 in 3.5".to_string()),
        tickets_printed: Some("339,900".to_string()),
        tiers: vec![RawTier::labelled("$100,000").total("10").remaining("4")],
        ..RawGame::default()
    };
    let out = reconcile_game(&raw, &ReconcileProfile::default()).unwrap();
    assert_eq!(out.game.num_tx_initial, Some(339_900));
    assert_eq!(out.estimate_basis, Some(EstimateBasis::TicketsPrinted));
}
