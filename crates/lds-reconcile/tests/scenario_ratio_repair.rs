use lds_ingest::{RawGame, RawTier};
use lds_reconcile::*;

fn game(tiers: Vec<RawTier>) -> RawGame {
    RawGame {
        game_id: Some("0042".to_string()),
        name: Some("Lucky 7s".to_string()),
        price: Some("$10".to_string()),
        tiers,
        ..RawGame::default()
    }
}

#[test]
fn scenario_missing_total_filled_from_previous_tier_ratio() {
    let raw = game(vec![
        RawTier::labelled("$100,000").total("10").remaining("4"),
        RawTier::labelled("$50").remaining("200"),
    ]);

    let out = reconcile_game(&raw, &ReconcileProfile::for_region("id")).unwrap();
    let p = &out.game.prizes[1];
    assert_eq!(p.total(), 500);
    assert_eq!(p.available, 200);
    assert_eq!(p.claimed, 300);
}

#[test]
fn scenario_stale_total_below_remaining_is_replaced() {
    let raw = game(vec![
        RawTier::labelled("$1,000").total("20").remaining("10"),
        RawTier::labelled("$20").total("100").remaining("120"),
    ]);

    let out = reconcile_game(&raw, &ReconcileProfile::default()).unwrap();
    let p = &out.game.prizes[1];
    assert_eq!(p.total(), 240);
    assert_eq!(p.claimed, 120);
}

#[test]
fn scenario_every_prize_is_internally_consistent() {
    let raw = game(vec![
        RawTier::labelled("$50 A WEEK FOR LIFE").total("4").remaining("3"),
        RawTier::labelled("$1,000").remaining("30"),
        RawTier::labelled("$100").total("1,000"),
        RawTier::labelled("$20").total("5,000").claimed("1,250"),
        RawTier::labelled("FREE TICKET").total("90,000").remaining("95,000"),
    ]);

    let out = reconcile_game(&raw, &ReconcileProfile::default()).unwrap();
    assert_eq!(out.game.prizes.len(), 5);
    for p in &out.game.prizes {
        assert!(p.available >= 0, "{p:?}");
        assert!(p.claimed >= 0, "{p:?}");
    }
    assert_eq!(out.game.prizes[0].value, 52_000.0);
    assert_eq!(out.game.prizes[4].value, 10.0);
}

#[test]
fn scenario_pooled_policy_uses_one_ratio_for_all_gaps() {
    let raw = game(vec![
        RawTier::labelled("$1,000").total("10").remaining("2"),
        RawTier::labelled("$100").total("100"),
        RawTier::labelled("$10").total("90").remaining("48"),
        RawTier::labelled("$5").total("1,000"),
    ]);
    let profile = ReconcileProfile {
        ratio_policy: RatioPolicy::Pooled,
        ..ReconcileProfile::default()
    };

    let out = reconcile_game(&raw, &profile).unwrap();
    assert_eq!(out.game.prizes[1].available, 50);
    assert_eq!(out.game.prizes[3].available, 500);

    // Most-recent policy carries the $10 tier's ratio into the $5 tier instead.
    let out = reconcile_game(&raw, &ReconcileProfile::default()).unwrap();
    assert_eq!(out.game.prizes[1].available, 20);
    assert_eq!(out.game.prizes[3].available, 533);
}
