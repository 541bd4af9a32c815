use crate::types::TierCounts;

/// Fold each tier whose value equals the most recently kept tier's value
/// into that tier. One pass, order-preserving.
///
/// Each side's gaps are first filled from its claimed count. Totals and
/// remaining counts are then summed. Two tiers that still know different
/// counts (one only a total, the other only a remaining) are kept apart,
/// since no sum of them would be a true count. Per-tier odds combine as
/// `1 / (1/a + 1/b)`.
pub fn merge_tiers(tiers: Vec<TierCounts>) -> Vec<TierCounts> {
    let mut out: Vec<TierCounts> = Vec::with_capacity(tiers.len());
    for tier in tiers {
        if let Some(last) = out.last_mut() {
            if last.value == tier.value {
                if let Some(merged) = folded(last, &tier) {
                    *last = merged;
                    continue;
                }
            }
        }
        out.push(tier);
    }
    out
}

fn folded(kept: &TierCounts, next: &TierCounts) -> Option<TierCounts> {
    let (kept_total, kept_remaining) = kept.counts_with_claimed();
    let (next_total, next_remaining) = next.counts_with_claimed();

    Some(TierCounts {
        label: kept.label.clone(),
        value: kept.value,
        total: sum_matching(kept_total, next_total)?,
        remaining: sum_matching(kept_remaining, next_remaining)?,
        claimed: match (kept.claimed, next.claimed) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        },
        odds: match (kept.odds, next.odds) {
            (Some(a), Some(b)) => Some(1.0 / (1.0 / a + 1.0 / b)),
            _ => None,
        },
    })
}

/// `Some(sum)` when both sides know the count, `Some(None)` when neither
/// does, `None` when only one does (or the sum overflows).
fn sum_matching(a: Option<i64>, b: Option<i64>) -> Option<Option<i64>> {
    match (a, b) {
        (Some(a), Some(b)) => a.checked_add(b).map(Some),
        (None, None) => Some(None),
        _ => None,
    }
}
