//! Batch quality report for reconciled games.
//!
//! Accepts a slice of [`Game`] and produces a [`QualityReport`] covering:
//! - total game and prize counts
//! - duplicate `game_id`s
//! - games whose `num_tx_initial` is below the prizes printed
//!   (`Σ available + claimed`), usually a source-format regression
//! - games with no `num_tx_initial`
//! - games with an empty prize list
//!
//! Monitoring only: nothing here fails a batch.

use std::collections::BTreeMap;
use std::fmt;

use lds_schemas::Game;

/// A `game_id` that appears more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIssue {
    pub game_id: String,
    /// Always >= 2.
    pub count: usize,
}

/// `num_tx_initial` is smaller than the number of prizes printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndercountIssue {
    pub game_id: String,
    pub num_tx_initial: i64,
    pub prizes_printed: i64,
}

/// Summary produced by [`build_quality_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityReport {
    pub total_games: usize,
    pub total_prize_tiers: usize,
    /// Sorted by `game_id`.
    pub duplicates: Vec<DuplicateIssue>,
    /// In input order.
    pub undercounts: Vec<UndercountIssue>,
    /// Game ids without an initial-ticket estimate, in input order.
    pub missing_estimates: Vec<String>,
    /// Game ids with no prizes, in input order.
    pub empty_prize_lists: Vec<String>,
}

impl QualityReport {
    /// Returns `true` when the report contains no issues of any kind.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.undercounts.is_empty()
            && self.missing_estimates.is_empty()
            && self.empty_prize_lists.is_empty()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QualityReport {{")?;
        writeln!(f, "  total_games: {}", self.total_games)?;
        writeln!(f, "  total_prize_tiers: {}", self.total_prize_tiers)?;
        writeln!(f, "  duplicates: {}", self.duplicates.len())?;
        for d in &self.duplicates {
            writeln!(f, "    game_id={} count={}", d.game_id, d.count)?;
        }
        writeln!(f, "  undercounts: {}", self.undercounts.len())?;
        for u in &self.undercounts {
            writeln!(
                f,
                "    game_id={} num_tx_initial={} prizes_printed={}",
                u.game_id, u.num_tx_initial, u.prizes_printed
            )?;
        }
        writeln!(f, "  missing_estimates: {}", self.missing_estimates.len())?;
        for id in &self.missing_estimates {
            writeln!(f, "    game_id={id}")?;
        }
        writeln!(f, "  empty_prize_lists: {}", self.empty_prize_lists.len())?;
        for id in &self.empty_prize_lists {
            writeln!(f, "    game_id={id}")?;
        }
        write!(f, "}}")
    }
}

/// Build a [`QualityReport`] from a batch of games. Deterministic; does not
/// mutate the input.
pub fn build_quality_report(games: &[Game]) -> QualityReport {
    let mut id_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for g in games {
        *id_counts.entry(g.game_id.as_str()).or_insert(0) += 1;
    }
    let duplicates = id_counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(id, count)| DuplicateIssue {
            game_id: id.to_string(),
            count,
        })
        .collect();

    let mut undercounts = Vec::new();
    let mut missing_estimates = Vec::new();
    let mut empty_prize_lists = Vec::new();

    for g in games {
        if g.prizes.is_empty() {
            empty_prize_lists.push(g.game_id.clone());
        }
        match g.num_tx_initial {
            None => missing_estimates.push(g.game_id.clone()),
            Some(n) => {
                let printed = g.prizes_printed();
                if n < printed {
                    undercounts.push(UndercountIssue {
                        game_id: g.game_id.clone(),
                        num_tx_initial: n,
                        prizes_printed: printed,
                    });
                }
            }
        }
    }

    QualityReport {
        total_games: games.len(),
        total_prize_tiers: games.iter().map(|g| g.prizes.len()).sum(),
        duplicates,
        undercounts,
        missing_estimates,
        empty_prize_lists,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
