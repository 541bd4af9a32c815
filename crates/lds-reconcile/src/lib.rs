//! lds-reconcile
//!
//! Prize-inventory reconciliation for scratch-ticket games.
//!
//! Turns the raw, often self-inconsistent tier observations a region
//! publishes into a complete [`lds_schemas::Game`]:
//! - prize labels become numeric values (annuities, "million" shorthand,
//!   free tickets)
//! - duplicate-value tiers are folded together (per region)
//! - missing or stale totals / remaining counts are repaired from the
//!   remaining ratio carried tier-to-tier
//! - tickets printed at launch is estimated from the published odds
//!
//! Deterministic, pure logic. No IO. Tier order is significant.

mod counts;
mod engine;
mod error;
mod estimate;
mod game;
mod merge;
pub mod quality;
mod types;
mod value;

pub use counts::{parse_count, parse_currency, parse_odds};
pub use engine::{reconcile_counts, RatioTracker};
pub use error::{GameFailure, ReconcileError, ValueParseError};
pub use estimate::{estimate_initial_tickets, EstimateBasis};
pub use game::{reconcile_batch, reconcile_game, reconcile_source, BatchOutcome, ReconciledGame};
pub use merge::merge_tiers;
pub use quality::{build_quality_report, QualityReport};
pub use types::{
    Correction, OddsBasis, RatioPolicy, ReconcileProfile, ReconciledTier, TierCounts,
    DEFAULT_LIFE_TERM_YEARS, DEFAULT_MILLION_MULTIPLIER,
};
pub use value::{normalize_value, ValueRules};
