//! Prize label → single-win value.
//!
//! Rules are tried in a fixed order, first match wins:
//! 1. annuity / term payouts (`"$50 A WEEK FOR LIFE"`, `"$250K/YR/20YRS"`,
//!    `"$1 MILLION A YEAR FOR LIFE"`)
//! 2. million shorthand (`"$3 MILLION"`)
//! 3. ticket prizes (`"FREE TICKET"`), worth the game's price
//! 4. plain currency (`"$1,000"`)

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{DEFAULT_LIFE_TERM_YEARS, DEFAULT_MILLION_MULTIPLIER};

static RE_ANNUITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:(k)|(million|mil))?\s*(?:a|per|/|every)\s*(week|wk|month|mo|year|yr)s?\b",
    )
    .unwrap()
});

static RE_LIFE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\blife\b").unwrap());

static RE_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:years?|yrs?)\b").unwrap());

static RE_MILLION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:million|mil)\b").unwrap()
});

static RE_TICKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btickets?\b").unwrap());

static RE_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?|\.[0-9]+)\s*(k)?$").unwrap()
});

/// Region constants used while normalizing values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRules {
    /// Years a "for life" annuity is paid over.
    pub life_term_years: u32,
    /// Currency units per "million" (some regions use it for 100,000).
    pub million_multiplier: f64,
}

impl Default for ValueRules {
    fn default() -> Self {
        Self {
            life_term_years: DEFAULT_LIFE_TERM_YEARS,
            million_multiplier: DEFAULT_MILLION_MULTIPLIER,
        }
    }
}

/// Normalize a prize label to a value in currency units.
///
/// `price` is the game's ticket price, used for ticket prizes.
/// Returns `None` when no rule matches.
pub fn normalize_value(label: &str, price: f64, rules: &ValueRules) -> Option<f64> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    annuity_value(label, rules)
        .or_else(|| million_value(label, rules))
        .or_else(|| ticket_value(label, price))
        .or_else(|| plain_value(label))
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn amount(digits: &str, thousands: bool) -> Option<f64> {
    let n: f64 = digits.replace(',', "").parse().ok()?;
    Some(if thousands { n * 1_000.0 } else { n })
}

fn annuity_value(label: &str, rules: &ValueRules) -> Option<f64> {
    let caps = RE_ANNUITY.captures(label)?;
    let mut per_payment = amount(&caps[1], caps.get(2).is_some())?;
    if caps.get(3).is_some() {
        per_payment *= rules.million_multiplier;
    }
    let per_year = match caps[4].to_ascii_lowercase().as_str() {
        "week" | "wk" => 52.0,
        "month" | "mo" => 12.0,
        _ => 1.0,
    };

    // Term is stated after the cadence; no stated term means "for life".
    let rest = &label[caps.get(0).map_or(0, |m| m.end())..];
    let years = if RE_LIFE.is_match(rest) {
        f64::from(rules.life_term_years)
    } else if let Some(t) = RE_TERM.captures(rest) {
        t[1].parse::<f64>().ok()?
    } else {
        f64::from(rules.life_term_years)
    };

    Some(per_payment * per_year * years)
}

fn million_value(label: &str, rules: &ValueRules) -> Option<f64> {
    let caps = RE_MILLION.captures(label)?;
    let f: f64 = caps[1].parse().ok()?;
    Some(f * rules.million_multiplier)
}

fn ticket_value(label: &str, price: f64) -> Option<f64> {
    RE_TICKET.is_match(label).then_some(price)
}

fn plain_value(label: &str) -> Option<f64> {
    let caps = RE_PLAIN.captures(label)?;
    amount(&caps[1], caps.get(2).is_some())
}
