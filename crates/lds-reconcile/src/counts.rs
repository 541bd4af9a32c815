//! Scalar parsing for raw tier fields.
//!
//! Anything that does not parse cleanly is `None` ("missing"), never an
//! error: the count reconciler decides what a gap means.

use std::sync::LazyLock;

use regex::Regex;

static RE_ODDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:1\s*(?:in|:|-in-|-)\s*)?([0-9][0-9,]*(?:\.[0-9]+)?|\.[0-9]+)$").unwrap()
});

fn strip_grouping(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

/// A non-negative prize count (`"1,350,500"`, `"42"`, `"42.0"`).
pub fn parse_count(raw: &str) -> Option<i64> {
    let cleaned = strip_grouping(raw);
    if cleaned.is_empty() {
        return None;
    }
    let n = match cleaned.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = cleaned.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
                return None;
            }
            f as i64
        }
    };
    (n >= 0).then_some(n)
}

/// Odds as the `N` of "1 in N". Accepts `"1 in 4.25"`, `"1:4"`,
/// `"1-in-3.20"` and a bare `"4.25"`. Non-positive odds are missing.
pub fn parse_odds(raw: &str) -> Option<f64> {
    let caps = RE_ODDS.captures(raw.trim())?;
    let n: f64 = caps[1].replace(',', "").parse().ok()?;
    (n.is_finite() && n > 0.0).then_some(n)
}

/// A plain currency amount (`"$1,000"`, `"10"`, `"$2.50"`).
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = strip_grouping(raw)
        .trim_start_matches('$')
        .to_string();
    if cleaned.is_empty() {
        return None;
    }
    let v: f64 = cleaned.parse().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_grouping() {
        assert_eq!(parse_count("1,350,500"), Some(1_350_500));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count("42.0"), Some(42));
    }

    #[test]
    fn bad_counts_are_missing() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("4.5"), None);
    }

    #[test]
    fn odds_forms() {
        assert_eq!(parse_odds("1 in 4.25"), Some(4.25));
        assert_eq!(parse_odds("1:4"), Some(4.0));
        assert_eq!(parse_odds("1-in-3.20"), Some(3.2));
        assert_eq!(parse_odds("1 IN 480,000"), Some(480_000.0));
        assert_eq!(parse_odds("4.25"), Some(4.25));
    }

    #[test]
    fn non_positive_odds_are_missing() {
        assert_eq!(parse_odds("0"), None);
        assert_eq!(parse_odds("1 in 0"), None);
        assert_eq!(parse_odds("-2"), None);
        assert_eq!(parse_odds("evens"), None);
    }

    #[test]
    fn currency() {
        assert_eq!(parse_currency("$1,000"), Some(1000.0));
        assert_eq!(parse_currency("$ 2.50"), Some(2.5));
        assert_eq!(parse_currency("10"), Some(10.0));
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("FREE"), None);
    }
}
