use anyhow::{bail, Context, Result};
use lds_reconcile::build_quality_report;
use lds_schemas::{deserialize_many, validate, validate_game, Game};
use serde_json::Value;

use super::read_input;

/// `lds validate`: print every field error, fail when there are any.
pub fn validate_file(input: &str) -> Result<()> {
    let raw = read_input(input)?;
    let doc: Value = serde_json::from_str(raw.trim()).context("input must be valid JSON")?;

    let records: Vec<&Value> = match &doc {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut error_count = 0usize;
    for (i, record) in records.iter().enumerate() {
        for e in validate(record) {
            println!("record {i}: {e}");
            error_count += 1;
        }
    }

    // Typed range checks only make sense once the shape is right.
    if error_count == 0 {
        let games = deserialize_many(&raw)?;
        for (i, g) in games.iter().enumerate() {
            for e in validate_game(g) {
                println!("record {i}: {e}");
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        bail!("{error_count} field error(s) in {input}");
    }
    println!("ok records={}", records.len());
    Ok(())
}

/// `lds quality`: batch report, then one return-to-player line per game.
pub fn quality(input: &str) -> Result<()> {
    let raw = read_input(input)?;
    let games = deserialize_many(&raw)?;

    let report = build_quality_report(&games);
    println!("{report}");
    if !report.is_clean() {
        tracing::warn!("quality report has issues");
    }

    for g in &games {
        println!(
            "game_id={} price={} rtp_initial={} rtp_remaining={}",
            g.game_id,
            g.price,
            fmt_ratio(rtp_initial(g)),
            fmt_ratio(rtp_remaining(g))
        );
    }
    Ok(())
}

fn fmt_ratio(v: Option<f64>) -> String {
    v.map(|r| format!("{r:.4}")).unwrap_or_else(|| "-".to_string())
}

/// Prize value printed per currency unit of tickets printed.
fn rtp_initial(g: &Game) -> Option<f64> {
    let tickets = g.num_tx_initial? as f64;
    let cost = tickets * g.price;
    if cost <= 0.0 {
        return None;
    }
    let value: f64 = g.prizes.iter().map(|p| p.value * p.total() as f64).sum();
    Some(value / cost)
}

/// Prize value still outstanding per currency unit of tickets still unsold.
///
/// Unsold tickets are estimated as `num_tx_initial` scaled by the share of
/// prizes still available.
fn rtp_remaining(g: &Game) -> Option<f64> {
    let tickets = g.num_tx_initial? as f64;
    let printed = g.prizes_printed();
    if printed <= 0 {
        return None;
    }
    let unsold = tickets * g.prizes_available() as f64 / printed as f64;
    let cost = unsold * g.price;
    if cost <= 0.0 {
        return None;
    }
    let value: f64 = g.prizes.iter().map(|p| p.value * p.available as f64).sum();
    Some(value / cost)
}
