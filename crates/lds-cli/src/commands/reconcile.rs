use anyhow::{Context, Result};
use chrono::Utc;
use lds_ingest::JsonFileSource;
use lds_reconcile::reconcile_source;
use lds_schemas::{serialize_many, serialize_many_pretty};

use super::load_profile;

/// `lds reconcile`: games to stdout, failures and the summary to stderr.
pub fn run(
    region: &str,
    input: &str,
    config_paths: &[String],
    pretty: bool,
    strict_config: bool,
) -> Result<()> {
    let profile = load_profile(region, config_paths, strict_config)?;

    let source = JsonFileSource::new(profile.region.clone(), input);
    let outcome = reconcile_source(&source, &profile)
        .with_context(|| format!("failed to load observations: {input}"))?;

    for failure in &outcome.failures {
        eprintln!("failed: {failure}");
    }

    let summary = format!(
        "reconciled={} failed={} skipped_tiers={}",
        outcome.games.len(),
        outcome.failures.len(),
        outcome.skipped_tiers()
    );

    let now = Utc::now();
    let mut games = outcome.into_games();
    for g in &mut games {
        g.created_at = Some(now);
        g.updated_at = Some(now);
    }

    let text = if pretty {
        serialize_many_pretty(&games)?
    } else {
        serialize_many(&games)?
    };
    println!("{text}");
    eprintln!("{summary}");

    Ok(())
}
