use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lds")]
#[command(about = "Scratch-ticket inventory normalization CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile raw observations into games and print them as JSON
    Reconcile {
        /// Region code (e.g. id, pa); selects the reconcile profile
        #[arg(long)]
        region: String,

        /// Observations file (JSON array or JSON lines)
        #[arg(long)]
        input: String,

        /// Extra config layers, merged over the shipped defaults in order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Pretty-print the output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Fail instead of warn when config carries keys nothing reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Check a games file against the exchange format; fails on any field error
    Validate {
        #[arg(long)]
        input: String,
    },

    /// Print the batch quality report and per-game return-to-player
    Quality {
        #[arg(long)]
        input: String,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> region overrides -> local)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience, e.g. RUST_LOG).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Reconcile {
            region,
            input,
            config_paths,
            pretty,
            strict_config,
        } => commands::reconcile::run(&region, &input, &config_paths, pretty, strict_config)?,

        Commands::Validate { input } => commands::report::validate_file(&input)?,

        Commands::Quality { input } => commands::report::quality(&input)?,

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = lds_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
