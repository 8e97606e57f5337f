//! CLI entry point for the passvet tool.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use passvet_core::{
    GoogleTrendsProvider, PasswordPolicyValidator, ResourceCache, TrendKeywordHarvester, Verdict,
    WordlistAggregator,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(cache_dir = %args.cache_dir.display(), offline = args.offline, "CLI arguments parsed");
    info!("Passvet starting");

    // Assemble the dictionary: trend harvest + wordlist downloads + local
    // cache scan. Every network failure degrades softly; an offline run
    // falls back to whatever the cache already holds.
    let cache = Arc::new(ResourceCache::new(&args.cache_dir));
    let provider = Arc::new(GoogleTrendsProvider::new());
    let harvester = TrendKeywordHarvester::new(provider);
    let aggregator = WordlistAggregator::new(cache, harvester).offline(args.offline);

    let dictionary = aggregator.build().await;
    info!(tokens = dictionary.len(), "dictionary ready");

    let validator = PasswordPolicyValidator::new();
    match validator.evaluate(&args.password, &dictionary) {
        Verdict::Accepted => {
            println!("accepted");
            Ok(ExitCode::SUCCESS)
        }
        Verdict::Rejected(gate) => {
            println!("rejected: {gate}");
            Ok(ExitCode::FAILURE)
        }
    }
}
