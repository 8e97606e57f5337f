//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Vet a password against a dictionary of common words.
///
/// Passvet assembles a local dictionary from per-language wordlist files
/// and trending-search keywords, then runs the candidate password through
/// four policy gates: minimum length, no sequential-character runs,
/// character-class diversity, and no dictionary-word match.
#[derive(Parser, Debug)]
#[command(name = "passvet")]
#[command(author, version, about)]
pub struct Args {
    /// Candidate password to vet
    pub password: String,

    /// Root directory for the wordlist cache
    #[arg(short = 'd', long, default_value = ".")]
    pub cache_dir: PathBuf,

    /// Skip harvesting and downloads; use only locally cached wordlists
    #[arg(long)]
    pub offline: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
