//! The `closest` subcommand: best fuzzy candidate for one name.

use anyhow::Result;
use clap::Args;
use hooprank_lib::error::validate_threshold;
use hooprank_lib::TeamMatcher;

use crate::output::{build_closest_row, print_rows, OutputFormat};

#[derive(Args)]
pub struct ClosestArgs {
    /// Team name to match
    pub name: String,

    /// Candidate name; repeat for each candidate
    #[arg(long = "candidate", required = true)]
    pub candidates: Vec<String>,

    /// Minimum similarity (0.0-1.0); defaults to the configured threshold
    #[arg(long)]
    pub threshold: Option<f64>,
}

pub fn run(args: &ClosestArgs, matcher: &TeamMatcher, format: &OutputFormat) -> Result<()> {
    let threshold = validate_threshold(args.threshold.unwrap_or_else(|| matcher.threshold()))?;

    let found = matcher.find_closest_match(&args.name, &args.candidates, threshold);
    if found.is_none() {
        eprintln!(
            "No candidate for '{}' reached threshold {:.2}.",
            args.name, threshold
        );
    }
    print_rows(&[build_closest_row(&args.name, found.as_ref())], format)
}
