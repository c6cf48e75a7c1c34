use anyhow::Result;
use clap::Args;
use hooprank_lib::TeamMatcher;

use crate::output::{print_rows, OutputFormat, VariationRow};

#[derive(Args)]
pub struct VariationsArgs {
    /// Team name to expand
    pub name: String,
}

pub fn run(args: &VariationsArgs, matcher: &TeamMatcher, format: &OutputFormat) -> Result<()> {
    let rows: Vec<VariationRow> = matcher
        .variations(&args.name)
        .into_iter()
        .map(|variation| VariationRow { variation })
        .collect();
    print_rows(&rows, format)
}
