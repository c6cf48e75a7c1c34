//! The `resolve` subcommand: raw name to canonical name.

use anyhow::Result;
use clap::Args;
use hooprank_lib::TeamMatcher;

use crate::output::{print_rows, NameRow, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Raw team names as a ranking provider spells them
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn run(args: &ResolveArgs, matcher: &TeamMatcher, format: &OutputFormat) -> Result<()> {
    let rows: Vec<NameRow> = args
        .names
        .iter()
        .map(|name| NameRow {
            raw: name.clone(),
            canonical: matcher.resolve(name),
        })
        .collect();
    print_rows(&rows, format)
}
