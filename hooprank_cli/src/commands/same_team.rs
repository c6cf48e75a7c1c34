use anyhow::Result;
use clap::Args;
use hooprank_lib::TeamMatcher;

use crate::output::{print_rows, OutputFormat, SameTeamRow};

#[derive(Args)]
pub struct SameTeamArgs {
    /// First team name
    pub first: String,
    /// Second team name
    pub second: String,
}

pub fn run(args: &SameTeamArgs, matcher: &TeamMatcher, format: &OutputFormat) -> Result<()> {
    let row = SameTeamRow {
        first: args.first.clone(),
        second: args.second.clone(),
        same_team: matcher.are_same_team(&args.first, &args.second),
    };
    print_rows(&[row], format)
}
