mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hooprank_lib::{NameConfig, TeamMatcher};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "hooprank")]
#[command(about = "Resolve college basketball team names and join rankings across sources")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// YAML name configuration replacing the built-in tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve raw team names to canonical names
    Resolve(commands::resolve::ResolveArgs),
    /// List the spelling variations of a team name
    Variations(commands::variations::VariationsArgs),
    /// Check whether two names refer to the same team
    SameTeam(commands::same_team::SameTeamArgs),
    /// Find the closest candidate name by fuzzy similarity
    Closest(commands::closest::ClosestArgs),
    /// Join per-source ranking files on canonical team names
    Combine(commands::combine::CombineArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hooprank=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let config = match &cli.config {
        Some(path) => NameConfig::from_path(path)
            .with_context(|| format!("loading name configuration from {}", path.display()))?,
        None => NameConfig::builtin()?,
    };
    let matcher = TeamMatcher::new(Arc::new(config));

    match &cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &matcher, &format)?,
        Commands::Variations(args) => commands::variations::run(args, &matcher, &format)?,
        Commands::SameTeam(args) => commands::same_team::run(args, &matcher, &format)?,
        Commands::Closest(args) => commands::closest::run(args, &matcher, &format)?,
        Commands::Combine(args) => commands::combine::run(args, &matcher, &format)?,
    }

    Ok(())
}
