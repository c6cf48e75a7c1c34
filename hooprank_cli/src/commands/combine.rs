//! The `combine` subcommand: join per-source ranking exports on canonical team names.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Args;
use hooprank_lib::{
    dedup_first_seen, AggregatedRecord, Aggregator, CombineResult, HoopRankError, MetricValue,
    RawNameRecord, Resolver, SourceBatch, TeamMatcher,
};
use serde::Serialize;

use crate::output::{
    build_joined_grid, csv_from_grid, format_score, print_json, print_rows, render_grid,
    OutputFormat, UnmatchedRow,
};

/// Arguments for the `combine` subcommand.
#[derive(Args)]
pub struct CombineArgs {
    /// Ranking source as ID=PATH (CSV, or JSON records); repeat in join order
    #[arg(long = "source", required = true, value_name = "ID=PATH")]
    pub sources: Vec<String>,

    /// CSV column holding the team name
    #[arg(long, default_value = "Team")]
    pub team_column: String,

    /// Keep every row of a source even when several resolve to the same team
    #[arg(long)]
    pub no_dedup: bool,
}

/// One `--source` argument.
#[derive(Debug, PartialEq)]
pub struct SourceArg {
    pub id: String,
    pub path: PathBuf,
}

impl SourceArg {
    pub fn parse(raw: &str) -> Result<Self, HoopRankError> {
        match raw.split_once('=') {
            Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => Ok(Self {
                id: id.trim().to_string(),
                path: PathBuf::from(path.trim()),
            }),
            _ => Err(HoopRankError::InvalidInput(format!(
                "source must look like ID=PATH, got '{}'",
                raw
            ))),
        }
    }
}

#[derive(Serialize)]
struct CombineReport<'a> {
    joined: &'a [AggregatedRecord],
    unmatched: &'a [UnmatchedRow],
}

pub fn run(args: &CombineArgs, matcher: &TeamMatcher, format: &OutputFormat) -> Result<()> {
    let sources = args
        .sources
        .iter()
        .map(|raw| SourceArg::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let batches: Vec<SourceBatch> = sources
        .iter()
        .map(|source| load_source(source, &args.team_column, matcher.resolver(), !args.no_dedup))
        .collect();

    let aggregator = Aggregator::new(matcher.resolver().clone());
    let result = aggregator.combine(&batches);
    let unmatched = suggest_for_unmatched(&result, &batches, matcher);

    match format {
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", render_grid(&build_joined_grid(&result.joined), format));
            if !unmatched.is_empty() {
                println!();
                print_rows(&unmatched, format)?;
            }
        }
        OutputFormat::Json => print_json(&CombineReport {
            joined: &result.joined,
            unmatched: &unmatched,
        }),
        OutputFormat::Csv => {
            print!("{}", csv_from_grid(&build_joined_grid(&result.joined))?);
            if !unmatched.is_empty() {
                eprintln!(
                    "{} unmatched teams omitted from CSV output; rerun with --output table to list them.",
                    unmatched.len()
                );
            }
        }
    }

    Ok(())
}

/// Load one source. Files that cannot be read or parsed become an empty batch.
pub fn load_source(
    source_arg: &SourceArg,
    team_column: &str,
    resolver: &Resolver,
    dedup: bool,
) -> SourceBatch {
    let loaded = match read_source_file(&source_arg.id, &source_arg.path, team_column) {
        Ok(batch) => batch,
        Err(e) => {
            tracing::warn!(
                source = %source_arg.id,
                path = %source_arg.path.display(),
                error = %e,
                "source unavailable, treating as empty"
            );
            return SourceBatch::empty(&source_arg.id);
        }
    };

    tracing::info!(source = %source_arg.id, records = loaded.records.len(), "loaded source");
    if dedup {
        SourceBatch::new(loaded.source, dedup_first_seen(loaded.records, resolver))
    } else {
        loaded
    }
}

fn read_source_file(id: &str, path: &Path, team_column: &str) -> Result<SourceBatch> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(SourceBatch::from_json(id, &contents)?)
    } else {
        parse_csv_source(id, contents.as_bytes(), team_column)
    }
}

/// Parse a CSV export: one row per team, the team column plus metric columns.
/// Empty cells are skipped; numeric cells load as integer or float metrics.
///
/// Metric fields are named `"{id} {header}"` so that columns every export
/// carries, such as `Rank`, stay distinct after the join.
pub fn parse_csv_source(id: &str, reader: impl Read, team_column: &str) -> Result<SourceBatch> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let team_idx = headers
        .iter()
        .position(|h| h.trim() == team_column)
        .ok_or_else(|| anyhow!("no '{}' column in source '{}'", team_column, id))?;
    let fields: Vec<String> = headers
        .iter()
        .map(|h| format!("{} {}", id, h.trim()))
        .collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut record = RawNameRecord::new(id, row.get(team_idx).unwrap_or(""));
        for (i, field) in fields.iter().enumerate() {
            if i == team_idx {
                continue;
            }
            let cell = row.get(i).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            record = record.with_metric(field.as_str(), MetricValue::parse(cell));
        }
        records.push(record);
    }

    Ok(SourceBatch::new(id, records))
}

/// For each unmatched team, the closest canonical name among the sources that
/// lack it. These are the likely missing aliases.
pub fn suggest_for_unmatched(
    result: &CombineResult,
    batches: &[SourceBatch],
    matcher: &TeamMatcher,
) -> Vec<UnmatchedRow> {
    let per_source: Vec<BTreeSet<String>> = batches
        .iter()
        .map(|batch| {
            batch
                .records
                .iter()
                .map(|r| matcher.resolve(&r.raw_name))
                .collect()
        })
        .collect();

    result
        .unmatched
        .iter()
        .map(|team| {
            let candidates: Vec<&str> = per_source
                .iter()
                .filter(|names| !names.contains(team))
                .flatten()
                .map(String::as_str)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let found = matcher.find_closest_match_default(team, &candidates);
            UnmatchedRow {
                team: team.clone(),
                suggestion: found
                    .as_ref()
                    .map(|m| m.candidate.clone())
                    .unwrap_or_default(),
                score: found.map(|m| format_score(m.score)).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use hooprank_lib::NameConfig;

    fn matcher() -> TeamMatcher {
        TeamMatcher::new(Arc::new(NameConfig::builtin().unwrap()))
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_arg_parse() {
        let source_arg = SourceArg::parse("kenpom=data/kenpom.csv").unwrap();
        assert_eq!(source_arg.id, "kenpom");
        assert_eq!(source_arg.path, PathBuf::from("data/kenpom.csv"));
    }

    #[test]
    fn test_source_arg_rejects_malformed() {
        for raw in ["kenpom", "=x.csv", "kenpom=", " = "] {
            let err = SourceArg::parse(raw).unwrap_err();
            assert!(matches!(err, HoopRankError::InvalidInput(_)), "{raw:?}");
        }
    }

    #[test]
    fn test_parse_csv_source_metrics() {
        let csv = "Rank,Team,AdjEM,Conf\n1,Duke,+29.4,ACC\n2,Michigan St,,B10\n";
        let batch = parse_csv_source("kenpom", csv.as_bytes(), "Team").unwrap();

        assert_eq!(batch.source, "kenpom");
        assert_eq!(batch.records.len(), 2);
        let duke = &batch.records[0];
        assert_eq!(duke.raw_name, "Duke");
        assert_eq!(duke.source, "kenpom");
        assert_eq!(duke.metric("kenpom Rank"), Some(&MetricValue::Integer(1)));
        assert_eq!(duke.metric("kenpom AdjEM"), Some(&MetricValue::Float(29.4)));
        assert_eq!(
            duke.metric("kenpom Conf"),
            Some(&MetricValue::Text("ACC".into()))
        );
        assert_eq!(duke.metric("kenpom Team"), None);
        // Empty cells are not recorded.
        assert_eq!(batch.records[1].metric("kenpom AdjEM"), None);
    }

    #[test]
    fn test_parse_csv_source_missing_team_column() {
        let csv = "Rank,School\n1,Duke\n";
        let err = parse_csv_source("kenpom", csv.as_bytes(), "Team").unwrap_err();
        assert!(err.to_string().contains("'Team'"));
    }

    #[test]
    fn test_load_source_dedups_by_canonical_name() {
        let file = write_temp(".csv", "Team,Rank\nMichigan St,12\nMichigan State University,13\n");
        let source_arg = SourceArg {
            id: "bpi".into(),
            path: file.path().to_path_buf(),
        };
        let m = matcher();

        let deduped = load_source(&source_arg, "Team", m.resolver(), true);
        assert_eq!(deduped.records.len(), 1);
        assert_eq!(
            deduped.records[0].metric("bpi Rank"),
            Some(&MetricValue::Integer(12))
        );

        let kept = load_source(&source_arg, "Team", m.resolver(), false);
        assert_eq!(kept.records.len(), 2);
    }

    #[test]
    fn test_shared_column_names_survive_join() {
        let csv_a = "Team,Rank\nDuke,2\n";
        let csv_b = "Team,Rank\nDuke,7\n";
        let kenpom = parse_csv_source("kenpom", csv_a.as_bytes(), "Team").unwrap();
        let bpi = parse_csv_source("bpi", csv_b.as_bytes(), "Team").unwrap();
        let m = matcher();

        let result = Aggregator::new(m.resolver().clone()).combine(&[kenpom, bpi]);
        let grid = build_joined_grid(&result.joined);

        assert_eq!(grid[0], vec!["Team", "kenpom Rank", "bpi Rank"]);
        assert_eq!(grid[1], vec!["Duke", "2", "7"]);
    }

    #[test]
    fn test_load_source_json() {
        let file = write_temp(
            ".json",
            r#"[{"raw_name": "Duke", "metrics": [{"field": "NET", "value": 3}]}]"#,
        );
        let source_arg = SourceArg {
            id: "net".into(),
            path: file.path().to_path_buf(),
        };
        let batch = load_source(&source_arg, "Team", matcher().resolver(), true);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].source, "net");
        assert_eq!(batch.records[0].metric("NET"), Some(&MetricValue::Integer(3)));
    }

    #[test]
    fn test_load_source_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source_arg = SourceArg {
            id: "sagarin".into(),
            path: dir.path().join("missing.csv"),
        };
        let batch = load_source(&source_arg, "Team", matcher().resolver(), true);
        assert_eq!(batch.source, "sagarin");
        assert!(batch.records.is_empty());
    }

    #[test]
    fn test_unreadable_source_does_not_block_others() {
        let good = write_temp(".csv", "Team,Rank\nDuke,1\nGonzaga,2\n");
        let m = matcher();
        let batches = vec![
            load_source(
                &SourceArg {
                    id: "kenpom".into(),
                    path: good.path().to_path_buf(),
                },
                "Team",
                m.resolver(),
                true,
            ),
            load_source(
                &SourceArg {
                    id: "bpi".into(),
                    path: PathBuf::from("/nonexistent/bpi.csv"),
                },
                "Team",
                m.resolver(),
                true,
            ),
        ];

        let result = Aggregator::new(m.resolver().clone()).combine(&batches);
        assert!(result.joined.is_empty());
        assert_eq!(
            result.unmatched,
            BTreeSet::from(["Duke".to_string(), "Gonzaga".to_string()])
        );
    }

    #[test]
    fn test_suggestions_come_from_sources_lacking_the_team() {
        let m = matcher();
        let batches = vec![
            SourceBatch::new(
                "a",
                vec![
                    RawNameRecord::new("a", "Duke"),
                    RawNameRecord::new("a", "Gonzaga"),
                ],
            ),
            SourceBatch::new(
                "b",
                vec![
                    RawNameRecord::new("b", "Duke"),
                    RawNameRecord::new("b", "Gonzga"),
                ],
            ),
        ];
        let result = Aggregator::new(m.resolver().clone()).combine(&batches);
        let rows = suggest_for_unmatched(&result, &batches, &m);

        assert_eq!(rows.len(), 2);
        let gonzaga = rows.iter().find(|r| r.team == "Gonzaga").unwrap();
        assert_eq!(gonzaga.suggestion, "Gonzga");
        let misspelled = rows.iter().find(|r| r.team == "Gonzga").unwrap();
        assert_eq!(misspelled.suggestion, "Gonzaga");
    }

    #[test]
    fn test_no_suggestion_below_threshold() {
        let m = matcher();
        let batches = vec![
            SourceBatch::new("a", vec![RawNameRecord::new("a", "Duke")]),
            SourceBatch::new("b", vec![RawNameRecord::new("b", "Xavier")]),
        ];
        let result = Aggregator::new(m.resolver().clone()).combine(&batches);
        let rows = suggest_for_unmatched(&result, &batches, &m);
        assert!(rows.iter().all(|r| r.suggestion.is_empty() && r.score.is_empty()));
    }
}
