use anyhow::Result;
use hooprank_lib::{AggregatedRecord, ClosestMatch};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct NameRow {
    #[tabled(rename = "Raw")]
    #[serde(rename = "Raw")]
    pub raw: String,
    #[tabled(rename = "Canonical")]
    #[serde(rename = "Canonical")]
    pub canonical: String,
}

#[derive(Tabled, Serialize)]
pub struct VariationRow {
    #[tabled(rename = "Variation")]
    #[serde(rename = "Variation")]
    pub variation: String,
}

#[derive(Tabled, Serialize)]
pub struct SameTeamRow {
    #[tabled(rename = "First")]
    #[serde(rename = "First")]
    pub first: String,
    #[tabled(rename = "Second")]
    #[serde(rename = "Second")]
    pub second: String,
    #[tabled(rename = "Same Team")]
    #[serde(rename = "Same Team")]
    pub same_team: bool,
}

#[derive(Tabled, Serialize)]
pub struct ClosestRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Match")]
    #[serde(rename = "Match")]
    pub matched: String,
    #[tabled(rename = "Score")]
    #[serde(rename = "Score")]
    pub score: String,
}

#[derive(Tabled, Serialize)]
pub struct UnmatchedRow {
    #[tabled(rename = "Unmatched Team")]
    #[serde(rename = "Unmatched Team")]
    pub team: String,
    #[tabled(rename = "Closest Other Name")]
    #[serde(rename = "Closest Other Name")]
    pub suggestion: String,
    #[tabled(rename = "Score")]
    #[serde(rename = "Score")]
    pub score: String,
}

// -- Row builders --

pub fn build_closest_row(name: &str, found: Option<&ClosestMatch>) -> ClosestRow {
    ClosestRow {
        name: name.to_string(),
        matched: found.map(|m| m.candidate.clone()).unwrap_or_default(),
        score: found.map(|m| format_score(m.score)).unwrap_or_default(),
    }
}

/// Header plus one row per joined team. Columns are "Team" followed by every
/// metric field in first-seen order; missing fields render empty.
pub fn build_joined_grid(rows: &[AggregatedRecord]) -> Vec<Vec<String>> {
    let mut fields: Vec<&str> = Vec::new();
    for row in rows {
        for metric in &row.metrics {
            if !fields.contains(&metric.field.as_str()) {
                fields.push(&metric.field);
            }
        }
    }

    let mut grid = Vec::with_capacity(rows.len() + 1);
    let mut header = vec!["Team".to_string()];
    header.extend(fields.iter().map(|f| f.to_string()));
    grid.push(header);

    for row in rows {
        let mut line = vec![row.team.clone()];
        line.extend(
            fields
                .iter()
                .map(|f| row.metric(f).map(|v| v.to_string()).unwrap_or_default()),
        );
        grid.push(line);
    }
    grid
}

pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

// -- Rendering --

pub fn render_table<T: Tabled>(rows: &[T], format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if *format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

pub fn render_grid(grid: &[Vec<String>], format: &OutputFormat) -> String {
    let mut builder = Builder::default();
    for line in grid {
        builder.push_record(line.iter().cloned());
    }
    let mut table = builder.build();
    if *format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

pub fn csv_from_rows<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub fn csv_from_grid(grid: &[Vec<String>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for line in grid {
        wtr.write_record(line)?;
    }
    wtr.flush()?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Print fixed-shape rows in any format.
pub fn print_rows<T: Tabled + Serialize>(rows: &[T], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Markdown => println!("{}", render_table(rows, format)),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print!("{}", csv_from_rows(rows)?),
    }
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
