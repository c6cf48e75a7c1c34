//! Cross-source ranking aggregation.
//!
//! [`Aggregator::combine`] resolves every source's raw team names to canonical
//! names and inner-joins the sources on them, left to right. Alongside the
//! joined rows it reports every canonical name that did not make it into the
//! join, so callers can see which teams failed to line up.
//!
//! A source with no records is not an error: the join comes back empty and
//! every team from the other sources lands in the unmatched set.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HoopRankError;
use crate::resolver::Resolver;

/// A single metric value reported by a ranking source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Interpret a raw table cell: integers first, then floats, else text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        Self::Text(trimmed.to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// A named metric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub field: String,
    pub value: MetricValue,
}

/// One team entry as produced by a source's fetch/parse step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNameRecord {
    #[serde(default)]
    pub source: String,
    pub raw_name: String,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl RawNameRecord {
    pub fn new(source: impl Into<String>, raw_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            raw_name: raw_name.into(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(mut self, field: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.push(Metric {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn metric(&self, field: &str) -> Option<&MetricValue> {
        self.metrics.iter().find(|m| m.field == field).map(|m| &m.value)
    }
}

/// All records supplied by one source for a single `combine` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBatch {
    pub source: String,
    pub records: Vec<RawNameRecord>,
}

impl SourceBatch {
    pub fn new(source: impl Into<String>, records: Vec<RawNameRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// A source that produced nothing (failed or empty fetch).
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(source, Vec::new())
    }

    /// Parse a JSON array of records. Records without a `source` inherit this batch's id.
    pub fn from_json(source: impl Into<String>, json: &str) -> Result<Self, HoopRankError> {
        let source = source.into();
        let mut records: Vec<RawNameRecord> = serde_json::from_str(json)?;
        for record in &mut records {
            if record.source.is_empty() {
                record.source = source.clone();
            }
        }
        Ok(Self { source, records })
    }
}

/// The raw spelling one source used for a joined team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceName {
    pub source: String,
    pub raw_name: String,
}

/// A team present in every source, with the metrics of all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub team: String,
    pub raw_names: Vec<SourceName>,
    pub metrics: Vec<Metric>,
}

impl AggregatedRecord {
    fn seed(team: &str, source: &str, record: &RawNameRecord) -> Self {
        Self {
            team: team.to_string(),
            raw_names: vec![SourceName {
                source: source.to_string(),
                raw_name: record.raw_name.clone(),
            }],
            metrics: record.metrics.clone(),
        }
    }

    /// Append another source's record. A field name already present keeps its
    /// first value.
    fn merged(mut self, source: &str, record: &RawNameRecord) -> Self {
        self.raw_names.push(SourceName {
            source: source.to_string(),
            raw_name: record.raw_name.clone(),
        });
        for metric in &record.metrics {
            if self.metrics.iter().any(|m| m.field == metric.field) {
                tracing::debug!(
                    team = %self.team,
                    source,
                    field = %metric.field,
                    "metric field already present, keeping first value"
                );
                continue;
            }
            self.metrics.push(metric.clone());
        }
        self
    }

    pub fn metric(&self, field: &str) -> Option<&MetricValue> {
        self.metrics.iter().find(|m| m.field == field).map(|m| &m.value)
    }
}

/// Output of [`Aggregator::combine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombineResult {
    pub joined: Vec<AggregatedRecord>,
    pub unmatched: BTreeSet<String>,
}

impl CombineResult {
    /// Canonical names present in the joined rows.
    pub fn joined_names(&self) -> BTreeSet<String> {
        self.joined.iter().map(|r| r.team.clone()).collect()
    }
}

/// Joins per-source ranking records on canonical team name.
#[derive(Debug, Clone)]
pub struct Aggregator {
    resolver: Resolver,
}

impl Aggregator {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Inner-join `batches` on canonical team name.
    ///
    /// Records are not deduplicated: a name repeated within a source yields one
    /// joined row per combination, as in a relational equi-join. Batch order
    /// fixes row order but never changes which teams are joined.
    pub fn combine(&self, batches: &[SourceBatch]) -> CombineResult {
        let resolved: Vec<Vec<(String, &RawNameRecord)>> = batches
            .iter()
            .map(|batch| {
                batch
                    .records
                    .iter()
                    .map(|record| (self.resolver.resolve(&record.raw_name), record))
                    .collect()
            })
            .collect();

        for (batch, rows) in batches.iter().zip(&resolved) {
            if rows.is_empty() {
                tracing::warn!(
                    source = %batch.source,
                    "source supplied no records; every team will be unmatched"
                );
            }
        }

        let all_names: BTreeSet<String> = resolved
            .iter()
            .flatten()
            .map(|(name, _)| name.clone())
            .collect();

        let mut joined: Vec<AggregatedRecord> = match (batches.first(), resolved.first()) {
            (Some(batch), Some(rows)) => rows
                .iter()
                .map(|(name, record)| AggregatedRecord::seed(name, &batch.source, record))
                .collect(),
            _ => Vec::new(),
        };

        for (batch, rows) in batches.iter().zip(&resolved).skip(1) {
            let mut by_name: HashMap<&str, Vec<&RawNameRecord>> = HashMap::new();
            for (name, record) in rows {
                by_name.entry(name.as_str()).or_default().push(*record);
            }

            joined = joined
                .into_iter()
                .flat_map(|row| {
                    by_name
                        .get(row.team.as_str())
                        .map(|matches| {
                            matches
                                .iter()
                                .map(|record| row.clone().merged(&batch.source, record))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .collect();

            tracing::debug!(source = %batch.source, rows = joined.len(), "joined source");
        }

        let joined_names: HashSet<&str> = joined.iter().map(|r| r.team.as_str()).collect();
        let unmatched: BTreeSet<String> = all_names
            .iter()
            .filter(|name| !joined_names.contains(name.as_str()))
            .cloned()
            .collect();

        tracing::info!(
            sources = batches.len(),
            teams = all_names.len(),
            joined = joined.len(),
            unmatched = unmatched.len(),
            "combined rankings"
        );

        CombineResult { joined, unmatched }
    }
}
