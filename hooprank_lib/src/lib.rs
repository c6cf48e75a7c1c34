//! Library layer for HoopRank: canonical team names and cross-source ranking joins.
//!
//! Resolves the team names each ranking provider spells its own way to one
//! canonical string, offers variation-based exact and fuzzy matching, and
//! inner-joins per-source records on the canonical name while reporting the
//! teams that failed to line up. Pure computation; no network or file I/O
//! beyond reading a configuration file on request.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod matcher;
pub mod resolver;
pub mod similarity;
pub mod source;
pub mod variations;

pub use aggregate::{
    AggregatedRecord, Aggregator, CombineResult, Metric, MetricValue, RawNameRecord, SourceBatch,
    SourceName,
};
pub use config::{NameConfig, NameConfigError, PatternRule, TokenRule, DEFAULT_THRESHOLD};
pub use error::HoopRankError;
pub use matcher::{ClosestMatch, TeamMatcher};
pub use resolver::Resolver;
pub use source::dedup_first_seen;
pub use variations::VariationExpander;
