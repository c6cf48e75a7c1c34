//! Helpers for per-source record loaders.
//!
//! Some ranking pages list a team more than once (conference sub-tables,
//! repeated headers). The loader for such a source keeps only the first entry
//! per canonical name. [`Aggregator::combine`](crate::aggregate::Aggregator::combine)
//! never does this itself.

use std::collections::HashSet;

use crate::aggregate::RawNameRecord;
use crate::resolver::Resolver;

/// Keep the first record for each canonical name, in input order.
pub fn dedup_first_seen(records: Vec<RawNameRecord>, resolver: &Resolver) -> Vec<RawNameRecord> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        let canonical = resolver.resolve(&record.raw_name);
        if seen.contains(&canonical) {
            tracing::debug!(
                source = %record.source,
                raw_name = %record.raw_name,
                canonical = %canonical,
                "dropping repeated team"
            );
            continue;
        }
        seen.insert(canonical);
        kept.push(record);
    }

    kept
}
