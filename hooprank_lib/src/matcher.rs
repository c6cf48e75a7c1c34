//! Fuzzy and exact team matching on top of the resolver and variation pools.
//!
//! Two checks:
//! - [`TeamMatcher::are_same_team`]: deterministic, true when the variation
//!   sets of both resolved names share a spelling.
//! - [`TeamMatcher::find_closest_match`]: scores every candidate by the best
//!   Ratcliff/Obershelp ratio across both variation sets and returns the top
//!   candidate if it clears the threshold.
//!
//! Scoring is quadratic in variation-set size per candidate. That is fine for
//! a few hundred teams; a larger universe would need a blocking prefilter.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::config::NameConfig;
use crate::error::{validate_threshold, HoopRankError};
use crate::resolver::Resolver;
use crate::similarity;
use crate::variations::VariationExpander;

/// Best candidate found by [`TeamMatcher::find_closest_match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestMatch {
    /// The candidate as passed in, not its canonical form.
    pub candidate: String,
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub score: f64,
}

/// Resolver, variation pools and similarity scoring over one configuration.
#[derive(Debug, Clone)]
pub struct TeamMatcher {
    expander: VariationExpander,
}

impl TeamMatcher {
    pub fn new(config: Arc<NameConfig>) -> Self {
        Self::from_resolver(Resolver::new(config))
    }

    pub fn from_resolver(resolver: Resolver) -> Self {
        Self {
            expander: VariationExpander::new(resolver),
        }
    }

    /// Matcher over the built-in college basketball tables.
    pub fn builtin() -> Result<Self, HoopRankError> {
        Ok(Self::new(Arc::new(NameConfig::builtin()?)))
    }

    pub fn resolver(&self) -> &Resolver {
        self.expander.resolver()
    }

    pub fn resolve(&self, name: &str) -> String {
        self.resolver().resolve(name)
    }

    pub fn variations(&self, name: &str) -> BTreeSet<String> {
        self.expander.variations(name)
    }

    /// Configured default threshold.
    pub fn threshold(&self) -> f64 {
        self.resolver().config().threshold()
    }

    /// True when both names share at least one spelling after resolution.
    pub fn are_same_team(&self, a: &str, b: &str) -> bool {
        let left = self.variations(&self.resolve(a));
        let right = self.variations(&self.resolve(b));
        !left.is_disjoint(&right)
    }

    /// Closest candidate to `name` scoring at least `threshold`.
    ///
    /// When several candidates reach the same top score, the first one in
    /// input order wins. Callers should not lean on which one that is.
    ///
    /// A threshold outside `[0, 1]` (including NaN) matches nothing.
    pub fn find_closest_match<S: AsRef<str>>(
        &self,
        name: &str,
        candidates: &[S],
        threshold: f64,
    ) -> Option<ClosestMatch> {
        if let Err(e) = validate_threshold(threshold) {
            tracing::warn!(team = name, error = %e, "rejecting fuzzy match");
            return None;
        }

        let variations = self.variations(&self.resolve(name));

        let mut best: Option<(usize, f64)> = None;
        let mut best_score = 0.0;

        for (index, candidate) in candidates.iter().enumerate() {
            let candidate = candidate.as_ref();
            let candidate_variations = self.variations(&self.resolve(candidate));
            let score = best_pair_score(&variations, &candidate_variations);
            if score > best_score {
                best_score = score;
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        if score < threshold {
            tracing::debug!(
                team = name,
                best = candidates[index].as_ref(),
                score,
                threshold,
                "no candidate above threshold"
            );
            return None;
        }

        Some(ClosestMatch {
            candidate: candidates[index].as_ref().to_string(),
            index,
            score,
        })
    }

    /// [`Self::find_closest_match`] with the configured default threshold.
    pub fn find_closest_match_default<S: AsRef<str>>(
        &self,
        name: &str,
        candidates: &[S],
    ) -> Option<ClosestMatch> {
        self.find_closest_match(name, candidates, self.threshold())
    }
}

fn best_pair_score(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    let mut best = 0.0;
    for a in left {
        for b in right {
            let score = similarity::ratio(a, b);
            if score > best {
                best = score;
            }
        }
    }
    best
}
