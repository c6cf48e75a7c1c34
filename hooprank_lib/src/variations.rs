//! Lexical variation expansion.
//!
//! Builds the pool of spellings treated as equivalent to a canonical name
//! when scoring similarity. The pool comes from the alias table (inverted once
//! at construction) plus punctuation and separator variants. It is practical,
//! not exhaustive, and not closed under transitivity.

use std::collections::{BTreeSet, HashMap};

use crate::resolver::Resolver;

/// Suffix abbreviations that gain a trailing period in the "with periods" variant.
const PERIOD_SUFFIXES: &[&str] = &["St", "Univ"];

/// Expands a team name into its known spellings.
#[derive(Debug, Clone)]
pub struct VariationExpander {
    resolver: Resolver,
    known_spellings: HashMap<String, BTreeSet<String>>,
}

impl VariationExpander {
    /// Invert the resolver's alias table.
    ///
    /// Each canonical name collects its raw aliases, plus every alias with a
    /// single token rule applied as a plain substring replacement.
    pub fn new(resolver: Resolver) -> Self {
        let config = resolver.config();
        let mut known_spellings: HashMap<String, BTreeSet<String>> = HashMap::new();

        for (raw, canonical) in config.aliases() {
            let spellings = known_spellings.entry(canonical.to_string()).or_default();
            spellings.insert(raw.to_string());
            for rule in config.tokens() {
                let variant = raw.replace(&rule.phrase, &rule.replacement);
                let variant = variant.trim();
                if variant != raw {
                    spellings.insert(variant.to_string());
                }
            }
        }

        tracing::debug!(
            canonical_names = known_spellings.len(),
            "built variation index"
        );

        Self {
            resolver,
            known_spellings,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Spellings considered equivalent to `name`.
    ///
    /// Always contains `name` and its canonical form.
    pub fn variations(&self, name: &str) -> BTreeSet<String> {
        let canonical = self.resolver.resolve(name);

        let mut pool = BTreeSet::new();
        pool.insert(name.to_string());
        if let Some(spellings) = self.known_spellings.get(&canonical) {
            pool.extend(spellings.iter().cloned());
        }
        pool.insert(canonical);

        let mut variations = pool.clone();
        for variant in &pool {
            if variant.contains('.') {
                variations.insert(variant.replace('.', ""));
            } else {
                variations.insert(with_suffix_period(variant));
            }
            if variant.contains('-') {
                variations.insert(variant.replace('-', " "));
            }
            if variant.contains(' ') {
                variations.insert(variant.replace(' ', "-"));
            }
        }

        variations
    }
}

/// "Boise St" -> "Boise St.". Names without a known suffix come back unchanged.
fn with_suffix_period(name: &str) -> String {
    for suffix in PERIOD_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            if stem.ends_with(' ') {
                return format!("{name}.");
            }
        }
    }
    name.to_string()
}
