//! Canonical team name resolution.
//!
//! [`Resolver::resolve`] maps a raw, as-scraped team name to the canonical
//! string used as the cross-source join key. Steps, in order:
//!
//! 1. Trim whitespace; an empty name is returned unchanged.
//! 2. Exact alias lookup (case-sensitive). A hit returns immediately, even
//!    when the later rules would produce something else.
//! 3. Strip parenthetical qualifiers.
//! 4. Apply every rewrite pattern, in configured order.
//! 5. Greedy phrase substitution, longest phrase (4 words) first.
//! 6. Rejoin with single spaces.
//! 7. A trailing " St" gains its period.
//!
//! No case folding is done anywhere.

use std::sync::Arc;

use crate::config::{NameConfig, MAX_PHRASE_TOKENS};

/// Resolves raw team names against a shared [`NameConfig`].
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<NameConfig>,
}

impl Resolver {
    pub fn new(config: Arc<NameConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NameConfig {
        &self.config
    }

    /// Map a raw team name to its canonical form.
    pub fn resolve(&self, raw: &str) -> String {
        let name = raw.trim();
        if name.is_empty() {
            return String::new();
        }

        if let Some(canonical) = self.config.alias(name) {
            return canonical.to_string();
        }

        let mut name = self.config.strip_parentheticals(name);
        for rule in self.config.patterns() {
            name = rule.apply(&name);
        }

        let words = self.substitute_phrases(&name);
        let mut joined = words.split_whitespace().collect::<Vec<_>>().join(" ");

        if joined.ends_with(" St") {
            joined.push('.');
        }
        joined
    }

    /// Walk the words left to right, replacing the longest configured phrase
    /// starting at each position.
    fn substitute_phrases(&self, name: &str) -> String {
        let words: Vec<&str> = name.split_whitespace().collect();
        let mut out: Vec<&str> = Vec::with_capacity(words.len());
        let mut i = 0;

        while i < words.len() {
            let longest = MAX_PHRASE_TOKENS.min(words.len() - i);
            let hit = (1..=longest).rev().find_map(|len| {
                let phrase = words[i..i + len].join(" ");
                self.config.token(&phrase).map(|replacement| (len, replacement))
            });

            match hit {
                Some((len, replacement)) => {
                    if !replacement.is_empty() {
                        out.push(replacement);
                    }
                    i += len;
                }
                None => {
                    out.push(words[i]);
                    i += 1;
                }
            }
        }

        out.join(" ")
    }
}
