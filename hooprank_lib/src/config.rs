//! Team name configuration tables.
//!
//! A [`NameConfig`] bundles the three tables the resolver works from: an
//! exact-match alias dictionary, an ordered list of regex rewrite rules, and a
//! phrase substitution table. Tables are loaded from YAML (the built-in set is
//! embedded at compile time via `include_str!`) and never change after load.
//! Share one config between resolvers with an `Arc`.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Default minimum similarity score for fuzzy matching.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Longest phrase, in whitespace-separated words, a token rule may match.
pub const MAX_PHRASE_TOKENS: usize = 4;

/// Removes parenthetical qualifiers such as "(CA)" or "(NY)".
const PARENTHETICAL_PATTERN: &str = r"\s*\([^)]*\)";

/// Error types for name configuration loading.
#[derive(Error, Debug)]
pub enum NameConfigError {
    #[error("Failed to parse name configuration YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to read name configuration {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid rewrite pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Duplicate alias in name configuration: {0}")]
    DuplicateAlias(String),
    #[error("Duplicate token phrase in name configuration: {0}")]
    DuplicateToken(String),
    #[error("Invalid token phrase {0:?}: expected 1 to 4 words")]
    InvalidPhrase(String),
    #[error("Similarity threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),
}

/// Top-level structure for the name configuration YAML file.
#[derive(Deserialize, Debug, Default)]
pub struct NameConfigFile {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

/// An exact `raw -> canonical` mapping.
#[derive(Deserialize, Debug, Clone)]
pub struct AliasEntry {
    pub raw: String,
    pub canonical: String,
}

/// A regex rewrite as written in YAML. Replacements use `${1}` group syntax.
#[derive(Deserialize, Debug, Clone)]
pub struct PatternEntry {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// A phrase substitution as written in YAML. An empty replacement deletes the phrase.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenEntry {
    pub phrase: String,
    #[serde(default)]
    pub replacement: String,
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    replacement: String,
}

impl PatternRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, NameConfigError> {
        let regex = Regex::new(pattern).map_err(|source| NameConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            replacement: replacement.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every non-overlapping match in `input`.
    pub fn apply(&self, input: &str) -> String {
        self.regex
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

/// A phrase substitution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    pub phrase: String,
    pub replacement: String,
}

/// Immutable name resolution tables.
#[derive(Debug, Clone)]
pub struct NameConfig {
    aliases: HashMap<String, String>,
    patterns: Vec<PatternRule>,
    tokens: Vec<TokenRule>,
    token_index: HashMap<String, usize>,
    parenthetical: Regex,
    threshold: f64,
}

impl NameConfig {
    /// Build a config from already-parsed parts.
    ///
    /// Rejects duplicate alias keys, duplicate or over-long token phrases,
    /// uncompilable patterns and out-of-range thresholds.
    pub fn from_file(file: NameConfigFile) -> Result<Self, NameConfigError> {
        let threshold = file.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(NameConfigError::InvalidThreshold(threshold));
        }

        let mut aliases = HashMap::with_capacity(file.aliases.len());
        for entry in file.aliases {
            if aliases.contains_key(&entry.raw) {
                return Err(NameConfigError::DuplicateAlias(entry.raw));
            }
            aliases.insert(entry.raw, entry.canonical);
        }

        let patterns = file
            .patterns
            .iter()
            .map(|p| PatternRule::new(&p.pattern, &p.replacement))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tokens = Vec::with_capacity(file.tokens.len());
        let mut token_index = HashMap::with_capacity(file.tokens.len());
        for entry in file.tokens {
            let words = entry.phrase.split_whitespace().count();
            if words == 0 || words > MAX_PHRASE_TOKENS {
                return Err(NameConfigError::InvalidPhrase(entry.phrase));
            }
            if token_index.contains_key(&entry.phrase) {
                return Err(NameConfigError::DuplicateToken(entry.phrase));
            }
            token_index.insert(entry.phrase.clone(), tokens.len());
            tokens.push(TokenRule {
                phrase: entry.phrase,
                replacement: entry.replacement,
            });
        }

        let parenthetical =
            Regex::new(PARENTHETICAL_PATTERN).map_err(|source| NameConfigError::InvalidPattern {
                pattern: PARENTHETICAL_PATTERN.to_string(),
                source,
            })?;

        Ok(Self {
            aliases,
            patterns,
            tokens,
            token_index,
            parenthetical,
            threshold,
        })
    }

    /// Parse and validate a config from YAML content.
    pub fn from_yaml(yaml_content: &str) -> Result<Self, NameConfigError> {
        let file: NameConfigFile = serde_yml::from_str(yaml_content)?;
        Self::from_file(file)
    }

    /// Read and parse a config from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NameConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| NameConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the built-in college basketball tables.
    ///
    /// Every canonical name is also registered as an alias of itself, so
    /// resolving an already-canonical name is a no-op. This changes some
    /// outputs compared to running the rules alone: "Boise State" stays
    /// "Boise State" instead of becoming "Boise St.", and "Arkansas Little
    /// Rock" stays put instead of becoming "AR Lit Rock". Callers that stored
    /// rule-derived strings should re-resolve them. Use
    /// [`Self::from_yaml`] without [`Self::self_map_canonicals`] to get the
    /// rule-only behavior.
    pub fn builtin() -> Result<Self, NameConfigError> {
        let yaml_content = include_str!("../../seed_data/team_names.yml");
        let config = Self::from_yaml(yaml_content)?.self_map_canonicals();
        tracing::debug!(
            aliases = config.aliases.len(),
            patterns = config.patterns.len(),
            tokens = config.tokens.len(),
            "loaded built-in name configuration"
        );
        Ok(config)
    }

    /// Register each canonical value as an exact alias of itself, unless that
    /// string is already mapped somewhere else.
    pub fn self_map_canonicals(mut self) -> Self {
        let canonicals: Vec<String> = self.aliases.values().cloned().collect();
        for canonical in canonicals {
            self.aliases.entry(canonical.clone()).or_insert(canonical);
        }
        self
    }

    /// Exact, case-sensitive alias lookup.
    pub fn alias(&self, raw: &str) -> Option<&str> {
        self.aliases.get(raw).map(String::as_str)
    }

    /// All `(raw, canonical)` alias pairs, in no particular order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Rewrite rules in application order.
    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }

    /// Token rules in file order.
    pub fn tokens(&self) -> &[TokenRule] {
        &self.tokens
    }

    /// Replacement for an exact phrase, if one is configured.
    pub fn token(&self, phrase: &str) -> Option<&str> {
        self.token_index
            .get(phrase)
            .map(|&i| self.tokens[i].replacement.as_str())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Remove every parenthetical qualifier.
    pub(crate) fn strip_parentheticals(&self, name: &str) -> String {
        self.parenthetical.replace_all(name, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
aliases:
  - { raw: "Abl Christian", canonical: "Abilene Christian" }
patterns:
  - { pattern: '\s+', replacement: ' ' }
tokens:
  - { phrase: "University", replacement: "" }
"#;
        let config = NameConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.alias("Abl Christian"), Some("Abilene Christian"));
        assert_eq!(config.patterns().len(), 1);
        assert_eq!(config.token("University"), Some(""));
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_empty_document_sections_default() {
        let config = NameConfig::from_yaml("threshold: 0.9\n").unwrap();
        assert_eq!(config.alias_count(), 0);
        assert!(config.patterns().is_empty());
        assert!(config.tokens().is_empty());
        assert_eq!(config.threshold(), 0.9);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let yaml = r#"
patterns:
  - { pattern: '([A-Z]', replacement: '' }
"#;
        let err = NameConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, NameConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let yaml = r#"
aliases:
  - { raw: "Boise St", canonical: "Boise State" }
  - { raw: "Boise St", canonical: "Boise" }
"#;
        let err = NameConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, NameConfigError::DuplicateAlias(ref raw) if raw == "Boise St"));
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let yaml = r#"
tokens:
  - { phrase: "State", replacement: "St." }
  - { phrase: "State", replacement: "St" }
"#;
        let err = NameConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, NameConfigError::DuplicateToken(_)));
    }

    #[test]
    fn test_phrase_longer_than_four_words_rejected() {
        let yaml = r#"
tokens:
  - { phrase: "University of North Carolina Wilmington", replacement: "UNCW" }
"#;
        let err = NameConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, NameConfigError::InvalidPhrase(_)));
    }

    #[test]
    fn test_blank_phrase_rejected() {
        let yaml = r#"
tokens:
  - { phrase: "  ", replacement: "x" }
"#;
        assert!(matches!(
            NameConfig::from_yaml(yaml).unwrap_err(),
            NameConfigError::InvalidPhrase(_)
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = NameConfig::from_yaml("threshold: 1.5\n").unwrap_err();
        assert!(matches!(err, NameConfigError::InvalidThreshold(t) if t == 1.5));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = NameConfig::from_yaml("aliases: [ { raw: ").unwrap_err();
        assert!(matches!(err, NameConfigError::YamlParse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = NameConfig::from_path("/nonexistent/team_names.yml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/team_names.yml"));
    }

    #[test]
    fn test_pattern_rule_uses_group_replacement() {
        let rule = PatternRule::new(r"([A-Z])\s*&\s*([A-Z])", "${1}&${2}").unwrap();
        assert_eq!(rule.apply("Texas A & M"), "Texas A&M");
        assert_eq!(rule.pattern(), r"([A-Z])\s*&\s*([A-Z])");
        assert_eq!(rule.replacement(), "${1}&${2}");
    }

    #[test]
    fn test_self_map_keeps_existing_mapping() {
        let yaml = r#"
aliases:
  - { raw: "Boston", canonical: "Boston University" }
  - { raw: "Detroit Mercy", canonical: "Detroit" }
  - { raw: "Detroit", canonical: "Detroit Mercy" }
"#;
        let config = NameConfig::from_yaml(yaml).unwrap().self_map_canonicals();
        assert_eq!(config.alias("Boston University"), Some("Boston University"));
        // Already mapped: the explicit entry wins.
        assert_eq!(config.alias("Detroit"), Some("Detroit Mercy"));
        assert_eq!(config.alias("Detroit Mercy"), Some("Detroit"));
    }

    #[test]
    fn test_builtin_loads() {
        let config = NameConfig::builtin().unwrap();
        assert!(config.alias_count() > 200);
        assert_eq!(config.patterns().len(), 10);
        assert_eq!(config.alias("Abl Christian"), Some("Abilene Christian"));
        assert_eq!(config.alias("Abilene Christian"), Some("Abilene Christian"));
        assert_eq!(config.token("State"), Some("St."));
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_builtin_pattern_order_preserved() {
        let config = NameConfig::builtin().unwrap();
        let first = config.patterns().first().unwrap();
        let last = config.patterns().last().unwrap();
        assert_eq!(first.pattern(), r"St\.?$");
        assert_eq!(last.pattern(), r"\s*-\s*");
    }
}
