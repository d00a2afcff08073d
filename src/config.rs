use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Cap table
// ---------------------------------------------------------------------------

/// Cap applied to any category missing from the table.
pub const FALLBACK_CAP: f64 = 25.0;

const DEFAULT_CAPS: &[(&str, f64)] = &[
    // Statistical
    ("lexical_diversity", 25.0),
    ("grade_level", 25.0),
    ("word_frequency", 25.0),
    ("sentence_variation", 25.0),
    ("passive_voice", 35.0),
    // Lexical
    ("ai_vocabulary", 40.0),
    ("stock_phrases", 30.0),
    ("promotional_language", 30.0),
    ("rule_of_three", 25.0),
    ("negative_parallelism", 25.0),
    ("outline_conclusion", 25.0),
    ("transition_words", 25.0),
    ("ai_disclosure", 40.0),
    ("weasel_words", 25.0),
    ("repetition", 30.0),
];

/// Maximum number of points each detector category may contribute to the
/// raw score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CapTable(BTreeMap<String, f64>);

impl CapTable {
    pub fn cap(&self, category: &str) -> f64 {
        self.0.get(category).copied().unwrap_or(FALLBACK_CAP)
    }

    pub fn set(&mut self, category: impl Into<String>, cap: f64) {
        self.0.insert(category.into(), cap);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn validate(&self) -> Result<()> {
        for (category, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidCap {
                    category: category.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for CapTable {
    fn default() -> Self {
        Self(
            DEFAULT_CAPS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        )
    }
}

// User entries are layered over the defaults rather than replacing them.
impl<'de> Deserialize<'de> for CapTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let overrides = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut table = CapTable::default();
        table.0.extend(overrides);
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub caps: CapTable,
    /// Drop stopwords before building the word-frequency distribution.
    pub exclude_stopwords: bool,
    /// Categories left out of the registry.
    pub disabled: Vec<String>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        // Unknown names are reported once, when an analyzer is built.
        config.caps.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Rejects invalid caps. Category names the built-in registry does not
    /// know are kept, since custom detectors may use them, but each one is
    /// logged so a misspelling does not pass silently.
    pub fn validate(&self) -> Result<()> {
        self.caps.validate()?;
        for category in self.unknown_categories() {
            warn!(category, "config names a category with no built-in detector");
        }
        Ok(())
    }

    /// Categories named under `caps` or `disabled` that no built-in
    /// detector reports.
    pub fn unknown_categories(&self) -> Vec<&str> {
        let known = |c: &str| DEFAULT_CAPS.iter().any(|(k, _)| *k == c);
        let mut unknown: Vec<&str> = self
            .caps
            .iter()
            .map(|(c, _)| c)
            .chain(self.disabled.iter().map(String::as_str))
            .filter(|&c| !known(c))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        !self.disabled.iter().any(|d| d == category)
    }
}
