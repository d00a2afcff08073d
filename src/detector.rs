//! The contract every detector implements, and the registry the aggregator
//! walks.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{DetectorError, Result};
use crate::lexicon;
use crate::stats::{
    GradeLevelDetector, LexicalDiversityDetector, PassiveVoiceDetector, SentenceVariationDetector,
    WordFrequencyDetector,
};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// One detected signal category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub category: String,
    pub phrase: String,
    pub count: usize,
    pub score: f64,
}

impl PatternMatch {
    pub fn new(category: &str, phrase: impl Into<String>, count: usize, score: f64) -> Self {
        Self {
            category: category.to_string(),
            phrase: phrase.into(),
            count,
            score,
        }
    }
}

/// Half-open byte span `[start, end)` into the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextHighlight {
    pub start: usize,
    pub end: usize,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextHighlight {
    pub fn new(start: usize, end: usize, category: &str) -> Self {
        Self {
            start,
            end,
            category: category.to_string(),
            color: None,
        }
    }

    pub fn overlaps(&self, other: &TextHighlight) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// What a detector reports for one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    pub matches: Vec<PatternMatch>,
    /// Named measurements surfaced in the result's factor map.
    pub factors: Vec<(&'static str, f64)>,
}

impl Signal {
    pub fn basis(&self) -> f64 {
        self.matches.iter().map(|m| m.score).sum()
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

pub trait Detector: Send + Sync {
    /// Category name; also the key into the cap table.
    fn category(&self) -> &str;

    fn detect(&self, text: &str) -> std::result::Result<Signal, DetectorError>;

    /// Spans of `text` backing `matches`. Detectors that measure the text as
    /// a whole have nothing to point at.
    fn highlight(&self, _text: &str, _matches: &[PatternMatch]) -> Vec<TextHighlight> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered set of detectors, assembled once and iterated by the aggregator.
#[derive(Default)]
pub struct Registry {
    detectors: Vec<Box<dyn Detector>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Statistical detectors followed by the lexical catalogue, minus
    /// anything `config` disables. Every pattern is compiled here.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Registry::empty();
        registry.push(Box::new(LexicalDiversityDetector));
        registry.push(Box::new(GradeLevelDetector));
        registry.push(Box::new(WordFrequencyDetector::new(config.exclude_stopwords)));
        registry.push(Box::new(SentenceVariationDetector));
        registry.push(Box::new(PassiveVoiceDetector::new()?));
        for detector in lexicon::builtin()? {
            registry.push(Box::new(detector));
        }
        registry.push(Box::new(lexicon::RepetitionDetector));

        registry
            .detectors
            .retain(|d| config.is_enabled(d.category()));
        Ok(registry)
    }

    pub fn push(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn categories(&self) -> Vec<&str> {
        self.iter().map(|d| d.category()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("detectors", &self.categories())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = TextHighlight::new(0, 5, "a");
        assert!(a.overlaps(&TextHighlight::new(4, 8, "b")));
        assert!(!a.overlaps(&TextHighlight::new(5, 8, "b")));
        assert!(a.overlaps(&TextHighlight::new(1, 2, "b")));
    }

    #[test]
    fn default_registry_has_unique_categories() {
        let registry = Registry::from_config(&Config::default()).unwrap();
        let mut categories = registry.categories();
        let total = categories.len();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(categories.len(), total);
        assert!(categories.contains(&"passive_voice"));
        assert!(categories.contains(&"ai_vocabulary"));
        assert!(categories.contains(&"repetition"));
    }

    #[test]
    fn disabled_categories_are_left_out() {
        let config = Config {
            disabled: vec!["word_frequency".to_string(), "rule_of_three".to_string()],
            ..Config::default()
        };
        let registry = Registry::from_config(&config).unwrap();
        let categories = registry.categories();
        assert!(!categories.contains(&"word_frequency"));
        assert!(!categories.contains(&"rule_of_three"));
        assert!(categories.contains(&"grade_level"));
    }
}
