//! Combines every detector's output into one [`DetectionResult`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{CapTable, Config};
use crate::detector::{PatternMatch, Registry, TextHighlight};
use crate::error::Result;
use crate::highlight;
use crate::stats::finite_or_zero;

pub const SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// 0 to 100.
    pub score: f64,
    pub factors: BTreeMap<String, f64>,
    pub patterns: Vec<PatternMatch>,
    pub highlights: Vec<TextHighlight>,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            factors: BTreeMap::new(),
            patterns: Vec::new(),
            highlights: Vec::new(),
        }
    }

    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.get(name).copied()
    }

    /// Sum of reported scores for one category.
    pub fn category_score(&self, category: &str) -> f64 {
        self.patterns
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.score)
            .sum()
    }
}

/// A registry plus the cap table it is scored against. Build once, reuse
/// for any number of inputs.
#[derive(Debug)]
pub struct Analyzer {
    registry: Registry,
    caps: CapTable,
}

impl Analyzer {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: Registry::from_config(config)?,
            caps: config.caps.clone(),
        })
    }

    pub fn with_registry(registry: Registry, caps: CapTable) -> Self {
        Self { registry, caps }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn analyze(&self, text: &str) -> DetectionResult {
        let mut result = DetectionResult::empty();
        let mut raw_highlights: Vec<TextHighlight> = Vec::new();
        let mut raw = 0.0f64;

        for detector in self.registry.iter() {
            let category = detector.category();
            let signal = match detector.detect(text) {
                Ok(signal) => signal,
                Err(err) => {
                    warn!(category, error = %err, "detector failed, skipping");
                    continue;
                }
            };

            for (name, value) in &signal.factors {
                result.factors.insert(name.to_string(), finite_or_zero(*value));
            }

            let mut matches: Vec<PatternMatch> = signal
                .matches
                .into_iter()
                .map(|mut m| {
                    m.score = finite_or_zero(m.score).max(0.0);
                    m
                })
                .collect();
            let basis: f64 = matches.iter().map(|m| m.score).sum();
            let contribution = basis.min(self.caps.cap(category));

            // Scale the category down so its patterns sum to the cap.
            if basis > contribution {
                for m in &mut matches {
                    m.score = m.score / basis * contribution;
                }
            }

            debug!(category, basis, contribution, "detector scored");
            raw += contribution;
            result.factors.insert(category.to_string(), contribution);

            raw_highlights.extend(detector.highlight(text, &matches));
            result.patterns.extend(matches);
        }

        let score = raw.min(SCORE_MAX);
        let rescale = if raw > 0.0 { score / raw } else { 1.0 };
        for pattern in &mut result.patterns {
            pattern.score *= rescale;
        }

        result.score = score;
        result.highlights = highlight::resolve(text, raw_highlights);
        debug!(
            score,
            raw,
            patterns = result.patterns.len(),
            highlights = result.highlights.len(),
            "analysis complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Detector, Signal};
    use crate::error::DetectorError;

    /// Reports fixed pattern scores, highlighting `[0, 4)`.
    struct Fixed {
        category: &'static str,
        scores: Vec<f64>,
    }

    impl Detector for Fixed {
        fn category(&self) -> &str {
            self.category
        }

        fn detect(&self, _text: &str) -> std::result::Result<Signal, DetectorError> {
            Ok(Signal {
                matches: self
                    .scores
                    .iter()
                    .enumerate()
                    .map(|(i, s)| PatternMatch::new(self.category, format!("p{i}"), 1, *s))
                    .collect(),
                factors: Vec::new(),
            })
        }

        fn highlight(&self, _text: &str, _matches: &[PatternMatch]) -> Vec<TextHighlight> {
            vec![TextHighlight::new(0, 4, self.category)]
        }
    }

    struct Failing;

    impl Detector for Failing {
        fn category(&self) -> &str {
            "failing"
        }

        fn detect(&self, _text: &str) -> std::result::Result<Signal, DetectorError> {
            Err(DetectorError::new("failing", "boom"))
        }
    }

    fn analyzer(detectors: Vec<Box<dyn Detector>>, caps: &[(&str, f64)]) -> Analyzer {
        let mut registry = Registry::empty();
        for d in detectors {
            registry.push(d);
        }
        let mut table = CapTable::default();
        for (category, cap) in caps {
            table.set(*category, *cap);
        }
        Analyzer::with_registry(registry, table)
    }

    fn fixed(category: &'static str, scores: &[f64]) -> Box<dyn Detector> {
        Box::new(Fixed {
            category,
            scores: scores.to_vec(),
        })
    }

    #[test]
    fn contributions_are_capped_per_category() {
        let a = analyzer(vec![fixed("a", &[30.0, 30.0])], &[("a", 40.0)]);
        let result = a.analyze("text");
        assert_eq!(result.score, 40.0);
        assert_eq!(result.factor("a"), Some(40.0));
        assert!((result.category_score("a") - 40.0).abs() < 1e-9);
        assert!((result.patterns[0].score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn total_is_clamped_and_breakdown_rescaled() {
        let a = analyzer(
            vec![fixed("a", &[40.0]), fixed("b", &[40.0]), fixed("c", &[20.0, 20.0])],
            &[("a", 40.0), ("b", 40.0), ("c", 40.0)],
        );
        let result = a.analyze("text");
        assert_eq!(result.score, 100.0);
        let displayed: f64 = result.patterns.iter().map(|p| p.score).sum();
        assert!((displayed - 100.0).abs() < 1e-9);
        assert!((result.category_score("a") - 33.333_333).abs() < 1e-3);
    }

    #[test]
    fn under_the_limit_nothing_is_rescaled() {
        let a = analyzer(vec![fixed("a", &[10.0]), fixed("b", &[5.0])], &[]);
        let result = a.analyze("text");
        assert_eq!(result.score, 15.0);
        assert_eq!(result.patterns[0].score, 10.0);
        assert_eq!(result.patterns[1].score, 5.0);
    }

    #[test]
    fn failing_detector_is_skipped() {
        let a = analyzer(vec![Box::new(Failing) as Box<dyn Detector>, fixed("a", &[12.0])], &[]);
        let result = a.analyze("text");
        assert_eq!(result.score, 12.0);
        assert!(result.factor("failing").is_none());
    }

    #[test]
    fn non_finite_scores_become_zero() {
        let a = analyzer(vec![fixed("a", &[f64::NAN]), fixed("b", &[f64::INFINITY])], &[]);
        let result = a.analyze("text");
        assert_eq!(result.score, 0.0);
        assert!(result.patterns.iter().all(|p| p.score == 0.0));
    }

    #[test]
    fn highlights_are_resolved_across_detectors() {
        let a = analyzer(vec![fixed("a", &[1.0]), fixed("b", &[1.0])], &[]);
        let result = a.analyze("text");
        assert_eq!(result.highlights.len(), 1);
        assert_eq!(result.highlights[0].category, "a");
    }

    #[test]
    fn empty_registry_scores_zero() {
        let a = analyzer(Vec::new(), &[]);
        assert_eq!(a.analyze("anything"), DetectionResult::empty());
    }
}
