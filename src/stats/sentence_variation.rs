//! Sentence-length variation. Human writers mix short and long sentences;
//! a run of near-identical lengths reads as generated.

use serde::Serialize;

use super::{mean_stddev, ratio, HP};
use crate::detector::{Detector, PatternMatch, Signal};
use crate::error::DetectorError;
use crate::text::Document;

pub const CATEGORY: &str = "sentence_variation";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceVariation {
    pub sentence_count: usize,
    pub lengths: Vec<usize>,
    pub mean: f64,
    pub stddev: f64,
    pub coefficient_of_variation: f64,
    pub score: f64,
    pub is_signal_present: bool,
}

/// Step score for a coefficient of variation. Zero past the last step.
pub fn score_for_cv(cv: f64) -> f64 {
    HP.rhythm_score_steps
        .iter()
        .find(|(bound, _)| cv < *bound)
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

/// Both conditions must hold, strictly: a low absolute spread and a low
/// relative spread.
pub fn is_uniform(stddev: f64, cv: f64) -> bool {
    stddev < HP.rhythm_stddev_threshold && cv < HP.rhythm_cv_threshold
}

pub fn sentence_variation(input: &str) -> SentenceVariation {
    let doc = Document::parse(input);
    let lengths: Vec<usize> = doc.sentences().map(|s| s.word_count()).collect();

    let mut report = SentenceVariation {
        sentence_count: lengths.len(),
        lengths,
        mean: 0.0,
        stddev: 0.0,
        coefficient_of_variation: 0.0,
        score: 0.0,
        is_signal_present: false,
    };
    if report.sentence_count < HP.rhythm_min_sentences {
        return report;
    }

    let as_f64: Vec<f64> = report.lengths.iter().map(|&n| n as f64).collect();
    let (mean, stddev) = mean_stddev(&as_f64);
    let cv = ratio(stddev, mean);
    report.mean = mean;
    report.stddev = stddev;
    report.coefficient_of_variation = cv;

    if is_uniform(stddev, cv) {
        report.is_signal_present = true;
        report.score = score_for_cv(cv);
    }
    report
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceVariationDetector;

impl Detector for SentenceVariationDetector {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn detect(&self, text: &str) -> Result<Signal, DetectorError> {
        let report = sentence_variation(text);
        let mut signal = Signal {
            matches: Vec::new(),
            factors: vec![("sentence_length_cv", report.coefficient_of_variation)],
        };
        if report.is_signal_present {
            signal.matches.push(PatternMatch::new(
                CATEGORY,
                "unnaturally uniform sentence lengths",
                report.sentence_count,
                report.score,
            ));
        }
        Ok(signal)
    }
}
