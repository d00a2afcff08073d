//! Word-frequency distribution measured against Zipf's law.
//!
//! Natural language has a long-tailed rank/frequency curve: the `r`-th most
//! common word appears roughly `C / r` times, with `C = total / H_N`.
//! Generated text tends to flatten that curve. Three metrics are blended
//! into one deviation in `[0, 1]`:
//!
//! 1. chi-squared distance from the ideal curve, per word of input
//! 2. uniformity, from the coefficient of variation of the frequencies
//! 3. spread, from the most-to-least frequent ratio
//!
//! Below 5,000 words the curve is too noisy to judge and nothing is flagged.

use std::collections::HashMap;

use serde::Serialize;

use super::{finite_or_zero, mean_stddev, ratio, HP};
use crate::detector::{Detector, PatternMatch, Signal};
use crate::error::DetectorError;
use crate::text::{self, STOPWORDS};

pub const CATEGORY: &str = "word_frequency";

const TOP_WORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequency {
    pub total_words: usize,
    pub distinct_words: usize,
    /// Chi-squared against the ideal curve, divided by `total_words`.
    pub chi_squared: f64,
    /// Coefficient of variation of the frequency list.
    pub uniformity: f64,
    pub frequency_ratio: f64,
    pub deviation: f64,
    pub is_reliable: bool,
    pub score: f64,
    pub is_signal_present: bool,
    pub top_words: Vec<(String, usize)>,
}

impl WordFrequency {
    fn empty() -> Self {
        Self {
            total_words: 0,
            distinct_words: 0,
            chi_squared: 0.0,
            uniformity: 0.0,
            frequency_ratio: 0.0,
            deviation: 0.0,
            is_reliable: false,
            score: 0.0,
            is_signal_present: false,
            top_words: Vec::new(),
        }
    }
}

pub fn harmonic_number(n: usize) -> f64 {
    (1..=n).map(|k| 1.0 / k as f64).sum()
}

/// Ranked frequencies, most frequent first. Ties break alphabetically so
/// the ranking is stable across runs.
fn ranked_frequencies(input: &str, exclude_stopwords: bool) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in text::words(input) {
        if exclude_stopwords && STOPWORDS.contains(word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Chi-squared of observed rank frequencies against `C / r`, normalized by
/// the total word count.
fn chi_squared(frequencies: &[usize], total: usize) -> f64 {
    let n = frequencies.len();
    if n == 0 || total == 0 {
        return 0.0;
    }
    let scale = total as f64 / harmonic_number(n);
    let chi: f64 = frequencies
        .iter()
        .enumerate()
        .map(|(i, &observed)| {
            let expected = scale / (i + 1) as f64;
            ratio((observed as f64 - expected).powi(2), expected)
        })
        .sum();
    ratio(chi, total as f64)
}

fn combine(chi_squared: f64, uniformity: f64, frequency_ratio: f64) -> f64 {
    let chi_term = chi_squared.min(HP.zipf_chi_cap) / HP.zipf_chi_cap;
    let uniformity_term = (1.0 - uniformity).max(0.0);
    let ratio_term = (HP.zipf_ratio_cap - frequency_ratio.min(HP.zipf_ratio_cap)) / HP.zipf_ratio_cap;
    let deviation = HP.zipf_chi_weight * chi_term
        + HP.zipf_uniformity_weight * uniformity_term
        + HP.zipf_ratio_weight * ratio_term;
    finite_or_zero(deviation).clamp(0.0, 1.0)
}

/// Rounded points for a deviation, or `None` at or below the threshold.
pub fn score_for_deviation(deviation: f64) -> Option<f64> {
    (deviation > HP.zipf_threshold).then(|| {
        ((deviation - HP.zipf_threshold) / (1.0 - HP.zipf_threshold) * HP.zipf_score_max)
            .min(HP.zipf_score_max)
            .round()
    })
}

pub fn word_frequency(input: &str, exclude_stopwords: bool) -> WordFrequency {
    let ranked = ranked_frequencies(input, exclude_stopwords);
    if ranked.is_empty() {
        return WordFrequency::empty();
    }

    let frequencies: Vec<usize> = ranked.iter().map(|(_, c)| *c).collect();
    let total_words: usize = frequencies.iter().sum();
    let distinct_words = frequencies.len();

    let chi = chi_squared(&frequencies, total_words);

    let as_f64: Vec<f64> = frequencies.iter().map(|&c| c as f64).collect();
    let (mean, stddev) = mean_stddev(&as_f64);
    let uniformity = ratio(stddev, mean);

    let most = frequencies[0] as f64;
    let least = frequencies[distinct_words - 1] as f64;
    let frequency_ratio = ratio(most, least);

    let deviation = combine(chi, uniformity, frequency_ratio);
    // The reliability gate counts the words that were actually ranked, so
    // with stopwords excluded the input must carry 5,000 content words.
    let is_reliable = total_words >= HP.zipf_min_words;
    let score = if is_reliable { score_for_deviation(deviation) } else { None };
    let is_signal_present = score.is_some();
    let score = score.unwrap_or(0.0);

    WordFrequency {
        total_words,
        distinct_words,
        chi_squared: chi,
        uniformity,
        frequency_ratio,
        deviation,
        is_reliable,
        score,
        is_signal_present,
        top_words: ranked.into_iter().take(TOP_WORDS).collect(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WordFrequencyDetector {
    exclude_stopwords: bool,
}

impl WordFrequencyDetector {
    pub fn new(exclude_stopwords: bool) -> Self {
        Self { exclude_stopwords }
    }
}

impl Detector for WordFrequencyDetector {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn detect(&self, text: &str) -> Result<Signal, DetectorError> {
        let report = word_frequency(text, self.exclude_stopwords);
        let mut signal = Signal {
            matches: Vec::new(),
            factors: vec![("zipf_deviation", report.deviation)],
        };
        if report.is_signal_present {
            signal.matches.push(PatternMatch::new(
                CATEGORY,
                "unnaturally uniform word distribution",
                1,
                report.score,
            ));
        }
        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `vocabulary` distinct words, each repeated `each` times.
    fn uniform_text(vocabulary: usize, each: usize) -> String {
        let mut words = Vec::with_capacity(vocabulary * each);
        for _ in 0..each {
            for i in 0..vocabulary {
                words.push(format!("w{i}"));
            }
        }
        words.join(" ")
    }

    /// Rank `r` appears `round(top / r)` times.
    fn zipfian_text(top: usize, ranks: usize) -> String {
        let mut words = Vec::new();
        for r in 1..=ranks {
            let count = (top as f64 / r as f64).round() as usize;
            for _ in 0..count {
                words.push(format!("w{r}"));
            }
        }
        words.join(" ")
    }

    #[test]
    fn harmonic_numbers() {
        assert_eq!(harmonic_number(0), 0.0);
        assert_eq!(harmonic_number(1), 1.0);
        assert!((harmonic_number(4) - 25.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input() {
        let report = word_frequency("", false);
        assert_eq!(report, WordFrequency::empty());
        let report = word_frequency("... !!!", true);
        assert_eq!(report.deviation, 0.0);
        assert!(!report.is_signal_present);
    }

    #[test]
    fn uniform_frequencies_flag() {
        let report = word_frequency(&uniform_text(100, 100), false);
        assert_eq!(report.total_words, 10_000);
        assert_eq!(report.distinct_words, 100);
        assert_eq!(report.uniformity, 0.0);
        assert_eq!(report.frequency_ratio, 1.0);
        assert!(report.deviation >= 0.3, "deviation {}", report.deviation);
        assert!(report.is_reliable);
        assert!(report.is_signal_present);
        assert!(report.score > 0.0 && report.score <= 25.0);
        assert_eq!(report.score, report.score.round());
    }

    #[test]
    fn zipfian_frequencies_do_not_flag() {
        let report = word_frequency(&zipfian_text(2000, 500), false);
        assert!(report.is_reliable);
        assert!(report.chi_squared < 0.05, "chi {}", report.chi_squared);
        assert!(report.uniformity > 1.0);
        assert!(report.deviation < HP.zipf_threshold, "deviation {}", report.deviation);
        assert!(!report.is_signal_present);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.top_words[0], ("w1".to_string(), 2000));
    }

    #[test]
    fn short_input_is_unreliable() {
        let report = word_frequency(&uniform_text(10, 10), false);
        assert!(!report.is_reliable);
        assert!(report.deviation > HP.zipf_threshold);
        assert!(!report.is_signal_present);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn threshold_deviation_is_not_flagged() {
        assert_eq!(score_for_deviation(HP.zipf_threshold), None);
        assert_eq!(score_for_deviation(0.0), None);
        assert_eq!(score_for_deviation(1.0), Some(25.0));
        // (0.32 - 0.15) / 0.85 * 25 = 5
        assert_eq!(score_for_deviation(0.32), Some(5.0));
    }

    #[test]
    fn stopwords_can_be_excluded() {
        let text = "the cat and the dog and the bird";
        assert_eq!(word_frequency(text, false).total_words, 8);
        let report = word_frequency(text, true);
        assert_eq!(report.total_words, 3);
        assert_eq!(report.distinct_words, 3);
    }

    #[test]
    fn reliability_counts_words_left_after_stopwords() {
        let text = format!("{} {}", uniform_text(100, 49), vec!["the"; 200].join(" "));
        assert!(word_frequency(&text, false).is_reliable);
        let report = word_frequency(&text, true);
        assert_eq!(report.total_words, 4900);
        assert!(!report.is_reliable);
        assert!(!report.is_signal_present);
    }

    #[test]
    fn ties_rank_alphabetically() {
        let report = word_frequency("beta alpha gamma alpha beta", false);
        let ranked: Vec<&str> = report.top_words.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(ranked, vec!["alpha", "beta", "gamma"]);
    }
}
