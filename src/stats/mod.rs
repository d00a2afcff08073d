//! Statistical detectors. Each one is a pure function over the raw text
//! returning a typed report, plus a [`Detector`](crate::Detector) adapter
//! that turns a flagged report into a [`PatternMatch`](crate::PatternMatch).

pub mod grade_level;
pub mod lexical_diversity;
pub mod passive_voice;
pub mod sentence_variation;
pub mod word_frequency;

pub use grade_level::{grade_level, GradeLevel, GradeLevelDetector};
pub use lexical_diversity::{lexical_diversity, LexicalDiversity, LexicalDiversityDetector};
pub use passive_voice::{PassiveVoice, PassiveVoiceDetector};
pub use sentence_variation::{sentence_variation, SentenceVariation, SentenceVariationDetector};
pub use word_frequency::{word_frequency, WordFrequency, WordFrequencyDetector};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

pub(crate) struct Hyperparameters {
    pub ttr_min_words: usize,
    pub ttr_low: f64,
    pub ttr_high: f64,
    pub ttr_score_max: f64,

    pub grade_min: f64,
    pub grade_max: f64,
    pub grade_threshold: f64,
    pub grade_score_step: f64,
    pub grade_score_max: f64,

    pub zipf_min_words: usize,
    pub zipf_chi_cap: f64,
    pub zipf_ratio_cap: f64,
    pub zipf_chi_weight: f64,
    pub zipf_uniformity_weight: f64,
    pub zipf_ratio_weight: f64,
    pub zipf_threshold: f64,
    pub zipf_score_max: f64,

    pub rhythm_min_sentences: usize,
    pub rhythm_stddev_threshold: f64,
    pub rhythm_cv_threshold: f64,
    /// `(cv upper bound, score)`, checked in order.
    pub rhythm_score_steps: &'static [(f64, f64)],

    pub passive_threshold: f64,
    pub passive_score_step: f64,
    pub passive_score_max: f64,
}

pub(crate) static HP: Hyperparameters = Hyperparameters {
    ttr_min_words: 500,
    ttr_low: 0.35,
    ttr_high: 0.65,
    ttr_score_max: 25.0,

    grade_min: 0.0,
    grade_max: 18.0,
    grade_threshold: 14.0,
    grade_score_step: 5.0,
    grade_score_max: 25.0,

    zipf_min_words: 5000,
    zipf_chi_cap: 2.0,
    zipf_ratio_cap: 5.0,
    zipf_chi_weight: 0.4,
    zipf_uniformity_weight: 0.3,
    zipf_ratio_weight: 0.3,
    zipf_threshold: 0.15,
    zipf_score_max: 25.0,

    rhythm_min_sentences: 3,
    rhythm_stddev_threshold: 4.0,
    rhythm_cv_threshold: 0.30,
    rhythm_score_steps: &[(0.20, 25.0), (0.30, 20.0), (0.35, 15.0)],

    passive_threshold: 0.15,
    passive_score_step: 50.0,
    passive_score_max: 35.0,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `num / den`, or 0 when the denominator is zero or the result is not finite.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    finite_or_zero(num / den)
}

pub(crate) fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Mean and population standard deviation. Zeros for an empty slice.
pub(crate) fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
