//! Flesch-Kincaid grade level.
//!
//! Formula: `0.39 * (words/sentences) + 11.8 * (syllables/words) - 15.59`,
//! clamped to `[0, 18]`. Grades above 14 are flagged.

use serde::Serialize;

use super::{finite_or_zero, ratio, HP};
use crate::detector::{Detector, PatternMatch, Signal};
use crate::error::DetectorError;
use crate::text;

pub const CATEGORY: &str = "grade_level";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeLevel {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
    pub grade: f64,
    pub score: f64,
    pub is_signal_present: bool,
}

/// Points for a clamped grade, or `None` at or below the threshold.
pub fn score_for_grade(grade: f64) -> Option<f64> {
    (grade > HP.grade_threshold)
        .then(|| ((grade - HP.grade_threshold) * HP.grade_score_step).min(HP.grade_score_max))
}

pub fn grade_level(input: &str) -> GradeLevel {
    let tokens = text::tokens(input);
    let words = tokens.len();
    let sentences = text::terminal_runs(input);
    let syllables: usize = tokens.iter().map(|t| t.syllables()).sum();

    let mut report = GradeLevel {
        sentences,
        words,
        syllables,
        grade: 0.0,
        score: 0.0,
        is_signal_present: false,
    };
    if words == 0 {
        return report;
    }

    let words_per_sentence = ratio(words as f64, sentences as f64);
    let syllables_per_word = ratio(syllables as f64, words as f64);
    let grade = 0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59;
    report.grade = finite_or_zero(grade).clamp(HP.grade_min, HP.grade_max);

    if let Some(score) = score_for_grade(report.grade) {
        report.is_signal_present = true;
        report.score = score;
    }
    report
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GradeLevelDetector;

impl Detector for GradeLevelDetector {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn detect(&self, text: &str) -> Result<Signal, DetectorError> {
        let report = grade_level(text);
        let mut signal = Signal {
            matches: Vec::new(),
            factors: vec![("flesch_kincaid_grade", report.grade)],
        };
        if report.is_signal_present {
            signal.matches.push(PatternMatch::new(
                CATEGORY,
                format!("grade level {:.1}", report.grade),
                1,
                report.score,
            ));
        }
        Ok(signal)
    }
}
