//! Type-token ratio. Human prose sits inside a middle band; text that is
//! far more repetitive or far more varied than that band is flagged.

use std::collections::HashSet;

use serde::Serialize;

use super::{ratio, HP};
use crate::detector::{Detector, PatternMatch, Signal};
use crate::error::DetectorError;
use crate::text;

pub const CATEGORY: &str = "lexical_diversity";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalDiversity {
    pub total_words: usize,
    pub unique_words: usize,
    pub ratio: f64,
    pub score: f64,
    pub is_signal_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

pub fn lexical_diversity(input: &str) -> LexicalDiversity {
    let words = text::words(input);
    let total_words = words.len();
    let unique_words = words.iter().collect::<HashSet<_>>().len();
    let ttr = ratio(unique_words as f64, total_words as f64);

    let mut report = LexicalDiversity {
        total_words,
        unique_words,
        ratio: ttr,
        score: 0.0,
        is_signal_present: false,
        reason: None,
    };

    if total_words < HP.ttr_min_words {
        report.reason = Some("too short");
        return report;
    }

    let half_width = (HP.ttr_high - HP.ttr_low) / 2.0;
    let (distance, reason) = if ttr < HP.ttr_low {
        (HP.ttr_low - ttr, "unnaturally repetitive")
    } else if ttr > HP.ttr_high {
        (ttr - HP.ttr_high, "unnaturally diverse")
    } else {
        return report;
    };

    report.score = (distance / half_width * HP.ttr_score_max).min(HP.ttr_score_max);
    report.is_signal_present = true;
    report.reason = Some(reason);
    report
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalDiversityDetector;

impl Detector for LexicalDiversityDetector {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn detect(&self, text: &str) -> Result<Signal, DetectorError> {
        let report = lexical_diversity(text);
        let mut signal = Signal {
            matches: Vec::new(),
            factors: vec![("type_token_ratio", report.ratio)],
        };
        if report.is_signal_present {
            let phrase = report.reason.unwrap_or(CATEGORY);
            signal
                .matches
                .push(PatternMatch::new(CATEGORY, phrase, 1, report.score));
        }
        Ok(signal)
    }
}
