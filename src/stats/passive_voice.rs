//! Passive-voice frequency: the share of sentences built on an auxiliary
//! plus a past participle.

use regex::Regex;
use serde::Serialize;

use super::{ratio, HP};
use crate::detector::{Detector, PatternMatch, Signal};
use crate::error::{DetectorError, Error, Result};
use crate::text::Document;

pub const CATEGORY: &str = "passive_voice";

const BE: &str = r"(?:am|is|are|was|were|be|been|being)";
const BE_FINITE: &str = r"(?:am|is|are|was|were)";
const PERFECT: &str = r"(?:has|have|had)";
const MODAL: &str = r"(?:will|would|shall|should|can|could|may|might|must)";
const ED: &str = r"\w+ed";

const IRREGULAR: &[&str] = &[
    "born", "bought", "brought", "built", "caught", "chosen", "done", "drawn", "driven", "eaten",
    "fallen", "felt", "forgotten", "found", "given", "gone", "grown", "heard", "held", "hidden",
    "hit", "kept", "known", "laid", "led", "left", "lost", "made", "meant", "met", "paid", "put",
    "read", "run", "said", "seen", "sent", "set", "shown", "shut", "sold", "spent", "spoken",
    "stolen", "struck", "taken", "taught", "thrown", "told", "thought", "understood", "won",
    "worn", "written",
];

fn compile_patterns() -> Result<Vec<Regex>> {
    let irregular = format!("(?:{})", IRREGULAR.join("|"));
    [
        format!(r"\b{BE}\s+{ED}\b"),
        format!(r"\b{BE_FINITE}\s+being\s+{ED}\b"),
        format!(r"\b{PERFECT}\s+been\s+{ED}\b"),
        format!(r"\b{MODAL}\s+be\s+{ED}\b"),
        format!(r"\b{BE}\s+{irregular}\b"),
        format!(r"\b{BE_FINITE}\s+being\s+{irregular}\b"),
        format!(r"\b{PERFECT}\s+been\s+{irregular}\b"),
        format!(r"\b{MODAL}\s+(?:be|have\s+been)\s+{irregular}\b"),
        format!(r"\b{MODAL}\s+have\s+been\s+{ED}\b"),
    ]
    .iter()
    .map(|p| {
        Regex::new(&format!("(?i){p}")).map_err(|source| Error::InvalidPattern {
            category: CATEGORY.to_string(),
            source,
        })
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassiveVoice {
    pub sentence_count: usize,
    pub passive_count: usize,
    pub frequency: f64,
    pub score: f64,
    pub is_signal_present: bool,
}

/// Holds the compiled auxiliary + participle patterns. Construction fails
/// if any of them does not compile.
#[derive(Debug, Clone)]
pub struct PassiveVoiceDetector {
    patterns: Vec<Regex>,
}

impl PassiveVoiceDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: compile_patterns()?,
        })
    }

    pub fn is_passive(&self, sentence: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(sentence))
    }

    pub fn measure(&self, input: &str) -> PassiveVoice {
        let doc = Document::parse(input);
        let sentence_count = doc.sentence_count();
        let passive_count = doc.sentences().filter(|s| self.is_passive(s.text)).count();
        let frequency = ratio(passive_count as f64, sentence_count as f64);

        let is_signal_present = frequency > HP.passive_threshold;
        let score = if is_signal_present {
            ((frequency - HP.passive_threshold) * HP.passive_score_step).min(HP.passive_score_max)
        } else {
            0.0
        };

        PassiveVoice {
            sentence_count,
            passive_count,
            frequency,
            score,
            is_signal_present,
        }
    }
}

impl Detector for PassiveVoiceDetector {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn detect(&self, text: &str) -> std::result::Result<Signal, DetectorError> {
        let report = self.measure(text);
        let mut signal = Signal {
            matches: Vec::new(),
            factors: vec![("passive_voice_frequency", report.frequency)],
        };
        if report.is_signal_present {
            signal.matches.push(PatternMatch::new(
                CATEGORY,
                "frequent passive constructions",
                report.passive_count,
                report.score,
            ));
        }
        Ok(signal)
    }
}
