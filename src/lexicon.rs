//! Lexical and pattern detectors: phrase catalogues matched case-insensitively
//! against the raw text, plus the repeated-phrase detector.
//!
//! Every catalogue pattern is compiled in [`builtin`], so a bad entry fails
//! registry construction instead of an analysis call.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::detector::{Detector, PatternMatch, Signal, TextHighlight};
use crate::error::{DetectorError, Error, Result};
use crate::stats::ratio;
use crate::text::{self, STOPWORDS};

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Single words, joined into one word-bounded alternation.
    Words,
    /// Literal phrases, escaped and word-bounded.
    Phrases,
    /// Raw regular expressions.
    Patterns,
}

#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub category: &'static str,
    /// Points per occurrence.
    pub weight: f64,
    pub kind: EntryKind,
    pub entries: &'static [&'static str],
}

pub const AI_VOCABULARY: Lexicon = Lexicon {
    category: "ai_vocabulary",
    weight: 4.0,
    kind: EntryKind::Words,
    entries: &[
        // Adjectives
        "crucial", "groundbreaking", "pivotal", "paramount", "seamless", "holistic",
        "multifaceted", "meticulous", "profound", "comprehensive", "invaluable", "noteworthy",
        "game-changing", "revolutionary", "pioneering", "visionary", "formidable",
        "quintessential", "unparalleled", "robust", "innovative", "cutting-edge", "impactful",
        "intricate", "nuanced",
        // Verbs
        "delve", "delves", "delved", "delving", "embark", "embrace", "elevate", "foster",
        "harness", "unleash", "unlock", "orchestrate", "streamline", "transcend", "underscore",
        "underscores", "showcase", "showcases", "leverage", "leveraging",
        // Nouns
        "landscape", "tapestry", "paradigm", "testament", "trajectory", "nexus", "symphony",
        "odyssey", "pinnacle", "realm", "intricacies", "interplay",
    ],
};

pub const STOCK_PHRASES: Lexicon = Lexicon {
    category: "stock_phrases",
    weight: 5.0,
    kind: EntryKind::Phrases,
    entries: &[
        "it's worth noting",
        "it is worth noting",
        "it's important to note",
        "it is important to note",
        "this is where things get interesting",
        "here's the thing",
        "at the end of the day",
        "in today's fast-paced",
        "as technology continues to",
        "let's break this down",
        "let's dive in",
        "in this post, we'll explore",
        "in this article, we'll",
        "let me know if",
        "would you like me to",
        "i hope this helps",
        "without further ado",
        "you might be wondering",
        "great question",
        "feel free to",
        "don't hesitate to",
        "to put it simply",
        "the bottom line is",
        "the key takeaway",
        "plays a crucial role",
        "plays a vital role",
        "a rich tapestry",
        "navigate the complexities",
        "ever-evolving",
    ],
};

pub const PROMOTIONAL_LANGUAGE: Lexicon = Lexicon {
    category: "promotional_language",
    weight: 5.0,
    kind: EntryKind::Phrases,
    entries: &[
        "nestled",
        "breathtaking",
        "stunning",
        "captivating",
        "vibrant",
        "must-visit",
        "hidden gem",
        "rich cultural heritage",
        "rich history",
        "boasts a",
        "in the heart of",
        "world-class",
        "renowned for",
        "unforgettable experience",
        "a testament to",
        "stands as a",
        "truly remarkable",
    ],
};

pub const RULE_OF_THREE: Lexicon = Lexicon {
    category: "rule_of_three",
    weight: 5.0,
    kind: EntryKind::Patterns,
    entries: &[r"\b\w+, \w+,? and \w+\b"],
};

pub const NEGATIVE_PARALLELISM: Lexicon = Lexicon {
    category: "negative_parallelism",
    weight: 8.0,
    kind: EntryKind::Patterns,
    entries: &[
        r"\bnot (?:just|only|merely) [^.;!?]{1,40}, but (?:also )?",
        r"\b(?:it's|it is|this is|that's|that is) not (?:just |only )?(?:about )?[^.;!?]{1,40}[,;] (?:it's|it is|this is|that's|that is) ",
        r"\bno [^.;!?]{1,30}, no [^.;!?]{1,30}, just\b",
    ],
};

pub const OUTLINE_CONCLUSION: Lexicon = Lexicon {
    category: "outline_conclusion",
    weight: 8.0,
    kind: EntryKind::Phrases,
    entries: &[
        "in conclusion",
        "in summary",
        "to sum up",
        "to summarize",
        "despite its challenges",
        "despite these challenges",
        "despite the challenges",
        "future prospects",
        "looking ahead",
        "continues to thrive",
        "the future looks bright",
        "remains to be seen",
    ],
};

pub const TRANSITION_WORDS: Lexicon = Lexicon {
    category: "transition_words",
    weight: 3.0,
    kind: EntryKind::Words,
    entries: &[
        "furthermore", "moreover", "additionally", "consequently", "nevertheless", "nonetheless",
        "notably", "importantly", "subsequently", "thus", "hence", "accordingly", "ultimately",
        "interestingly", "remarkably", "significantly",
    ],
};

pub const AI_DISCLOSURE: Lexicon = Lexicon {
    category: "ai_disclosure",
    weight: 20.0,
    kind: EntryKind::Patterns,
    entries: &[
        r"\bas an ai\b",
        r"\bas a language model\b",
        r"\bi don't have personal\b",
        r"\bi cannot browse\b",
        r"\bup to my last training\b",
        r"\bas of my (?:last |knowledge )?cutoff\b",
        r"\bi'm just an? ai\b",
        r"\bas an ai language model\b",
    ],
};

pub const WEASEL_WORDS: Lexicon = Lexicon {
    category: "weasel_words",
    weight: 5.0,
    kind: EntryKind::Phrases,
    entries: &[
        "some critics argue",
        "many believe",
        "experts suggest",
        "studies show",
        "some argue",
        "it is widely believed",
        "research suggests",
        "observers have noted",
        "industry reports",
    ],
};

pub const CATALOGUE: &[Lexicon] = &[
    AI_VOCABULARY,
    STOCK_PHRASES,
    PROMOTIONAL_LANGUAGE,
    RULE_OF_THREE,
    NEGATIVE_PARALLELISM,
    OUTLINE_CONCLUSION,
    TRANSITION_WORDS,
    AI_DISCLOSURE,
    WEASEL_WORDS,
];

/// Compile every catalogue entry.
pub fn builtin() -> Result<Vec<LexiconDetector>> {
    CATALOGUE.iter().map(LexiconDetector::new).collect()
}

// ---------------------------------------------------------------------------
// Lexicon detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LexiconDetector {
    category: &'static str,
    weight: f64,
    patterns: Vec<Regex>,
}

fn compile(category: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){pattern}")).map_err(|source| Error::InvalidPattern {
        category: category.to_string(),
        source,
    })
}

/// Word boundaries only where the phrase starts or ends in a word character,
/// so entries like "ever-evolving" and "in this post, we'll" still anchor.
fn bounded(literal: &str) -> String {
    let escaped = regex::escape(literal);
    let word_char = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let head = if word_char(literal.chars().next()) { r"\b" } else { "" };
    let tail = if word_char(literal.chars().last()) { r"\b" } else { "" };
    format!("{head}{escaped}{tail}")
}

impl LexiconDetector {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let patterns = match lexicon.kind {
            EntryKind::Words => {
                let alt = lexicon
                    .entries
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                vec![compile(lexicon.category, &format!(r"\b(?:{alt})\b"))?]
            }
            EntryKind::Phrases => lexicon
                .entries
                .iter()
                .map(|p| compile(lexicon.category, &bounded(p)))
                .collect::<Result<Vec<_>>>()?,
            EntryKind::Patterns => lexicon
                .entries
                .iter()
                .map(|p| compile(lexicon.category, p))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self {
            category: lexicon.category,
            weight: lexicon.weight,
            patterns,
        })
    }

    /// Every match as `(start, end, normalized phrase)`, in text order.
    /// A match lying inside a longer one from another entry is dropped, so
    /// "as an ai language model" is one occurrence, not two.
    fn occurrences(&self, text: &str) -> Vec<(usize, usize, String)> {
        let mut spans: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)));

        let mut kept = Vec::with_capacity(spans.len());
        let mut covered_to = 0;
        for (start, end) in spans {
            if !kept.is_empty() && end <= covered_to {
                continue;
            }
            covered_to = covered_to.max(end);
            kept.push((start, end, normalize(&text[start..end])));
        }
        kept
    }
}

fn normalize(matched: &str) -> String {
    matched
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([',', ' '])
        .to_lowercase()
}

impl Detector for LexiconDetector {
    fn category(&self) -> &str {
        self.category
    }

    fn detect(&self, text: &str) -> std::result::Result<Signal, DetectorError> {
        // First-seen order, one entry per distinct phrase.
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (_, _, phrase) in self.occurrences(text) {
            let count = counts.entry(phrase.clone()).or_insert(0);
            if *count == 0 {
                order.push(phrase);
            }
            *count += 1;
        }

        let matches = order
            .into_iter()
            .map(|phrase| {
                let count = counts[&phrase];
                PatternMatch::new(self.category, phrase, count, count as f64 * self.weight)
            })
            .collect();
        Ok(Signal {
            matches,
            factors: Vec::new(),
        })
    }

    fn highlight(&self, text: &str, matches: &[PatternMatch]) -> Vec<TextHighlight> {
        let wanted: HashSet<&str> = matches.iter().map(|m| m.phrase.as_str()).collect();
        self.occurrences(text)
            .into_iter()
            .filter(|(_, _, phrase)| wanted.contains(phrase.as_str()))
            .map(|(start, end, _)| TextHighlight::new(start, end, self.category))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Repetition
// ---------------------------------------------------------------------------

pub const REPETITION: &str = "repetition";

const NGRAM_MIN_N: usize = 4;
const NGRAM_MAX_N: usize = 8;
const NGRAM_MIN_COUNT: usize = 3;
const REPETITION_WEIGHT: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedPhrase {
    pub phrase: String,
    pub n: usize,
    /// Byte spans of every occurrence.
    pub spans: Vec<(usize, usize)>,
}

impl RepeatedPhrase {
    pub fn count(&self) -> usize {
        self.spans.len()
    }
}

/// Word n-grams (4 to 8 words) that occur at least three times and are not
/// made only of stopwords. A shorter n-gram contained in a longer one that
/// occurs at least as often is dropped. Longest first, then most frequent.
pub fn repeated_phrases(input: &str) -> Vec<RepeatedPhrase> {
    let tokens = text::tokens(input);
    if tokens.len() < NGRAM_MIN_N {
        return Vec::new();
    }

    let mut spans: HashMap<Vec<&str>, Vec<(usize, usize)>> = HashMap::new();
    for n in NGRAM_MIN_N..=NGRAM_MAX_N.min(tokens.len()) {
        for window in tokens.windows(n) {
            let gram: Vec<&str> = window.iter().map(|t| t.lower.as_str()).collect();
            let span = (window[0].start, window[n - 1].end);
            spans.entry(gram).or_default().push(span);
        }
    }

    let mut repeated: Vec<(String, usize, Vec<(usize, usize)>)> = spans
        .into_iter()
        .filter(|(gram, occurrences)| {
            occurrences.len() >= NGRAM_MIN_COUNT && !gram.iter().all(|w| STOPWORDS.contains(*w))
        })
        .map(|(gram, occurrences)| (gram.join(" "), gram.len(), occurrences))
        .collect();
    repeated.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.len().cmp(&a.2.len()))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut kept: Vec<RepeatedPhrase> = Vec::new();
    for (phrase, n, occurrences) in repeated {
        let subsumed = kept.iter().any(|longer| {
            longer.n > n
                && longer.count() >= occurrences.len()
                && format!(" {} ", longer.phrase).contains(&format!(" {phrase} "))
        });
        if !subsumed {
            kept.push(RepeatedPhrase {
                phrase,
                n,
                spans: occurrences,
            });
        }
    }
    kept
}

/// Percentage of word tokens that repeat an earlier token. Zero for no words.
pub fn repeated_token_share(input: &str) -> f64 {
    let words = text::words(input);
    let unique = words.iter().collect::<HashSet<_>>().len();
    ratio((words.len() - unique) as f64, words.len() as f64) * 100.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RepetitionDetector;

impl Detector for RepetitionDetector {
    fn category(&self) -> &str {
        REPETITION
    }

    fn detect(&self, text: &str) -> std::result::Result<Signal, DetectorError> {
        let matches = repeated_phrases(text)
            .into_iter()
            .map(|rp| {
                let count = rp.count();
                let score = (count - 1) as f64 * REPETITION_WEIGHT;
                PatternMatch::new(REPETITION, rp.phrase, count, score)
            })
            .collect();
        Ok(Signal {
            matches,
            factors: vec![("repeated_token_share", repeated_token_share(text))],
        })
    }

    fn highlight(&self, text: &str, matches: &[PatternMatch]) -> Vec<TextHighlight> {
        let wanted: HashSet<&str> = matches.iter().map(|m| m.phrase.as_str()).collect();
        repeated_phrases(text)
            .into_iter()
            .filter(|rp| wanted.contains(rp.phrase.as_str()))
            .flat_map(|rp| rp.spans)
            .map(|(start, end)| TextHighlight::new(start, end, REPETITION))
            .collect()
    }
}
