//! Tokenizer and segmenter.
//!
//! Words are runs of word characters, sentences end at a run of `.`, `!` or
//! `?` (optionally followed by closing quotes or brackets), and paragraphs
//! are separated by blank lines. All offsets are byte offsets into the
//! original text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static TERMINAL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*(?:\s+|$)"#).unwrap());

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());

pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it",
        "that", "this", "with", "as", "by", "from", "was", "were", "are", "be", "been", "has",
        "have", "had", "not", "no", "do", "does", "did", "will", "would", "could", "should", "can",
        "may", "might", "if", "then", "than", "so", "up", "out", "about", "into", "over", "after",
        "before", "between", "through", "just", "also", "very", "more", "most", "some", "any",
        "each", "every", "all", "both", "few", "other", "such", "only", "own", "same", "too",
        "how", "what", "which", "who", "when", "where", "why", "i", "you", "he", "she", "we",
        "they", "them", "his", "her", "its", "our", "their", "my", "your",
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub lower: String,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn syllables(&self) -> usize {
        count_syllables(&self.lower)
    }
}

/// Word tokens of `text`, offsets relative to `text`.
pub fn tokens(text: &str) -> Vec<Token<'_>> {
    WORD_RE
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            lower: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Lowercased word tokens.
pub fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Number of runs of terminal punctuation, never less than one.
pub fn terminal_runs(text: &str) -> usize {
    TERMINAL_RUN_RE.find_iter(text).count().max(1)
}

// ---------------------------------------------------------------------------
// Syllables
// ---------------------------------------------------------------------------

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Heuristic syllable count: vowel groups, minus a silent trailing `e`
/// unless the word ends in consonant + `le`. Always at least one.
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.to_lowercase().chars().collect();

    let mut groups = 0usize;
    let mut prev_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }

    let n = chars.len();
    if n >= 2 && chars[n - 1] == 'e' {
        let consonant_le =
            n >= 3 && chars[n - 2] == 'l' && chars[n - 3].is_alphabetic() && !is_vowel(chars[n - 3]);
        if !consonant_le && groups > 1 {
            groups -= 1;
        }
    }

    groups.max(1)
}

// ---------------------------------------------------------------------------
// Sentences and paragraphs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub tokens: Vec<Token<'a>>,
}

impl Sentence<'_> {
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

#[derive(Debug, Clone)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    pub start: usize,
    pub sentences: Vec<Sentence<'a>>,
}

/// Segmented view of one input. Built fresh for every analysis.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub text: &'a str,
    pub paragraphs: Vec<Paragraph<'a>>,
}

impl<'a> Document<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut paragraphs = Vec::new();
        let mut cursor = 0;
        for brk in PARAGRAPH_BREAK_RE.find_iter(text) {
            push_paragraph(&mut paragraphs, text, cursor, brk.start());
            cursor = brk.end();
        }
        push_paragraph(&mut paragraphs, text, cursor, text.len());
        Self { text, paragraphs }
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sentence<'a>> {
        self.paragraphs.iter().flat_map(|p| p.sentences.iter())
    }

    pub fn sentence_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.sentences.len()).sum()
    }
}

fn push_paragraph<'a>(out: &mut Vec<Paragraph<'a>>, text: &'a str, start: usize, end: usize) {
    let body = &text[start..end];
    let sentences = split_sentences(body, start);
    if sentences.is_empty() {
        return;
    }
    out.push(Paragraph {
        text: body,
        start,
        sentences,
    });
}

fn split_sentences(body: &str, base: usize) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut cursor = 0;
    for end in SENTENCE_END_RE.find_iter(body) {
        push_sentence(&mut sentences, body, base, cursor, end.end());
        cursor = end.end();
    }
    if cursor < body.len() {
        push_sentence(&mut sentences, body, base, cursor, body.len());
    }
    sentences
}

fn push_sentence<'a>(
    out: &mut Vec<Sentence<'a>>,
    body: &'a str,
    base: usize,
    start: usize,
    end: usize,
) {
    let raw = &body[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let offset = base + start + lead;
    let tokens: Vec<Token<'a>> = tokens(trimmed)
        .into_iter()
        .map(|t| Token {
            start: t.start + offset,
            end: t.end + offset,
            ..t
        })
        .collect();
    // Sentences without a single word are discarded.
    if tokens.is_empty() {
        return;
    }
    out.push(Sentence {
        text: trimmed,
        start: offset,
        tokens,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_lowercased_word_runs() {
        assert_eq!(words("The cat's HAT, 42!"), vec!["the", "cat", "s", "hat", "42"]);
        assert!(words("...!?").is_empty());
    }

    #[test]
    fn syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("whole"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("READING"), 2);
        assert_eq!(count_syllables("1999"), 1);
    }

    #[test]
    fn terminal_runs_minimum_one() {
        assert_eq!(terminal_runs("no punctuation here"), 1);
        assert_eq!(terminal_runs("One. Two?! Three..."), 3);
    }

    #[test]
    fn sentences_and_offsets() {
        let text = "First one here. Second!  Third?";
        let doc = Document::parse(text);
        let sentences: Vec<_> = doc.sentences().collect();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].text, "First one here.");
        assert_eq!(sentences[1].text, "Second!");
        assert_eq!(&text[sentences[2].start..sentences[2].end()], "Third?");
        let tok = &sentences[1].tokens[0];
        assert_eq!(&text[tok.start..tok.end], "Second");
    }

    #[test]
    fn wordless_sentences_are_dropped() {
        let doc = Document::parse("... !!! Real words here.");
        assert_eq!(doc.sentence_count(), 1);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "Para one. Still one.\n\n  \nPara two.\nSame para.";
        let doc = Document::parse(text);
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.paragraphs[0].sentences.len(), 2);
        assert_eq!(doc.paragraphs[1].sentences.len(), 2);
        assert_eq!(doc.paragraphs[1].sentences[0].text, "Para two.");
    }

    #[test]
    fn empty_document() {
        let doc = Document::parse("   \n\n ");
        assert!(doc.paragraphs.is_empty());
        assert_eq!(doc.sentence_count(), 0);
    }

    #[test]
    fn decimal_point_does_not_end_sentence() {
        let doc = Document::parse("Pi is roughly 3.14 in value. Done.");
        assert_eq!(doc.sentence_count(), 2);
    }
}
