//! Explainable heuristics for estimating whether a passage of prose was
//! written by a language model.
//!
//! [`analyze`] runs every built-in detector over the text and returns a
//! 0 to 100 score, a factor breakdown, the matched patterns and a list of
//! non-overlapping spans to highlight. Everything is a calibrated heuristic;
//! the score is an editing aid, not proof.
//!
//! ```
//! let result = prose_signal::analyze(
//!     "The report was written. The data was analyzed. The files were submitted.",
//! );
//! assert_eq!(result.category_score("passive_voice"), 35.0);
//! ```

pub mod aggregate;
pub mod config;
pub mod detector;
pub mod error;
pub mod highlight;
pub mod lexicon;
pub mod stats;
pub mod text;

use once_cell::sync::Lazy;

pub use aggregate::{Analyzer, DetectionResult};
pub use config::{CapTable, Config};
pub use detector::{Detector, PatternMatch, Registry, Signal, TextHighlight};
pub use error::{DetectorError, Error, Result};

static DEFAULT_ANALYZER: Lazy<Analyzer> = Lazy::new(|| {
    Analyzer::new(&Config::default()).expect("built-in detector catalogue must compile")
});

/// Analyze `text` with the built-in detectors and default caps.
pub fn analyze(text: &str) -> DetectionResult {
    DEFAULT_ANALYZER.analyze(text)
}
