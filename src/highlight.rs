//! Merges highlight spans from every detector into one non-overlapping list.

use crate::detector::TextHighlight;

/// Sort by start offset and greedily keep each span that does not overlap a
/// span already kept. Spans that are empty, inverted, out of range or not on
/// a char boundary of `text` are dropped first.
///
/// The sort is stable, so among spans with the same start the one from the
/// earlier detector wins.
pub fn resolve(text: &str, mut highlights: Vec<TextHighlight>) -> Vec<TextHighlight> {
    highlights.retain(|h| {
        h.start < h.end
            && h.end <= text.len()
            && text.is_char_boundary(h.start)
            && text.is_char_boundary(h.end)
    });
    highlights.sort_by_key(|h| h.start);

    let mut kept: Vec<TextHighlight> = Vec::with_capacity(highlights.len());
    for candidate in highlights {
        // Kept spans are disjoint and ordered, so only the last can reach
        // past `candidate.start`.
        let clashes = kept.last().is_some_and(|last| last.overlaps(&candidate));
        if !clashes {
            kept.push(candidate);
        }
    }
    kept
}
