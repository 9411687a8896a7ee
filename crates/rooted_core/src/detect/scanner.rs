//! Regex scan producing verse references and text segments.
//!
//! # Responsibility
//! - Run the reference grammar over input text, leftmost first.
//! - Validate candidate matches against the reference invariants.
//!
//! # Invariants
//! - Emitted references satisfy `chapter >= 1`, `verse_start >= 1`,
//!   `verse_end >= verse_start`.
//! - A discarded candidate contributes its text to the surrounding plain
//!   segments; it never truncates the scan.

use crate::model::book;
use crate::model::reference::{TextSegment, VerseReference};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// Book token (optional leading digit), chapter:verse, optional -end, then
// any number of comma continuations. Continuations are consumed so they do
// not spawn bogus matches, but only the first start/end pair is kept.
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d?\s*[A-Za-z]+)\s+(\d+):(\d+)(?:-(\d+))?(?:,\s*\d+(?:-\d+)?)*")
        .expect("valid reference regex")
});

struct SpannedReference {
    span: Range<usize>,
    reference: VerseReference,
}

/// Detects all verse references in `text`, leftmost first.
///
/// Candidates with an unknown book token, an out-of-range number, a zero
/// chapter/verse or an inverted range are skipped without error.
pub fn detect_references(text: &str) -> Vec<VerseReference> {
    scan(text)
        .into_iter()
        .map(|spanned| spanned.reference)
        .collect()
}

/// Splits `text` into alternating plain/reference segments.
///
/// Segment contents concatenate back to `text` exactly. Empty input yields
/// one empty plain segment so renderers always receive at least one item.
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0usize;

    for spanned in scan(text) {
        if spanned.span.start > cursor {
            segments.push(TextSegment::Text {
                content: text[cursor..spanned.span.start].to_string(),
            });
        }
        segments.push(TextSegment::Verse {
            content: text[spanned.span.clone()].to_string(),
            reference: spanned.reference,
        });
        cursor = spanned.span.end;
    }

    if cursor < text.len() || segments.is_empty() {
        segments.push(TextSegment::Text {
            content: text[cursor..].to_string(),
        });
    }

    segments
}

fn scan(text: &str) -> Vec<SpannedReference> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let book_token = caps.get(1)?.as_str();
            let book_id = book::book_code(book_token)?;

            let chapter: u32 = caps.get(2)?.as_str().parse().ok()?;
            let verse_start: u32 = caps.get(3)?.as_str().parse().ok()?;
            let verse_end: u32 = match caps.get(4) {
                Some(end) => end.as_str().parse().ok()?,
                None => verse_start,
            };

            if chapter == 0 || verse_start == 0 || verse_end < verse_start {
                return None;
            }

            Some(SpannedReference {
                span: whole.range(),
                reference: VerseReference {
                    raw: whole.as_str().to_string(),
                    book_raw: book_token.trim().to_string(),
                    book_id,
                    chapter,
                    verse_start,
                    verse_end,
                },
            })
        })
        .collect()
}
