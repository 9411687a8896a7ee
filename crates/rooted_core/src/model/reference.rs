//! Verse reference and text segment models.
//!
//! # Responsibility
//! - Define the immutable reference shape produced by detection.
//! - Define the segment shape consumed by note renderers.
//! - Define the five-part key shared by cache and fetch layers.
//!
//! # Invariants
//! - `chapter >= 1`, `verse_start >= 1`, `verse_end >= verse_start` for every
//!   constructed reference.
//! - References are value objects; they are never persisted as-is.
//!
//! # See also
//! - docs/architecture/detection.md

use crate::model::book;
use serde::Serialize;

/// One scripture reference detected inside free text.
///
/// Detection discards malformed candidates instead of constructing invalid
/// references, so consumers can rely on the range invariants holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseReference {
    /// Exact matched input slice, including any comma continuations.
    pub raw: String,
    /// Book token as it appeared in the input (`"1 Jn"`, `"john"`, ...).
    pub book_raw: String,
    /// Canonical USFM book code resolved from `book_raw`.
    pub book_id: &'static str,
    /// 1-based chapter number.
    pub chapter: u32,
    /// 1-based first verse of the span.
    pub verse_start: u32,
    /// Last verse of the span. Equals `verse_start` for single verses.
    pub verse_end: u32,
}

impl VerseReference {
    /// Canonical display label, e.g. `"John 3:16"` or `"John 3:16-18"`.
    pub fn display_label(&self) -> String {
        let name = book::book_name(self.book_id).unwrap_or(self.book_id);
        if self.verse_end > self.verse_start {
            format!(
                "{name} {}:{}-{}",
                self.chapter, self.verse_start, self.verse_end
            )
        } else {
            format!("{name} {}:{}", self.chapter, self.verse_start)
        }
    }
}

/// One run of note text, either plain or carrying a detected reference.
///
/// Segment contents concatenate back to the exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextSegment {
    /// Plain text between references.
    Text {
        /// Verbatim slice of the source text.
        content: String,
    },
    /// Text span recognized as a scripture reference.
    Verse {
        /// Verbatim slice of the source text.
        content: String,
        /// The parsed reference for this span.
        reference: VerseReference,
    },
}

impl TextSegment {
    /// Verbatim content of this segment.
    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::Verse { content, .. } => content,
        }
    }
}

/// Five-part identity of one cached/fetched verse span.
///
/// Two requests share cached text only when translation, book, chapter and
/// the exact verse range all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseKey<'a> {
    /// Translation id, e.g. `"BSB"`.
    pub translation: &'a str,
    /// Canonical USFM book code.
    pub book_id: &'a str,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
}

impl<'a> VerseKey<'a> {
    /// Builds the cache/fetch key for a detected reference.
    pub fn for_reference(reference: &'a VerseReference, translation: &'a str) -> Self {
        Self {
            translation,
            book_id: reference.book_id,
            chapter: reference.chapter,
            verse_start: reference.verse_start,
            verse_end: reference.verse_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TextSegment, VerseKey, VerseReference};

    fn reference(verse_end: u32) -> VerseReference {
        VerseReference {
            raw: "John 3:16".to_string(),
            book_raw: "John".to_string(),
            book_id: "JHN",
            chapter: 3,
            verse_start: 16,
            verse_end,
        }
    }

    #[test]
    fn display_label_formats_single_verse_and_range() {
        assert_eq!(reference(16).display_label(), "John 3:16");
        assert_eq!(reference(18).display_label(), "John 3:16-18");
    }

    #[test]
    fn key_copies_reference_coordinates() {
        let verse = reference(18);
        let key = VerseKey::for_reference(&verse, "BSB");
        assert_eq!(key.translation, "BSB");
        assert_eq!(key.book_id, "JHN");
        assert_eq!(key.chapter, 3);
        assert_eq!(key.verse_start, 16);
        assert_eq!(key.verse_end, 18);
    }

    #[test]
    fn segment_content_is_uniform_across_variants() {
        let text = TextSegment::Text {
            content: "hello ".to_string(),
        };
        let verse = TextSegment::Verse {
            content: "John 3:16".to_string(),
            reference: reference(16),
        };
        assert_eq!(text.content(), "hello ");
        assert_eq!(verse.content(), "John 3:16");
    }
}
