//! Data models for scraped articles, translated segments and composed messages.
//!
//! - [`ProcessedRecord`]: the only durable entity, one per published article
//! - [`ContentSegment`]: one translatable piece of an article body
//! - [`ScrapedArticle`]: heading plus ordered segments of one article page
//! - [`TranslatedSegment`]: a segment paired with its best-effort translation
//! - [`ComposedMessage`]: header and the two body halves ready for chunking

use serde::{Deserialize, Serialize};

/// Marker persisted after an article has been published.
///
/// Stored as `{ "url": "..." }` in the links collection. A URL appears at
/// most once; the store checks for an existing record before inserting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessedRecord {
    pub url: String,
}

/// Role of a segment, derived from the tag it was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// `<p>`
    Paragraph,
    /// `<h2>`
    Subheading,
    /// `<h4>`
    Emphasis,
    /// One `<li>` of an unordered list.
    ListItem,
    /// Blank separator emitted after the last item of a list. Carries no text.
    ListBreak,
}

impl SegmentRole {
    /// Bullet prefixed to both the translated and the original line.
    pub fn marker(self) -> &'static str {
        match self {
            SegmentRole::Paragraph => "🔸",
            SegmentRole::Subheading => "🔹",
            SegmentRole::Emphasis => "⚡",
            SegmentRole::ListItem => "•",
            SegmentRole::ListBreak => "",
        }
    }

    /// Whether this segment has text worth sending to the translator.
    pub fn is_translatable(self) -> bool {
        !matches!(self, SegmentRole::ListBreak)
    }
}

/// A piece of article body in document order, untranslated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSegment {
    pub role: SegmentRole,
    pub original: String,
}

impl ContentSegment {
    pub fn new(role: SegmentRole, original: impl Into<String>) -> Self {
        Self {
            role,
            original: original.into(),
        }
    }

    pub fn list_break() -> Self {
        Self::new(SegmentRole::ListBreak, String::new())
    }
}

/// Result of extracting one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub url: String,
    pub heading: String,
    pub segments: Vec<ContentSegment>,
}

/// A segment after translation. `translated` may equal `original` when the
/// translator fell back to pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedSegment {
    pub role: SegmentRole,
    pub original: String,
    pub translated: String,
}

/// Header plus body split in two near the midpoint.
///
/// `body_part2` is empty when no split point was found; in that case only one
/// message unit is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub header: String,
    pub body_part1: String,
    pub body_part2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_record_serialization() {
        let record = ProcessedRecord {
            url: "https://www.gktoday.in/some-article/".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"url":"https://www.gktoday.in/some-article/"}"#);
    }

    #[test]
    fn test_list_break_is_not_translatable() {
        assert!(!SegmentRole::ListBreak.is_translatable());
        assert!(SegmentRole::ListItem.is_translatable());
        assert_eq!(ContentSegment::list_break().original, "");
    }

    #[test]
    fn test_markers_differ_per_role() {
        assert_eq!(SegmentRole::Paragraph.marker(), "🔸");
        assert_eq!(SegmentRole::Subheading.marker(), "🔹");
        assert_eq!(SegmentRole::Emphasis.marker(), "⚡");
        assert_eq!(SegmentRole::ListItem.marker(), "•");
    }
}
