//! Message composition for the Telegram channel.
//!
//! An article becomes at most two message units:
//!
//! ```text
//! header + body_part1 + footer
//! header + body_part2 + footer   (only when body_part2 is non-empty)
//! ```
//!
//! Each unit is then cut into chunks of at most [`TELEGRAM_MESSAGE_LIMIT`]
//! characters. Scraped text is HTML-escaped here because the publisher sends
//! with HTML parse mode.

use crate::models::{ComposedMessage, SegmentRole, TranslatedSegment};
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use std::fmt::Write;

/// Telegram's hard limit on message length.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

const HEADING_MARKER: &str = "🌟";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Build the header and the split body for one article.
pub fn compose(
    heading: &str,
    translated_heading: &str,
    segments: &[TranslatedSegment],
) -> ComposedMessage {
    let header = format!(
        "{HEADING_MARKER} {}\n\n{HEADING_MARKER} {}\n\n",
        encode_text(translated_heading),
        encode_text(heading)
    );
    let body = compose_body(segments);
    let (part1, part2) = split_content_in_two(&body);

    ComposedMessage {
        header,
        body_part1: part1.to_string(),
        body_part2: part2.to_string(),
    }
}

/// Translated line first, original line second, for every segment.
pub fn compose_body(segments: &[TranslatedSegment]) -> String {
    let mut body = String::new();
    for segment in segments {
        let marker = segment.role.marker();
        let translated = encode_text(&segment.translated);
        let original = encode_text(&segment.original);
        // Writing into a String cannot fail.
        let _ = match segment.role {
            SegmentRole::ListBreak => writeln!(body),
            SegmentRole::ListItem => write!(body, "{marker} {translated}\n{marker} {original}\n"),
            SegmentRole::Paragraph | SegmentRole::Subheading | SegmentRole::Emphasis => {
                write!(body, "{marker} {translated}\n\n{marker} {original}\n\n")
            }
        };
    }
    body
}

/// Split `content` in two right after the first newline or sentence
/// terminator at or past the character midpoint.
///
/// Returns `(content, "")` when no such boundary exists. The two halves
/// always concatenate back to `content`.
pub fn split_content_in_two(content: &str) -> (&str, &str) {
    let mid = content.chars().count() / 2;
    match content
        .char_indices()
        .skip(mid)
        .find(|(_, c)| matches!(c, '\n' | '.' | '!' | '?'))
    {
        Some((idx, c)) => content.split_at(idx + c.len_utf8()),
        None => (content, ""),
    }
}

/// Cut `message` into consecutive chunks of at most `max_len` characters.
///
/// Splits purely on character count; words and markup are not respected.
/// An empty message yields no chunks.
pub fn split_message(message: &str, max_len: usize) -> Vec<String> {
    message
        .chars()
        .chunks(max_len.max(1))
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect()
}

/// Channel promotion appended to every message unit.
pub fn promotion_footer(promo_link: &str) -> String {
    format!(
        "\n{RULE}\n\
         🔥 <b>Stay Updated with the Latest News!</b> 🔥\n\
         Join our Telegram channel for:\n\
         📈 Latest Current Updates\n\
         📰 Breaking News\n\
         📚 In-Depth Articles\n\
         💡 GK \n\
         \n\
         👉 <a href=\"{}\"><b>Join Our Telegram Channel</b></a> 👈\n\
         {RULE}\n",
        encode_double_quoted_attribute(promo_link)
    )
}

/// The one or two full message units for a composed article.
pub fn message_units(message: &ComposedMessage, footer: &str) -> Vec<String> {
    let mut units = vec![format!("{}{}{}", message.header, message.body_part1, footer)];
    if !message.body_part2.is_empty() {
        units.push(format!("{}{}{}", message.header, message.body_part2, footer));
    }
    units
}

/// Every chunk to send for an article, in order.
pub fn message_chunks(message: &ComposedMessage, footer: &str) -> Vec<String> {
    message_units(message, footer)
        .iter()
        .flat_map(|unit| split_message(unit, TELEGRAM_MESSAGE_LIMIT))
        .collect()
}
