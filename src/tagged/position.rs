//! Mapping between tagged and visible coordinates.
//!
//! A tagged position is a byte offset into the delimiter-inclusive string;
//! a visible position is a `char` index into the user-facing text. Editors
//! work in visible positions (that is what the caret, hit-testing, and
//! selections use) and convert to tagged positions at the edit boundary.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::tagged::scan::skip_tag;

/// Literal `<` characters are stored escaped so they cannot be read as
/// delimiter openers. [`untag`] decodes them back.
pub const ESCAPED_OPEN: char = '\u{1}';

/// Encode literal `<` characters for storage inside a tagged string.
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('<', "\u{1}")
}

/// The visible text: delimiters removed, escapes decoded.
#[must_use]
pub fn untag(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text.as_bytes()[i] == b'<' {
            i = skip_tag(text, i);
            continue;
        }
        let ch = text[i..].chars().next().expect("char at boundary");
        out.push(if ch == ESCAPED_OPEN { '<' } else { ch });
        i += ch.len_utf8();
    }
    out
}

/// Number of visible characters (`char` count of the untagged text).
#[must_use]
pub fn visible_len(text: &str) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < text.len() {
        if text.as_bytes()[i] == b'<' {
            i = skip_tag(text, i);
        } else {
            len += 1;
            i += text[i..].chars().next().expect("char at boundary").len_utf8();
        }
    }
    len
}

/// Visible position of a tagged position. Positions inside a delimiter map
/// to the visible position at the delimiter's start.
#[must_use]
pub fn tagged_to_visible(text: &str, pos: usize) -> usize {
    let mut vis = 0;
    let mut i = 0;
    while i < text.len() && i < pos {
        if text.as_bytes()[i] == b'<' {
            i = skip_tag(text, i);
        } else {
            vis += 1;
            i += text[i..].chars().next().expect("char at boundary").len_utf8();
        }
    }
    vis
}

/// Placement policy when a visible position falls on a delimiter boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Land inside adjacent tags: skip past opening delimiters, stop before
    /// closing ones. Insertions at this position inherit the formatting.
    Inside,
    /// Land outside adjacent tags: skip past closing delimiters, stop
    /// before opening ones.
    Outside,
}

/// Tagged position of a visible position.
///
/// When the visible position sits at a delimiter boundary, `anchor` decides
/// which side of the adjacent delimiters the result lands on. Positions at
/// or past the visible end map to the tagged length.
#[must_use]
pub fn visible_to_tagged(text: &str, pos: usize, anchor: Anchor) -> usize {
    let mut vis = 0;
    let mut i = 0;
    while i < text.len() {
        if text.as_bytes()[i] == b'<' {
            let close = text[i..].starts_with("</");
            if vis == pos {
                match (anchor, close) {
                    (Anchor::Inside, true) | (Anchor::Outside, false) => return i,
                    _ => {}
                }
            }
            i = skip_tag(text, i);
        } else {
            if vis == pos {
                return i;
            }
            vis += 1;
            i += text[i..].chars().next().expect("char at boundary").len_utf8();
        }
    }
    text.len()
}

/// Terminal-cell display width of the visible text.
#[must_use]
pub fn display_width(text: &str) -> usize {
    untag(text).width()
}

/// Number of user-perceived characters (grapheme clusters) in the visible
/// text. Differs from [`visible_len`] for combining marks and emoji.
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    untag(text).graphemes(true).count()
}
