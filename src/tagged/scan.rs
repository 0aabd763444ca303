//! Delimiter scanning over tagged strings.
//!
//! Positions here are tagged positions (byte offsets). A delimiter starts at
//! a literal `<` and runs through the next `>`; a closing delimiter starts
//! with `</`. Literal `<` characters in card text are stored escaped (see
//! [`escape`](crate::tagged::position::escape)), so every raw `<` in a
//! well-formed string begins a delimiter.

use bitflags::bitflags;

/// One delimiter found while scanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tag<'a> {
    /// Tagged position of the `<`.
    pub start: usize,
    /// Tagged position just past the `>` (or the text length if truncated).
    pub end: usize,
    /// Name without brackets or the leading slash: `"</kw-0>"` gives `"kw-0"`.
    pub name: &'a str,
    /// Whether this is a closing delimiter.
    pub close: bool,
}

/// Iterate over the delimiters of `text`, in order, starting at `from`.
pub(crate) fn tags_from(text: &str, from: usize) -> impl Iterator<Item = Tag<'_>> {
    let mut pos = from;
    std::iter::from_fn(move || {
        let offset = text.get(pos..)?.find('<')?;
        let start = pos + offset;
        let end = skip_tag(text, start);
        pos = end;
        Some(Tag {
            start,
            end,
            name: tag_name(text, start),
            close: text[start..].starts_with("</"),
        })
    })
}

/// Iterate over all delimiters of `text`, in order.
pub(crate) fn tags(text: &str) -> impl Iterator<Item = Tag<'_>> {
    tags_from(text, 0)
}

/// Tagged position just past the `>` terminating the delimiter that starts
/// at `open`. Returns the text length for a truncated delimiter.
#[must_use]
pub fn skip_tag(text: &str, open: usize) -> usize {
    debug_assert_eq!(text.as_bytes().get(open), Some(&b'<'));
    text[open..]
        .find('>')
        .map_or(text.len(), |i| open + i + 1)
}

/// Name of the delimiter starting at `open`, without angle brackets or the
/// leading slash: `"<kw-0>"` and `"</kw-0>"` both give `"kw-0"`.
#[must_use]
pub fn tag_name(text: &str, open: usize) -> &str {
    let end = skip_tag(text, open);
    let body = &text[open + 1..end];
    let body = body.strip_suffix('>').unwrap_or(body);
    body.strip_prefix('/').unwrap_or(body)
}

/// Tagged position of the closing delimiter matching the opening delimiter
/// at `open`, skipping nested same-name pairs. `None` if the markup is
/// malformed or the closer is missing.
#[must_use]
pub fn match_close_tag(text: &str, open: usize) -> Option<usize> {
    let name = tag_name(text, open);
    let mut depth = 0usize;
    for tag in tags_from(text, skip_tag(text, open)) {
        if tag.name != name {
            continue;
        }
        if !tag.close {
            depth += 1;
        } else if depth == 0 {
            return Some(tag.start);
        } else {
            depth -= 1;
        }
    }
    None
}

/// Tagged position of the innermost opening delimiter whose name starts
/// with `tag` (written with its `<`, e.g. `"<kw"` or `"<b"`) and whose span
/// covers both `start` and `end` in the same nesting instance. `None` when
/// no such delimiter encloses the range.
#[must_use]
pub fn in_tag(text: &str, tag: &str, start: usize, end: usize) -> Option<usize> {
    debug_assert!(start <= end);
    let prefix = tag.strip_prefix('<').unwrap_or(tag);

    // Open delimiters whose scope has begun before `start`. A position
    // inside an opening delimiter counts as inside its tag.
    let mut open: Vec<Tag<'_>> = Vec::new();
    for t in tags(text) {
        if t.start >= start {
            break;
        }
        if !t.name.starts_with(prefix) {
            continue;
        }
        if t.close {
            if let Some(i) = open.iter().rposition(|o| o.name == t.name) {
                open.remove(i);
            }
        } else {
            open.push(t);
        }
    }

    // Innermost candidates first; the matching closer must not come before
    // `end`, otherwise the endpoints straddle instances. A missing closer
    // leaves the tag open to the end of the text, which covers any range.
    while let Some(candidate) = open.pop() {
        if match_close_tag(text, candidate.start).is_none_or(|close| close >= end) {
            return Some(candidate.start);
        }
    }
    None
}

/// Whether both `start` and `end` lie inside the same instance of `tag`.
#[must_use]
pub fn is_in_tag(text: &str, tag: &str, start: usize, end: usize) -> bool {
    in_tag(text, tag, start, end).is_some()
}

bitflags! {
    /// The formatting and semantic tags the editor toolbar cares about.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TagSet: u8 {
        /// Bold formatting (`<b>`).
        const BOLD     = 0x01;
        /// Italic formatting (`<i>`).
        const ITALIC   = 0x02;
        /// Inline symbol run (`<sym>`).
        const SYMBOL   = 0x04;
        /// Keyword span (`<kw-…>`).
        const KEYWORD  = 0x08;
        /// Reminder text span (`<rem>`).
        const REMINDER = 0x10;
    }
}

/// The set of known tags open at a tagged position. Drives toolbar toggle
/// state for the current cursor.
#[must_use]
pub fn active_tags(text: &str, pos: usize) -> TagSet {
    const KNOWN: [(TagSet, &str); 5] = [
        (TagSet::BOLD, "<b"),
        (TagSet::ITALIC, "<i"),
        (TagSet::SYMBOL, "<sym"),
        (TagSet::KEYWORD, "<kw"),
        (TagSet::REMINDER, "<rem"),
    ];
    let mut set = TagSet::empty();
    for (flag, tag) in KNOWN {
        if is_in_tag(text, tag, pos, pos) {
            set |= flag;
        }
    }
    set
}
