//! Redundant-tag collapse.
//!
//! Edits build candidate strings by splicing delimiters in, which can leave
//! vacuous markup behind: empty pairs, a close immediately reopened, or a
//! tag nested inside itself. [`simplify_tagged`] removes all of it without
//! changing the visible text or the effective formatting of any character.

use crate::tagged::scan::{Tag, match_close_tag, skip_tag, tags};

/// Collapse redundant markup until a fixed point is reached.
///
/// Three rewrites are applied repeatedly:
///
/// 1. empty pair: `<x></x>` with nothing between is removed
/// 2. close-reopen: `</x><x>` with nothing between is removed, joining the
///    adjacent spans
/// 3. redundant nesting: a `<x>` opened while already inside `<x>` is
///    removed along with its matching closer
///
/// Balanced input stays balanced. Callers that insert an intentional empty
/// pair (a zero-width toggle) must skip this pass so the pair survives.
#[must_use]
pub fn simplify_tagged(text: &str) -> String {
    let mut current = text.to_owned();
    loop {
        match simplify_once(&current) {
            Some(next) => current = next,
            None => return current,
        }
    }
}

/// One rewrite step. `None` when nothing is left to simplify.
fn simplify_once(text: &str) -> Option<String> {
    let found: Vec<Tag<'_>> = tags(text).collect();

    // Adjacent cancellation: an empty pair or a close-reopen of the same
    // name with no visible characters between.
    for pair in found.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.end == b.start && a.name == b.name && a.close != b.close {
            return Some(remove_ranges(text, a.start..a.end, b.start..b.end));
        }
    }

    // Redundant nesting: an open delimiter for a tag we are already inside.
    let mut open: Vec<&str> = Vec::new();
    for t in &found {
        if t.close {
            if let Some(i) = open.iter().rposition(|name| *name == t.name) {
                open.remove(i);
            }
        } else {
            if open.contains(&t.name) {
                if let Some(close) = match_close_tag(text, t.start) {
                    let close_end = skip_tag(text, close);
                    return Some(remove_ranges(text, t.start..t.end, close..close_end));
                }
            }
            open.push(t.name);
        }
    }

    None
}

/// Copy `text` without the two non-overlapping byte ranges.
fn remove_ranges(
    text: &str,
    first: std::ops::Range<usize>,
    second: std::ops::Range<usize>,
) -> String {
    debug_assert!(first.end <= second.start);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first.start]);
    out.push_str(&text[first.end..second.start]);
    out.push_str(&text[second.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_empty_pairs() {
        assert_eq!(simplify_tagged("<b></b>"), "");
        assert_eq!(simplify_tagged("a<b></b>c"), "ac");
        // cascades: removing the inner pair empties the outer one
        assert_eq!(simplify_tagged("<b><i></i></b>"), "");
    }

    #[test]
    fn test_joins_adjacent_spans() {
        assert_eq!(simplify_tagged("<b>ab</b><b>cd</b>"), "<b>abcd</b>");
        assert_eq!(simplify_tagged("<b>a</b><b>b</b><b>c</b>"), "<b>abc</b>");
    }

    #[test]
    fn test_removes_redundant_nesting() {
        assert_eq!(simplify_tagged("<b>a<b>c</b>d</b>"), "<b>acd</b>");
        assert_eq!(simplify_tagged("<b><b>x</b></b>"), "<b>x</b>");
    }

    #[test]
    fn test_keeps_meaningful_markup() {
        for text in [
            "plain",
            "<b>bold</b>",
            "<b>a</b>x<b>b</b>",
            "<b>a<i>b</i></b>",
            "<kw-1>flying</kw-1>",
        ] {
            assert_eq!(simplify_tagged(text), text);
        }
    }

    #[test]
    fn test_snapshot_toggle_residue() {
        // residue of a toggle that removed bold from the middle of a span
        insta::assert_snapshot!(
            simplify_tagged("<b>a</b>b<b></b><b>c</b>"),
            @"<b>a</b>b<b>c</b>"
        );
        // residue of a whole-span toggle
        insta::assert_snapshot!(simplify_tagged("<b></b>abc<b></b>"), @"abc");
    }
}
