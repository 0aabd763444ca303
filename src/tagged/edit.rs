//! Balance-preserving mutation of tagged strings.
//!
//! Both algorithms here return `None` when the candidate text is textually
//! identical to the input — "no change" is a distinct outcome so callers
//! never push vacuous undo entries.

use crate::tagged::scan::{is_in_tag, skip_tag};
use crate::tagged::simplify::simplify_tagged;

/// Replace the tagged-position span `[start, end)` with `replacement`.
///
/// `replacement` may itself carry (balanced) tags. Delimiters outside the
/// span are untouched; delimiters inside it are kept and re-emitted directly
/// after the replacement, so a span that covers one end of a pair never
/// leaves the other end unmatched. Returns `None` when the result equals
/// the input.
#[must_use]
pub fn replace_range(text: &str, start: usize, end: usize, replacement: &str) -> Option<String> {
    debug_assert!(start <= end && end <= text.len());

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    // carry delimiters from the replaced span
    let mut i = start;
    while i < end {
        let Some(offset) = text[i..end].find('<') else {
            break;
        };
        let open = i + offset;
        let tag_end = skip_tag(text, open);
        out.push_str(&text[open..tag_end]);
        i = tag_end;
    }
    out.push_str(&text[end..]);

    if out == text { None } else { Some(out) }
}

/// Toggle `tag` (a bare name like `"b"`) over the tagged span
/// `[start, end)`.
///
/// If the span is not inside an instance of the tag, it is wrapped in a
/// fresh pair. If it is, one layer is removed by punching a hole in the
/// enclosing pair: a closer goes in before the span and a matching opener
/// after it. The candidate is then simplified — unless `zero_width` is set,
/// which keeps an inserted empty pair alive so subsequently typed
/// characters land inside it.
///
/// Returns `None` when the result equals the input.
#[must_use]
pub fn toggle_tag(
    text: &str,
    tag: &str,
    start: usize,
    end: usize,
    zero_width: bool,
) -> Option<String> {
    debug_assert!(start <= end && end <= text.len());

    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(&text[..start]);
    if is_in_tag(text, &format!("<{tag}"), start, end) {
        out.push_str(&close);
        out.push_str(&text[start..end]);
        out.push_str(&open);
    } else {
        out.push_str(&open);
        out.push_str(&text[start..end]);
        out.push_str(&close);
    }
    out.push_str(&text[end..]);

    let out = if zero_width { out } else { simplify_tagged(&out) };
    if out == text { None } else { Some(out) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged::position::{untag, visible_len};

    // delimiters pair per tag name; spans of different names may interleave
    fn assert_balanced(text: &str) {
        use crate::tagged::scan::tags;
        use std::collections::HashMap;
        let mut open: HashMap<&str, usize> = HashMap::new();
        for t in tags(text) {
            if t.close {
                let depth = open.get_mut(t.name);
                assert!(
                    depth.as_ref().is_some_and(|depth| **depth > 0),
                    "unmatched closer </{}> in {text:?}",
                    t.name
                );
                *depth.expect("checked above") -= 1;
            } else {
                *open.entry(t.name).or_insert(0) += 1;
            }
        }
        assert!(
            open.values().all(|depth| *depth == 0),
            "unclosed tags in {text:?}"
        );
    }

    #[test]
    fn test_replace_plain_span() {
        assert_eq!(replace_range("abc", 1, 2, "X"), Some("aXc".to_owned()));
        assert_eq!(replace_range("abc", 3, 3, "!"), Some("abc!".to_owned()));
    }

    #[test]
    fn test_replace_no_change() {
        assert_eq!(replace_range("abc", 1, 2, "b"), None);
        assert_eq!(replace_range("abc", 1, 1, ""), None);
    }

    #[test]
    fn test_replace_preserves_outside_delimiters() {
        let out = replace_range("<b>abc</b>", 4, 5, "X").unwrap();
        assert_eq!(out, "<b>aXc</b>");
    }

    #[test]
    fn test_replace_keeps_delimiters_from_span() {
        // span covers the closer; it is re-emitted after the replacement
        let out = replace_range("<b>ab</b>cd", 4, 10, "X").unwrap();
        assert_eq!(out, "<b>aX</b>d");
        assert_balanced(&out);

        // span covers the opener
        let out = replace_range("a<i>bc</i>", 0, 5, "X").unwrap();
        assert_eq!(out, "X<i>c</i>");
        assert_balanced(&out);
    }

    #[test]
    fn test_replace_with_tagged_replacement() {
        let out = replace_range("ab", 1, 2, "<b>B</b>").unwrap();
        assert_eq!(out, "a<b>B</b>");
        assert_balanced(&out);
    }

    #[test]
    fn test_toggle_wraps_untagged_range() {
        let out = toggle_tag("abc", "b", 0, 3, false).unwrap();
        assert_eq!(out, "<b>abc</b>");
    }

    #[test]
    fn test_toggle_removes_whole_span() {
        let out = toggle_tag("<b>abc</b>", "b", 3, 6, false).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_toggle_punches_hole() {
        //                    0123456789
        let out = toggle_tag("<b>abc</b>", "b", 4, 5, false).unwrap();
        assert_eq!(out, "<b>a</b>b<b>c</b>");
        assert_balanced(&out);
    }

    #[test]
    fn test_toggle_zero_width_keeps_empty_pair() {
        let out = toggle_tag("abc", "b", 1, 1, true).unwrap();
        assert_eq!(out, "a<b></b>bc");
        assert_balanced(&out);
    }

    #[test]
    fn test_toggle_double_is_identity() {
        for (text, range) in [
            ("abc", (0, 3)),
            ("<i>abc</i>", (3, 6)),
            ("<b>ab</b>cd", (3, 5)),
        ] {
            let once = toggle_tag(text, "b", range.0, range.1, false).unwrap();
            assert_balanced(&once);
            assert_eq!(untag(&once), untag(text));
            // positions survive because the visible prefix is unchanged
            let start2 = crate::tagged::position::visible_to_tagged(
                &once,
                crate::tagged::position::tagged_to_visible(text, range.0),
                crate::tagged::position::Anchor::Inside,
            );
            let end2 = start2 + (range.1 - range.0);
            let twice = toggle_tag(&once, "b", start2, end2, false).unwrap();
            assert_eq!(twice, text, "double toggle must restore {text:?}");
        }
    }

    #[test]
    fn test_toggle_preserves_visible_text() {
        let text = "x<b>yz</b>w";
        let out = toggle_tag(text, "i", 0, text.len(), false).unwrap();
        assert_eq!(visible_len(&out), visible_len(text));
        assert_eq!(untag(&out), untag(text));
        assert_balanced(&out);
    }
}
