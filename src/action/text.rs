//! Text edit actions: typing, deletion, tag toggling, reminder flags.

use crate::action::{Action, ActionKind};
use crate::error::{Error, Result};
use crate::tagged::edit::{replace_range, toggle_tag};
use crate::tagged::position::visible_len;
use crate::tagged::scan::{in_tag, match_close_tag, skip_tag};
use crate::value::{Content, Value, ValueRef};

/// What kind of edit a text action performs. Merge eligibility keys off
/// this tag: typing and forward deletion coalesce with a forward-adjacent
/// successor, backspaces also coalesce backwards, and everything else
/// (tag toggles, pastes, separator edits) stays individually undoable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// Characters typed over the selection.
    Typing,
    /// Forward deletion at the caret.
    Delete,
    /// Backward deletion at the caret.
    Backspace,
    /// Anything else; never merges.
    Other,
}

/// Payload of a text action.
///
/// Selection positions are visible positions. `new_text` and
/// `new_selection_end` hold the post-edit state before the first apply and
/// swap with the live state on every apply, so the same fields describe the
/// inverse edit after an undo.
#[derive(Clone, Debug)]
pub struct TextEdit {
    new_text: String,
    selection_start: usize,
    selection_end: usize,
    new_selection_end: usize,
    kind: EditKind,
}

impl TextEdit {
    /// The visible selection this edit covers, in the direction the user
    /// made it.
    #[must_use]
    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// The edit-kind tag driving merge policy.
    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub(crate) fn apply(&mut self, value: &Value) {
        {
            let mut content = value.content_mut();
            let Content::Text(live) = &mut *content else {
                debug_assert!(false, "text action on non-text value");
                return;
            };
            std::mem::swap(live, &mut self.new_text);
        }
        std::mem::swap(&mut self.selection_end, &mut self.new_selection_end);
        value.touch();
    }

    /// Merge a newer, already-applied edit into this one.
    ///
    /// Forward adjacency (the newer edit starts where this one ended)
    /// extends this edit; for backspaces, backward adjacency (the newer
    /// edit's caret landed where this one starts) absorbs it instead, so a
    /// run of backspaces undoes in one step.
    pub(crate) fn merge(&mut self, newer: &TextEdit) -> bool {
        if self.kind != newer.kind || self.kind == EditKind::Other {
            return false;
        }
        if newer.selection_start == self.selection_end {
            self.selection_end = newer.selection_end;
            return true;
        }
        if self.kind == EditKind::Backspace && newer.new_selection_end == self.selection_start {
            self.selection_start = newer.selection_start;
            self.selection_end = newer.selection_end;
            return true;
        }
        false
    }
}

/// Build a typing/deletion action replacing the selected span.
///
/// `(start_t, end_t)` are tagged positions, `(start_v, end_v)` the matching
/// visible positions; pass them in selection order — an inverted selection
/// is normalized for the edit and the stored selection keeps the original
/// direction. The caret lands at `min(start_v, end_v) +
/// visible_len(replacement)`.
///
/// Returns `None` when the edit would not change the text.
#[must_use]
pub fn typing_action(
    value: &ValueRef,
    start_t: usize,
    end_t: usize,
    start_v: usize,
    end_v: usize,
    replacement: &str,
    kind: EditKind,
    name: &str,
) -> Option<Action> {
    let Some(text) = value.tagged_text() else {
        debug_assert!(false, "typing action on non-text value");
        return None;
    };

    let (lo_t, hi_t, lo_v) = if start_v > end_v {
        (end_t, start_t, end_v)
    } else {
        (start_t, end_t, start_v)
    };
    let new_text = replace_range(&text, lo_t, hi_t, replacement)?;

    Some(Action::new(
        value.clone(),
        name,
        ActionKind::Text(TextEdit {
            new_text,
            selection_start: start_v,
            selection_end: end_v,
            new_selection_end: lo_v + visible_len(replacement),
            kind,
        }),
    ))
}

/// Build a tag-toggle action over the selected span.
///
/// Wraps the span in `tag` or removes one enclosing layer of it (see
/// [`toggle_tag`]). A zero-width selection inserts an empty pair that is
/// deliberately not simplified away, so the next typed characters land
/// inside it. Returns `None` when toggling would not change the text.
#[must_use]
pub fn toggle_format_action(
    value: &ValueRef,
    tag: &str,
    start_t: usize,
    end_t: usize,
    start_v: usize,
    end_v: usize,
    name: &str,
) -> Option<Action> {
    let Some(text) = value.tagged_text() else {
        debug_assert!(false, "toggle action on non-text value");
        return None;
    };

    let (start_t, end_t, start_v, end_v) = if start_v > end_v {
        (end_t, start_t, end_v, start_v)
    } else {
        (start_t, end_t, start_v, end_v)
    };
    let new_text = toggle_tag(&text, tag, start_t, end_t, start_v == end_v)?;

    Some(Action::new(
        value.clone(),
        name,
        ActionKind::Text(TextEdit {
            new_text,
            selection_start: start_v,
            selection_end: end_v,
            new_selection_end: end_v,
            kind: EditKind::Other,
        }),
    ))
}

/// Flip the enabled flag of the keyword tag around a position.
///
/// The flag character sits at a fixed offset inside the opening delimiter
/// (`<kw-X>`, offset 4) and is mirrored onto the matching closer
/// (`</kw-X>`, offset 5) when one exists. `'1'` and `'A'` both read as
/// enabled; toggling writes the canonical `'0'` or `'1'`.
#[derive(Debug)]
pub struct ReminderToggle {
    /// Tagged position of the keyword opening delimiter.
    pos: usize,
    /// Flag character to swap in on the next apply.
    flag: char,
}

impl ReminderToggle {
    pub(crate) fn apply(&mut self, value: &Value) {
        {
            let mut content = value.content_mut();
            let Content::Text(text) = &mut *content else {
                debug_assert!(false, "reminder toggle on non-text value");
                return;
            };
            let flag_pos = self.pos + 4;
            debug_assert!(flag_pos < text.len() && text.is_char_boundary(flag_pos));

            let current = text[flag_pos..].chars().next().expect("flag char");
            let incoming = self.flag;

            // mirror onto the closer first (it sits after the opener, so
            // rewriting the opener below cannot shift it), and only when
            // the closer is long enough to carry a flag at the same offset
            if let Some(close) = match_close_tag(text, self.pos) {
                let mirror = close + 5;
                let close_end = skip_tag(text, close);
                if text.is_char_boundary(mirror) {
                    if let Some(mirrored) = text[mirror..].chars().next() {
                        if mirror + mirrored.len_utf8() < close_end {
                            text.replace_range(
                                mirror..mirror + mirrored.len_utf8(),
                                incoming.encode_utf8(&mut [0; 4]),
                            );
                        }
                    }
                }
            }

            text.replace_range(
                flag_pos..flag_pos + current.len_utf8(),
                incoming.encode_utf8(&mut [0; 4]),
            );
            self.flag = current;
        }
        value.touch();
    }
}

/// Build a reminder-flag toggle for the keyword tag enclosing `pos`
/// (a tagged position).
///
/// # Errors
///
/// [`Error::NotInKeywordTag`] when no keyword tag encloses `pos`;
/// [`Error::UnbalancedTag`] when the enclosing delimiter is too short to
/// carry a flag.
pub fn toggle_reminder_action(value: &ValueRef, pos: usize) -> Result<Action> {
    let text = value
        .tagged_text()
        .ok_or(Error::NotInKeywordTag { pos })?;

    let open = in_tag(&text, "<kw", pos, pos).ok_or(Error::NotInKeywordTag { pos })?;
    let flag_pos = open + 4;
    if flag_pos + 1 >= skip_tag(&text, open) || !text.is_char_boundary(flag_pos) {
        return Err(Error::UnbalancedTag { pos: open });
    }

    let current = text[flag_pos..].chars().next().expect("flag char");
    let enable = !(current == '1' || current == 'A');
    let name = if enable {
        "show reminder text"
    } else {
        "hide reminder text"
    };
    Ok(Action::new(
        value.clone(),
        name,
        ActionKind::ReminderToggle(ReminderToggle {
            pos: open,
            flag: if enable { '1' } else { '0' },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldKind};
    use crate::value::Value;

    fn text_value(text: &str) -> ValueRef {
        Value::with_content(
            Field::new("rule text", FieldKind::Text),
            Content::Text(text.to_owned()),
        )
    }

    fn live_text(value: &ValueRef) -> String {
        value.tagged_text().unwrap()
    }

    #[test]
    fn test_typing_inserts_and_undoes() {
        let value = text_value("abc");
        let mut action =
            typing_action(&value, 3, 3, 3, 3, "!", EditKind::Typing, "typing").unwrap();

        action.apply(false);
        assert_eq!(live_text(&value), "abc!");

        action.apply(true);
        assert_eq!(live_text(&value), "abc");
    }

    #[test]
    fn test_typing_no_change_is_none() {
        let value = text_value("abc");
        assert!(typing_action(&value, 1, 2, 1, 2, "b", EditKind::Typing, "typing").is_none());
    }

    #[test]
    fn test_typing_inverted_selection_normalizes() {
        let value = text_value("abcd");
        let action =
            typing_action(&value, 3, 1, 3, 1, "X", EditKind::Typing, "typing").unwrap();
        let ActionKind::Text(edit) = action.kind() else {
            panic!("expected text payload");
        };
        // stored selection keeps the user's direction
        assert_eq!(edit.selection(), (3, 1));
        assert_eq!(edit.new_selection_end, 2);
    }

    #[test]
    fn test_toggle_format_round_trip() {
        let value = text_value("abc");
        let mut action = toggle_format_action(&value, "b", 0, 3, 0, 3, "bold").unwrap();

        action.apply(false);
        assert_eq!(live_text(&value), "<b>abc</b>");

        action.apply(true);
        assert_eq!(live_text(&value), "abc");
    }

    #[test]
    fn test_toggle_format_zero_width() {
        let value = text_value("ab");
        let mut action = toggle_format_action(&value, "b", 1, 1, 1, 1, "bold").unwrap();
        action.apply(false);
        assert_eq!(live_text(&value), "a<b></b>b");
    }

    #[test]
    fn test_reminder_toggle_mirrors_both_delimiters() {
        let value = text_value("<kw-0>x</kw-0>");
        let mut action = toggle_reminder_action(&value, 7).unwrap();
        assert_eq!(action.name(), "show reminder text");

        action.apply(false);
        assert_eq!(live_text(&value), "<kw-1>x</kw-1>");

        action.apply(true);
        assert_eq!(live_text(&value), "<kw-0>x</kw-0>");
    }

    #[test]
    fn test_reminder_toggle_treats_a_as_enabled() {
        let value = text_value("<kw-A>x</kw-A>");
        let mut action = toggle_reminder_action(&value, 7).unwrap();
        assert_eq!(action.name(), "hide reminder text");

        action.apply(false);
        assert_eq!(live_text(&value), "<kw-0>x</kw-0>");
    }

    #[test]
    fn test_reminder_toggle_without_closer() {
        // malformed but tolerated: only the opener's flag flips
        let value = text_value("<kw-0>x");
        let mut action = toggle_reminder_action(&value, 7).unwrap();
        action.apply(false);
        assert_eq!(live_text(&value), "<kw-1>x");
    }

    #[test]
    fn test_reminder_toggle_outside_keyword_fails() {
        let value = text_value("plain <b>text</b>");
        let err = toggle_reminder_action(&value, 2).unwrap_err();
        assert_eq!(err, Error::NotInKeywordTag { pos: 2 });
    }

    #[test]
    fn test_backspace_run_merges() {
        let value = text_value("abc");
        let mut first =
            typing_action(&value, 2, 3, 2, 3, "", EditKind::Backspace, "backspace").unwrap();
        first.apply(false);
        assert_eq!(live_text(&value), "ab");

        let mut second =
            typing_action(&value, 1, 2, 1, 2, "", EditKind::Backspace, "backspace").unwrap();
        second.apply(false);
        assert_eq!(live_text(&value), "a");

        assert!(first.merge(&second));
        first.apply(true);
        assert_eq!(live_text(&value), "abc");
    }

    #[test]
    fn test_typing_does_not_merge_with_backspace() {
        let value = text_value("ab");
        let mut typing =
            typing_action(&value, 2, 2, 2, 2, "c", EditKind::Typing, "typing").unwrap();
        typing.apply(false);

        let backspace =
            typing_action(&value, 2, 3, 2, 3, "", EditKind::Backspace, "backspace").unwrap();
        assert!(!typing.merge(&backspace));
    }
}
