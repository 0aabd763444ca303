//! Fuzz target for the reminder-flag toggle.
//!
//! Arbitrary text with arbitrary positions: construction either fails with
//! a structural error or produces an action whose applies never panic and
//! never alter the visible text.

#![no_main]

use arbitrary::Arbitrary;
use cardforge::action::toggle_reminder_action;
use cardforge::tagged::untag;
use cardforge::{Content, Field, FieldKind, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    pos: usize,
}

fuzz_target!(|input: Input| {
    let Input { text, pos } = input;
    if !text.is_char_boundary(pos.min(text.len())) {
        return;
    }
    let pos = pos.min(text.len());

    let value = Value::with_content(
        Field::new("rule text", FieldKind::Text),
        Content::Text(text.clone()),
    );
    let visible = untag(&text);

    let Ok(mut action) = toggle_reminder_action(&value, pos) else {
        return;
    };

    // flags live inside delimiters, so the visible text never changes
    action.apply(false);
    assert_eq!(untag(&value.tagged_text().unwrap()), visible);
    action.apply(true);
    assert_eq!(untag(&value.tagged_text().unwrap()), visible);
});
