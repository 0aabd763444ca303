//! Fuzz target for the tagged-string algorithms.
//!
//! Feeds arbitrary strings (including unbalanced and truncated markup)
//! through scanning, simplification, and mutation. Nothing here may panic,
//! and simplification must never change the visible text.

#![no_main]

use cardforge::tagged::{
    Anchor, replace_range, simplify_tagged, tagged_to_visible, toggle_tag, untag, visible_len,
    visible_to_tagged,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let visible = untag(data);
    let len = visible_len(data);
    assert_eq!(visible.chars().count(), len);

    // simplification: no panic, visible text preserved, fixed point
    let simplified = simplify_tagged(data);
    assert_eq!(untag(&simplified), visible);
    assert_eq!(simplify_tagged(&simplified), simplified);

    // coordinate mapping stays in bounds and round-trips
    for vis in [0, len / 2, len] {
        for anchor in [Anchor::Inside, Anchor::Outside] {
            let tagged = visible_to_tagged(data, vis, anchor);
            assert!(tagged <= data.len());
            assert_eq!(tagged_to_visible(data, tagged), vis.min(len));
        }
    }

    // mutation at positions derived from the visible coordinate space
    let start = visible_to_tagged(data, len / 3, Anchor::Inside);
    let end = visible_to_tagged(data, (2 * len).div_ceil(3), Anchor::Inside);
    if start <= end {
        if let Some(replaced) = replace_range(data, start, end, "x<b>y</b>") {
            let _ = untag(&replaced);
        }
        if let Some(toggled) = toggle_tag(data, "b", start, end, start == end) {
            // a toggle never changes the visible text
            assert_eq!(untag(&toggled), visible);
        }
    }
});
