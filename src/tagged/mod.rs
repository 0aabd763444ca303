//! Tag-aware string algorithms.
//!
//! Card text is stored as a flat string interleaved with paired markup
//! delimiters of the form `<tag>…</tag>` — formatting (`<b>`, `<i>`,
//! `<sym>`) and semantic spans (`<kw-0>` keywords with a reminder-text
//! flag). This module provides the algorithms every edit goes through:
//! delimiter scanning, coordinate mapping, redundant-tag collapse, and
//! balance-preserving mutation.
//!
//! # Coordinate systems
//!
//! Two coordinate systems coexist and every mutation converts between them:
//!
//! - **tagged position**: byte offset into the delimiter-inclusive string
//!   (always on a `char` boundary)
//! - **visible position**: `char` index into the user-facing text with
//!   delimiters stripped
//!
//! # Invariant
//!
//! Every algorithm here leaves delimiters balanced and non-overlapping.
//! The only deliberate zero-width construct is an empty pair like
//! `<b></b>` inserted by a zero-width toggle, itself balanced.
//!
//! # Examples
//!
//! ```
//! use cardforge::tagged;
//!
//! let text = "<b>Flying</b>";
//! assert_eq!(tagged::untag(text), "Flying");
//! assert_eq!(tagged::visible_len(text), 6);
//! assert!(tagged::is_in_tag(text, "<b", 4, 5));
//! ```

pub mod edit;
pub mod position;
pub mod scan;
pub mod simplify;

pub use edit::{replace_range, toggle_tag};
pub use position::{
    Anchor, display_width, escape, grapheme_count, tagged_to_visible, untag, visible_len,
    visible_to_tagged,
};
pub use scan::{TagSet, active_tags, in_tag, is_in_tag, match_close_tag, skip_tag, tag_name};
pub use simplify::simplify_tagged;
