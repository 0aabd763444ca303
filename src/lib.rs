//! `cardforge` - reversible-edit engine for card set editors.
//!
//! The crate implements the editing core a card-set editor hangs its UI on:
//!
//! - [`tagged`]: tag-aware rich-text algorithms over flat strings with
//!   inline `<tag>…</tag>` delimiters - coordinate mapping, tag toggling,
//!   balance-preserving replacement, redundant-tag collapse
//! - [`action`]: reversible edits applied by symmetric state swap, with a
//!   merge protocol that coalesces typing bursts and backspace runs into
//!   single undo steps
//! - [`age`]: process-wide monotonic version stamps for staleness checks
//! - [`worker`]: a background thread generating derived artifacts
//!   (previews) stamped with the [`Age`] they were requested at
//!
//! # Examples
//!
//! ```
//! use cardforge::{ActionHistory, Card, Field, FieldKind, action};
//!
//! let schema = vec![
//!     Field::new("name", FieldKind::Text),
//!     Field::new("rule text", FieldKind::Text),
//! ];
//! let card = Card::new(&schema);
//! let rules = card.value("rule text").unwrap().clone();
//!
//! let mut history = ActionHistory::new();
//! for (i, ch) in ["F", "l", "y"].iter().enumerate() {
//!     let mut insert = action::typing_action(
//!         &rules, i, i, i, i, ch, action::EditKind::Typing, "typing",
//!     )
//!     .expect("changes the text");
//!     insert.bind_card(card.clone());
//!     history.add_action(insert);
//! }
//!
//! assert_eq!(rules.tagged_text().unwrap(), "Fly");
//! // the whole typing burst merged into one undo step
//! assert_eq!(history.undo_depth(), 1);
//! assert!(history.undo());
//! assert_eq!(rules.tagged_text().unwrap(), "");
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow TagSet in tagged:: etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::should_implement_trait)] // from_raw naming is intentional
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod action;
pub mod age;
pub mod color;
pub mod error;
pub mod field;
pub mod notify;
pub mod tagged;
pub mod value;
pub mod worker;

// Re-export core types at crate root
pub use action::{Action, ActionHistory, ActionKind, EditKind, ListenerId, TextEdit};
pub use age::{Age, AgeSource};
pub use color::Rgba;
pub use error::{Error, Result};
pub use field::{Card, CardRef, Field, FieldKind, FieldRef};
pub use notify::{LogLevel, ObserverId, emit_event, emit_log, set_event_callback, set_log_callback};
pub use tagged::TagSet;
pub use value::{AssetFile, Content, MultiChoice, Value, ValueRef};
pub use worker::{Completed, PreviewWorker};
