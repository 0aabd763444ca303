//! Reversible edit actions over card field values.
//!
//! An [`Action`] is a mutation intent that can be applied and un-applied by
//! swapping its stored payload with the target value's live payload — the
//! swap is symmetric, so applying twice returns to the original state. The
//! history offers each new action to the most recent entry for merging, so
//! a burst of typing or repeated backspaces collapses into one undo step.
//!
//! # Examples
//!
//! ```
//! use cardforge::{ActionHistory, Card, Field, FieldKind, Rgba, action};
//!
//! let schema = vec![Field::new("frame", FieldKind::Color)];
//! let card = Card::new(&schema);
//! let frame = card.value("frame").unwrap().clone();
//!
//! let mut history = ActionHistory::new();
//! history.add_action(action::set_color(&frame, Rgba::RED));
//! history.add_action(action::set_color(&frame, Rgba::BLUE));
//!
//! // the two color picks merged into a single undo step
//! assert_eq!(history.undo_depth(), 1);
//! assert!(history.undo());
//! ```

mod history;
mod text;

pub use history::{ActionHistory, ListenerId};
pub use text::{
    EditKind, ReminderToggle, TextEdit, toggle_format_action, toggle_reminder_action,
    typing_action,
};

use std::mem;
use std::rc::Rc;

use crate::age::Age;
use crate::field::{CardRef, FieldKind};
use crate::value::{AssetFile, Content, MultiChoice, ValueRef};
use crate::color::Rgba;

/// Variant payloads of an action, one per edit kind.
#[derive(Debug)]
pub enum ActionKind {
    /// Swap the whole content payload (choice, color, image, symbol,
    /// package, multiple choice).
    Scalar {
        /// The payload to swap in; after an apply it holds the payload that
        /// was swapped out.
        new: Content,
        /// Whether a later edit of the same kind on the same value may be
        /// absorbed into this one.
        mergeable: bool,
    },
    /// A text edit with selection bookkeeping (typing, backspace, tag
    /// toggling).
    Text(TextEdit),
    /// Flip the reminder-text flag of a keyword tag.
    ReminderToggle(ReminderToggle),
}

/// A reversible edit targeting a single value.
///
/// The action shares ownership of its target value but never of the record:
/// binding a card is optional and done post-construction with
/// [`bind_card`](Self::bind_card); once bound, the card's `last_modified`
/// stamp is swapped consistently with every apply/undo.
#[derive(Debug)]
pub struct Action {
    value: ValueRef,
    card: Option<CardRef>,
    /// Stamp swapped with the bound card's `last_modified` on each apply.
    /// Starts as the construction time, so applying marks the card as
    /// modified "now" and undoing restores its previous stamp.
    stamp: Age,
    name: String,
    kind: ActionKind,
}

impl Action {
    pub(crate) fn new(value: ValueRef, name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            value,
            card: None,
            stamp: Age::now(),
            name: name.into(),
            kind,
        }
    }

    /// The display name used for undo menus and merge grouping.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value this action targets.
    #[must_use]
    pub fn value(&self) -> &ValueRef {
        &self.value
    }

    /// The variant payload.
    #[must_use]
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Bind the record whose `last_modified` stamp should track this edit.
    pub fn bind_card(&mut self, card: CardRef) {
        self.card = Some(card);
    }

    /// Apply (`undo == false`) or un-apply (`undo == true`) this action.
    ///
    /// Symmetric: the stored payload and the live payload swap, so a second
    /// call with the opposite flag restores the exact prior state. The
    /// value's observers are notified afterwards with the direction flag.
    pub fn apply(&mut self, undo: bool) {
        if let Some(card) = &self.card {
            card.swap_modified(&mut self.stamp);
        }

        match &mut self.kind {
            ActionKind::Scalar { new, .. } => {
                let refresh = new.affects_rendering();
                mem::swap(&mut *self.value.content_mut(), new);
                if refresh {
                    self.value.touch();
                }
            }
            ActionKind::Text(edit) => edit.apply(&self.value),
            ActionKind::ReminderToggle(toggle) => toggle.apply(&self.value),
        }

        let value = Rc::clone(&self.value);
        value.notify(self, undo);
    }

    /// Offer a newer action for merging into this one.
    ///
    /// Accepts only when both actions target the same value and carry the
    /// same kind of payload; text edits additionally require positional
    /// adjacency (see [`TextEdit`]). On acceptance the newer action is
    /// discarded by the caller — this action's stored payload already holds
    /// the true undo target, so one undo reverts the whole burst.
    #[must_use]
    pub fn merge(&mut self, newer: &Action) -> bool {
        if !Rc::ptr_eq(&self.value, &newer.value) {
            return false;
        }
        match (&mut self.kind, &newer.kind) {
            (ActionKind::Scalar { mergeable, .. }, ActionKind::Scalar { .. }) => *mergeable,
            (ActionKind::Text(edit), ActionKind::Text(newer_edit)) => edit.merge(newer_edit),
            _ => false,
        }
    }
}

fn change_name(value: &ValueRef) -> String {
    format!("change {}", value.field().name)
}

fn scalar(value: &ValueRef, expect: FieldKind, new: Content, mergeable: bool) -> Action {
    debug_assert_eq!(value.field().kind, expect);
    debug_assert_eq!(new.kind(), expect);
    let name = change_name(value);
    Action::new(value.clone(), name, ActionKind::Scalar { new, mergeable })
}

/// Set a choice field. Successive picks on the same value merge, keeping
/// only the final choice as one undo step.
#[must_use]
pub fn set_choice(value: &ValueRef, new: impl Into<String>) -> Action {
    scalar(value, FieldKind::Choice, Content::Choice(new.into()), true)
}

/// Set a color field. Successive picks merge (color pickers drag).
#[must_use]
pub fn set_color(value: &ValueRef, new: Rgba) -> Action {
    scalar(value, FieldKind::Color, Content::Color(new), true)
}

/// Set an image field. Never merges: every chosen file stays individually
/// undoable.
#[must_use]
pub fn set_image(value: &ValueRef, file: AssetFile) -> Action {
    scalar(value, FieldKind::Image, Content::Image(file), false)
}

/// Set a symbol field. Never merges.
#[must_use]
pub fn set_symbol(value: &ValueRef, file: AssetFile) -> Action {
    scalar(value, FieldKind::Symbol, Content::Symbol(file), false)
}

/// Set a package-reference field. Never merges.
#[must_use]
pub fn set_package(value: &ValueRef, package: impl Into<String>) -> Action {
    scalar(value, FieldKind::Package, Content::Package(package.into()), false)
}

/// Set a multiple-choice field, recording which choice changed. Never
/// merges: each individual pick stays undoable.
#[must_use]
pub fn set_multi_choice(
    value: &ValueRef,
    new: impl Into<String>,
    last_change: impl Into<String>,
) -> Action {
    scalar(
        value,
        FieldKind::MultiChoice,
        Content::MultiChoice(MultiChoice {
            value: new.into(),
            last_change: last_change.into(),
        }),
        false,
    )
}
