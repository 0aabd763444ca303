//! Field schemas and card records.
//!
//! A [`Field`] describes one slot of the card template (name + content
//! kind); a [`Card`] instantiates one [`Value`](crate::value::Value) per
//! field and carries a record-level `last_modified` stamp that actions swap
//! consistently with each apply/undo.

use std::cell::Cell;
use std::rc::Rc;

use crate::age::Age;
use crate::value::{Value, ValueRef};

/// Shared handle to a [`Field`].
pub type FieldRef = Rc<Field>;

/// Shared handle to a [`Card`].
pub type CardRef = Rc<Card>;

/// The content kind of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Rich text with inline tags.
    Text,
    /// One choice out of an enumeration.
    Choice,
    /// A set of choices with a last-changed marker.
    MultiChoice,
    /// A color.
    Color,
    /// An image asset file.
    Image,
    /// A symbol asset file.
    Symbol,
    /// A reference to an external package.
    Package,
}

/// Schema for one field of a card template.
#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    /// Create a shared field schema.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> FieldRef {
        Rc::new(Self {
            name: name.into(),
            kind,
        })
    }
}

/// One record: a value per schema field plus a modification stamp.
#[derive(Debug)]
pub struct Card {
    values: Vec<ValueRef>,
    last_modified: Cell<Age>,
}

impl Card {
    /// Instantiate a card from a field schema, one fresh value per field.
    #[must_use]
    pub fn new(schema: &[FieldRef]) -> CardRef {
        Rc::new(Self {
            values: schema.iter().map(|field| Value::new(field.clone())).collect(),
            last_modified: Cell::new(Age::now()),
        })
    }

    /// All values, in schema order.
    #[must_use]
    pub fn values(&self) -> &[ValueRef] {
        &self.values
    }

    /// Look up a value by field name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&ValueRef> {
        self.values.iter().find(|value| value.field().name == name)
    }

    /// When this card was last modified by an action.
    #[must_use]
    pub fn last_modified(&self) -> Age {
        self.last_modified.get()
    }

    /// Swap the modification stamp with `stamp`. Actions call this on every
    /// apply/undo so the record timestamp toggles consistently with the
    /// data.
    pub(crate) fn swap_modified(&self, stamp: &mut Age) {
        let current = self.last_modified.get();
        self.last_modified.set(*stamp);
        *stamp = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_instantiates_schema() {
        let schema = vec![
            Field::new("name", FieldKind::Text),
            Field::new("frame", FieldKind::Color),
            Field::new("art", FieldKind::Image),
        ];
        let card = Card::new(&schema);
        assert_eq!(card.values().len(), 3);
        assert!(card.value("frame").is_some());
        assert!(card.value("missing").is_none());
    }

    #[test]
    fn test_swap_modified_round_trips() {
        let card = Card::new(&[Field::new("name", FieldKind::Text)]);
        let original = card.last_modified();
        let mut stamp = Age::now();
        let swapped_in = stamp;

        card.swap_modified(&mut stamp);
        assert_eq!(card.last_modified(), swapped_in);
        assert_eq!(stamp, original);

        card.swap_modified(&mut stamp);
        assert_eq!(card.last_modified(), original);
        assert_eq!(stamp, swapped_in);
    }
}
