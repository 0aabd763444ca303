//! Field values: the mutable content actions swap.
//!
//! A [`Value`] is one field of one record. Actions and viewers share it
//! (`Rc`), so its content lives behind interior mutability; all payload
//! mutation happens on the document's owning thread. The `last_update`
//! [`Age`] is refreshed whenever a render-relevant payload changes, so
//! caches of derived artifacts can detect staleness by comparing stamps.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::action::Action;
use crate::age::Age;
use crate::color::Rgba;
use crate::field::{FieldKind, FieldRef};
use crate::notify::{ObserverId, ObserverRegistry};

/// Shared handle to a [`Value`].
pub type ValueRef = Rc<Value>;

/// Reference to an asset file inside the document's package (an image or a
/// symbol drawing).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AssetFile(pub String);

impl AssetFile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Payload of a multiple-choice field: the combined value plus which choice
/// changed last (styling uses it to highlight the most recent pick).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiChoice {
    pub value: String,
    pub last_change: String,
}

/// The content payload of a value, one variant per field kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Rich text with inline tag delimiters.
    Text(String),
    /// One choice out of an enumeration.
    Choice(String),
    /// A set of choices plus the last-changed marker.
    MultiChoice(MultiChoice),
    /// A color.
    Color(Rgba),
    /// An image asset file.
    Image(AssetFile),
    /// A symbol asset file.
    Symbol(AssetFile),
    /// A reference to an external package.
    Package(String),
}

impl Content {
    /// The default (empty) content for a field kind.
    #[must_use]
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Choice => Self::Choice(String::new()),
            FieldKind::MultiChoice => Self::MultiChoice(MultiChoice::default()),
            FieldKind::Color => Self::Color(Rgba::TRANSPARENT),
            FieldKind::Image => Self::Image(AssetFile::default()),
            FieldKind::Symbol => Self::Symbol(AssetFile::default()),
            FieldKind::Package => Self::Package(String::new()),
        }
    }

    /// The field kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Choice(_) => FieldKind::Choice,
            Self::MultiChoice(_) => FieldKind::MultiChoice,
            Self::Color(_) => FieldKind::Color,
            Self::Image(_) => FieldKind::Image,
            Self::Symbol(_) => FieldKind::Symbol,
            Self::Package(_) => FieldKind::Package,
        }
    }

    /// Whether a swap of this payload invalidates rendered output, and so
    /// must refresh the owning value's `last_update` stamp.
    #[must_use]
    pub(crate) fn affects_rendering(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Image(_) | Self::Symbol(_))
    }
}

/// The mutable content of one field of one record.
pub struct Value {
    field: FieldRef,
    content: RefCell<Content>,
    last_update: Cell<Age>,
    observers: ObserverRegistry,
}

impl Value {
    /// Create a value with the default content for its field's kind.
    #[must_use]
    pub fn new(field: FieldRef) -> ValueRef {
        let content = Content::default_for(field.kind);
        Self::with_content(field, content)
    }

    /// Create a value with explicit initial content.
    ///
    /// The content's kind must match the field's kind.
    #[must_use]
    pub fn with_content(field: FieldRef, content: Content) -> ValueRef {
        debug_assert_eq!(content.kind(), field.kind);
        Rc::new(Self {
            field,
            content: RefCell::new(content),
            last_update: Cell::new(Age::now()),
            observers: ObserverRegistry::new(),
        })
    }

    /// The field this value belongs to.
    #[must_use]
    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// Borrow the current content.
    ///
    /// # Panics
    ///
    /// Panics if called while an apply is mid-swap (observers are notified
    /// only after the borrow is released, so this cannot happen from an
    /// `on_action` callback).
    #[must_use]
    pub fn content(&self) -> Ref<'_, Content> {
        self.content.borrow()
    }

    pub(crate) fn content_mut(&self) -> RefMut<'_, Content> {
        self.content.borrow_mut()
    }

    /// The tagged text of a text value. `None` for other kinds.
    #[must_use]
    pub fn tagged_text(&self) -> Option<String> {
        match &*self.content.borrow() {
            Content::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// When this value last changed in a render-relevant way.
    #[must_use]
    pub fn last_update(&self) -> Age {
        self.last_update.get()
    }

    /// Record a render-relevant change now.
    pub(crate) fn touch(&self) {
        self.last_update.set(Age::now());
    }

    /// Register an `on_action` observer, called after every apply/undo that
    /// touches this value. Observers must not re-enter the history.
    pub fn on_action<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Action, bool) + 'static,
    {
        self.observers.add(observer)
    }

    /// Remove a previously registered observer.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub(crate) fn notify(&self, action: &Action, undone: bool) {
        self.observers.notify(action, undone);
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("field", &self.field.name)
            .field("content", &*self.content.borrow())
            .field("last_update", &self.last_update.get())
            .finish_non_exhaustive()
    }
}
