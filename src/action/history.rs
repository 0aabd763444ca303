//! Undo/redo stacks with merge coalescing.

use crate::action::Action;
use crate::notify::{LogLevel, emit_event, emit_log};

/// Default maximum number of undo entries to retain.
const DEFAULT_MAX_DEPTH: usize = 1000;

/// Handle identifying a registered history listener.
pub type ListenerId = u64;

type Listener = Box<dyn Fn(&Action, bool)>;

/// The undo/redo history of one document.
///
/// Entries are ordered; the boundary between the undo and redo stacks is
/// the cursor separating applied from undone actions. Adding an action
/// applies it, invalidates the redo stack, and offers it to the newest
/// applied entry for merging — a burst of coalescing edits keeps a single
/// entry.
///
/// All operations run on the document's owning thread; there is no internal
/// locking.
///
/// # Examples
///
/// ```
/// use cardforge::{ActionHistory, Field, FieldKind, Value, action};
///
/// let value = Value::new(Field::new("rules", FieldKind::Text));
/// let mut history = ActionHistory::new();
///
/// let insert = action::typing_action(
///     &value, 0, 0, 0, 0, "Flying", action::EditKind::Typing, "typing",
/// )
/// .expect("changes the text");
/// history.add_action(insert);
///
/// assert_eq!(value.tagged_text().unwrap(), "Flying");
/// assert!(history.undo());
/// assert_eq!(value.tagged_text().unwrap(), "");
/// ```
pub struct ActionHistory {
    undo: Vec<Action>,
    redo: Vec<Action>,
    max_depth: usize,
    /// Undo-stack depth at the last save, when still reachable.
    saved: Option<usize>,
    next_listener: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ActionHistory {
    /// Create an empty history with the default depth bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create an empty history retaining at most `max_depth` undo entries;
    /// the oldest entries are dropped beyond that.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
            saved: Some(0),
            next_listener: 0,
            listeners: Vec::new(),
        }
    }

    /// Apply an action and record it.
    ///
    /// The action is applied forward first, so the target value always
    /// carries the final content; merging then only decides whether a
    /// separate undo entry is kept. Any undone actions are discarded — a
    /// new edit invalidates the redo history.
    pub fn add_action(&mut self, mut action: Action) {
        action.apply(false);
        emit_event("action", action.name());
        self.redo.clear();

        // a save point above the current depth is now unreachable
        let at_save = self.saved == Some(self.undo.len());
        if self.saved.is_some_and(|depth| depth > self.undo.len()) {
            self.saved = None;
        }

        self.tell_listeners(&action, false);

        let merged = self
            .undo
            .last_mut()
            .is_some_and(|newest| newest.merge(&action));
        if merged {
            // the discarded action only held an intermediate state; the
            // merged entry's payload is the true undo target
            if at_save {
                self.saved = None;
            }
        } else {
            self.undo.push(action);
            if self.undo.len() > self.max_depth {
                let excess = self.undo.len() - self.max_depth;
                self.undo.drain(..excess);
                self.saved = self.saved.and_then(|depth| depth.checked_sub(excess));
            }
        }
    }

    /// Undo the newest applied action. Returns `false` (a no-op, not an
    /// error) when nothing is applied.
    pub fn undo(&mut self) -> bool {
        let Some(mut action) = self.undo.pop() else {
            emit_log(LogLevel::Debug, "undo: nothing to undo");
            return false;
        };
        action.apply(true);
        emit_event("undo", action.name());
        self.tell_listeners(&action, true);
        self.redo.push(action);
        true
    }

    /// Redo the newest undone action. Returns `false` when nothing is
    /// undone.
    pub fn redo(&mut self) -> bool {
        let Some(mut action) = self.redo.pop() else {
            emit_log(LogLevel::Debug, "redo: nothing to redo");
            return false;
        };
        action.apply(false);
        emit_event("redo", action.name());
        self.tell_listeners(&action, false);
        self.undo.push(action);
        true
    }

    /// Whether there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Display name of the action an [`undo`](Self::undo) would revert, for
    /// menu labels.
    #[must_use]
    pub fn undo_name(&self) -> Option<&str> {
        self.undo.last().map(Action::name)
    }

    /// Display name of the action a [`redo`](Self::redo) would re-apply.
    #[must_use]
    pub fn redo_name(&self) -> Option<&str> {
        self.redo.last().map(Action::name)
    }

    /// Number of applied entries (undo steps available).
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of undone entries (redo steps available).
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Record that the document was saved in its current state.
    pub fn mark_saved(&mut self) {
        self.saved = Some(self.undo.len());
    }

    /// Whether the document is in the state it was last saved in.
    #[must_use]
    pub fn at_save_point(&self) -> bool {
        self.saved == Some(self.undo.len())
    }

    /// Drop all history. The save-point marker is kept only if the current
    /// state is the saved one.
    pub fn clear(&mut self) {
        let at_save = self.at_save_point();
        self.undo.clear();
        self.redo.clear();
        self.saved = at_save.then_some(0);
    }

    /// Register a listener called after every add/undo/redo with the action
    /// and the direction flag. Listeners must not re-enter the history.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Action, bool) + 'static,
    {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn tell_listeners(&self, action: &Action, undone: bool) {
        for (_, listener) in &self.listeners {
            listener(action, undone);
        }
    }
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActionHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHistory")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}
