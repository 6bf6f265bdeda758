//! The editable text surface as seen by listeners such as the pairing engine.

use std::cell::RefCell;
use std::rc::Rc;

use super::event::{EditEvent, EditPhase, OriginTag, Rewrite};
use super::position::Position;

/// A listener on a surface's edit feed.
///
/// For [`EditPhase::Pre`] events the returned [`Rewrite`] replaces the pending
/// edit. For [`EditPhase::Post`] events the return value is ignored, but the
/// handler may issue follow-up edits through `surface`.
pub trait EditHandler {
    fn on_edit(&mut self, event: &EditEvent, surface: &mut dyn EditableSurface)
        -> Option<Rewrite>;

    /// The user moved the cursor or changed the selection without editing.
    /// Only post-commit subscribers are told.
    fn on_cursor_moved(&mut self, _cursor: Position) {}
}

/// Shared handle to a listener. The same handle is kept by whoever subscribed
/// it, so teardown refers to exactly the object that was registered.
pub type SharedHandler = Rc<RefCell<dyn EditHandler>>;

/// Receipt for a subscription, handed back to [`EditableSurface::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: u64,
    pub phase: EditPhase,
}

/// Operations the pairing engine needs from the host's text surface.
pub trait EditableSurface {
    fn cursor(&self) -> Position;

    /// Move the cursor, collapsing any selection
    fn set_cursor(&mut self, pos: Position);

    /// Text between two positions (order-insensitive)
    fn range(&self, from: Position, to: Position) -> String;

    /// The character starting at `pos`, if there is one on that line
    fn char_at(&self, pos: Position) -> Option<char>;

    /// Replace `from..to` with `text`, tagged with `origin`.
    ///
    /// The cursor ends up after the inserted text.
    fn replace_range(&mut self, text: &str, from: Position, to: Position, origin: OriginTag);

    fn has_selection(&self) -> bool;

    /// Currently selected text (empty when nothing is selected)
    fn selection(&self) -> String;

    fn subscribe(&mut self, phase: EditPhase, handler: SharedHandler) -> Subscription;

    /// Returns false if the subscription was not registered
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}
