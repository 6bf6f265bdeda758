//! Anchor/head selection on the reference surface.

use super::position::Position;

/// The span between where a selection was started and where the cursor is now.
///
/// Collapsed (anchor == head) means "no selection, just a caret".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// `(start, end)` in document order, whichever way the selection was made
    pub fn span(&self) -> (Position, Position) {
        (self.start(), self.end())
    }
}
