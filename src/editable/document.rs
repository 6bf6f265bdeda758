//! Document - the reference [`EditableSurface`]: a rope buffer with a cursor,
//! a selection, grouped undo history and an edit listener registry.
//!
//! Every change goes through one commit path:
//!
//! ```text
//! pending edit → Pre listeners (may rewrite) → buffer → history → Post listeners
//! ```
//!
//! Listeners may call back into the document from `on_edit`. Such re-entrant
//! edits are applied immediately, skip the pre-commit pass, join the history
//! group of the edit being dispatched, and have their post-commit events queued
//! behind the current one. The queue is drained before the outermost call
//! returns, so the host never observes a half-processed edit.

use std::collections::VecDeque;
use std::fmt;

use super::buffer::{RopeBuffer, TextBuffer, TextBufferMut};
use super::event::{EditEvent, EditPhase, OriginTag, Rewrite, SelectedRange};
use super::history::{EditHistory, EditOperation};
use super::position::Position;
use super::selection::Selection;
use super::surface::{EditableSurface, SharedHandler, Subscription};

struct Listener {
    subscription: Subscription,
    handler: SharedHandler,
}

pub struct Document {
    buffer: RopeBuffer,
    cursor: Position,
    selection: Selection,
    history: EditHistory,
    listeners: Vec<Listener>,
    next_subscription: u64,
    queued: VecDeque<EditEvent>,
    /// Set while listeners run; edits issued meanwhile are re-entrant
    dispatching: bool,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.buffer.content())
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document holding `text`, cursor at the start
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: RopeBuffer::from_text(text),
            cursor: Position::zero(),
            selection: Selection::collapsed(Position::zero()),
            history: EditHistory::new(),
            listeners: Vec::new(),
            next_subscription: 0,
            queued: VecDeque::new(),
            dispatching: false,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn buffer(&self) -> &RopeBuffer {
        &self.buffer
    }

    pub fn selection_range(&self) -> Selection {
        self.selection
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn offset_of(&self, pos: Position) -> usize {
        self.buffer.position_to_offset(pos.line, pos.column)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let (line, column) = self.buffer.offset_to_position(offset);
        Position::new(line, column)
    }

    /// Cursor as a character offset from the start of the document
    pub fn cursor_offset(&self) -> usize {
        self.offset_of(self.cursor)
    }

    fn clamp(&self, pos: Position) -> Position {
        self.position_at(self.offset_of(pos))
    }

    /// Select from `anchor` to `head`; the cursor follows the head
    pub fn select(&mut self, anchor: Position, head: Position) {
        let anchor = self.clamp(anchor);
        let head = self.clamp(head);
        self.selection = Selection::new(anchor, head);
        self.cursor = head;
        self.notify_cursor_moved();
    }

    /// Select by character offsets
    pub fn select_offsets(&mut self, anchor: usize, head: usize) {
        self.select(self.position_at(anchor), self.position_at(head));
    }

    fn selected_range(&self) -> Option<SelectedRange> {
        if self.selection.is_empty() {
            return None;
        }
        let (start, end) = self.selection.span();
        Some(SelectedRange {
            start,
            end,
            text: self.range(start, end),
        })
    }

    // =========================================================================
    // User operations
    // =========================================================================

    /// Type `text` at the cursor, replacing the selection if there is one
    pub fn type_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let (from, to) = self.selection.span();
        self.commit(text, from, to, OriginTag::UserEdit);
    }

    /// Delete the selection, or the character before the cursor (Backspace)
    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            let (from, to) = self.selection.span();
            self.commit("", from, to, OriginTag::UserDelete);
            return true;
        }

        let offset = self.cursor_offset();
        if offset == 0 {
            return false;
        }
        let from = self.position_at(offset - 1);
        self.commit("", from, self.cursor, OriginTag::UserDelete);
        true
    }

    /// Delete the selection, or the character after the cursor (Delete)
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            let (from, to) = self.selection.span();
            self.commit("", from, to, OriginTag::UserDelete);
            return true;
        }

        let offset = self.cursor_offset();
        if offset >= self.buffer.len_chars() {
            return false;
        }
        let to = self.position_at(offset + 1);
        self.commit("", self.cursor, to, OriginTag::UserDelete);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the most recent edit group
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.history.pop_undo() else {
            return false;
        };
        for op in group.iter().rev() {
            self.replay(&op.inverse());
        }
        if let Some(first) = group.first() {
            self.set_cursor(first.cursor_before);
        }
        true
    }

    /// Redo the most recently undone edit group
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.history.pop_redo() else {
            return false;
        };
        for op in &group {
            self.replay(op);
        }
        if let Some(last) = group.last() {
            self.set_cursor(last.cursor_after);
        }
        true
    }

    fn replay(&mut self, op: &EditOperation) {
        let from = self.position_at(op.offset);
        let to = self.position_at(op.offset + op.deleted_text.chars().count());
        self.commit(&op.inserted_text, from, to, OriginTag::History);
    }

    // =========================================================================
    // Commit path
    // =========================================================================

    fn handlers_for(&self, phase: EditPhase) -> Vec<SharedHandler> {
        self.listeners
            .iter()
            .filter(|l| l.subscription.phase == phase)
            .map(|l| l.handler.clone())
            .collect()
    }

    fn commit(&mut self, text: &str, from: Position, to: Position, origin: OriginTag) {
        let (from, to) = (self.clamp(from.min(to)), self.clamp(from.max(to)));
        if text.is_empty() && from == to {
            return;
        }

        let selection_before = self.selected_range();
        let mut pending = Rewrite {
            text: text.to_string(),
            from,
            to,
            origin,
        };

        let nested = self.dispatching;
        if !nested {
            pending = self.run_pre_commit(pending, &selection_before);
        }

        let event = self.apply(pending, selection_before);
        self.queued.push_back(event);

        if !nested {
            self.drain_post_commit();
        }
    }

    fn run_pre_commit(
        &mut self,
        mut pending: Rewrite,
        selection_before: &Option<SelectedRange>,
    ) -> Rewrite {
        let handlers = self.handlers_for(EditPhase::Pre);
        if handlers.is_empty() {
            return pending;
        }

        self.dispatching = true;
        for handler in handlers {
            let event = EditEvent {
                phase: EditPhase::Pre,
                inserted: pending.text.clone(),
                removed: self.range(pending.from, pending.to),
                range_start: pending.from,
                range_end: pending.to,
                origin: pending.origin,
                selection_before: selection_before.clone(),
            };
            if let Some(rewrite) = handler.borrow_mut().on_edit(&event, self) {
                tracing::trace!(
                    "Pending edit {:?} rewritten to {:?} ({:?})",
                    pending.text,
                    rewrite.text,
                    rewrite.origin
                );
                let from = self.clamp(rewrite.from.min(rewrite.to));
                let to = self.clamp(rewrite.from.max(rewrite.to));
                pending = Rewrite {
                    from,
                    to,
                    ..rewrite
                };
            }
        }
        self.dispatching = false;

        pending
    }

    fn apply(&mut self, edit: Rewrite, selection_before: Option<SelectedRange>) -> EditEvent {
        let start = self.offset_of(edit.from);
        let end = self.offset_of(edit.to).max(start);
        let removed = self.buffer.slice(start..end);
        let cursor_before = self.cursor;

        self.buffer.replace(start..end, &edit.text);
        self.cursor = self.position_at(start + edit.text.chars().count());
        self.selection = Selection::collapsed(self.cursor);

        if edit.origin != OriginTag::History {
            let op = EditOperation::replace(
                start,
                removed.clone(),
                edit.text.clone(),
                cursor_before,
                self.cursor,
            );
            if self.dispatching {
                self.history.append(op);
            } else {
                self.history.push(op);
            }
        }

        EditEvent {
            phase: EditPhase::Post,
            inserted: edit.text,
            removed,
            range_start: edit.from,
            range_end: edit.to,
            origin: edit.origin,
            selection_before,
        }
    }

    fn notify_cursor_moved(&self) {
        for handler in self.handlers_for(EditPhase::Post) {
            handler.borrow_mut().on_cursor_moved(self.cursor);
        }
    }

    fn drain_post_commit(&mut self) {
        self.dispatching = true;
        while let Some(event) = self.queued.pop_front() {
            for handler in self.handlers_for(EditPhase::Post) {
                handler.borrow_mut().on_edit(&event, self);
            }
        }
        self.dispatching = false;
    }
}

impl EditableSurface for Document {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
        self.selection = Selection::collapsed(self.cursor);
        if self.dispatching {
            self.history.amend_cursor_after(self.cursor);
        } else {
            self.notify_cursor_moved();
        }
    }

    fn range(&self, from: Position, to: Position) -> String {
        let start = self.offset_of(from.min(to));
        let end = self.offset_of(from.max(to));
        self.buffer.slice(start..end)
    }

    fn char_at(&self, pos: Position) -> Option<char> {
        self.buffer.char_at(pos.line, pos.column)
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position, origin: OriginTag) {
        self.commit(text, from, to, origin);
    }

    fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    fn selection(&self) -> String {
        let (start, end) = self.selection.span();
        self.range(start, end)
    }

    fn subscribe(&mut self, phase: EditPhase, handler: SharedHandler) -> Subscription {
        let subscription = Subscription {
            id: self.next_subscription,
            phase,
        };
        self.next_subscription += 1;
        self.listeners.push(Listener {
            subscription,
            handler,
        });
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.subscription != subscription);
        self.listeners.len() != before
    }
}
