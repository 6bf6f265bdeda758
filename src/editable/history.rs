//! Edit history (undo/redo) for the reference surface.
//!
//! Operations are recorded in groups. A user edit opens a new group, and any
//! synthetic edit issued while that edit's listeners run is appended to it, so
//! a single undo takes back the user's keystroke together with the pairing
//! action it provoked.

use super::position::Position;

/// A single recorded edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Character offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
    pub cursor_before: Position,
    pub cursor_after: Position,
}

impl EditOperation {
    pub fn replace(
        offset: usize,
        deleted_text: String,
        inserted_text: String,
        cursor_before: Position,
        cursor_after: Position,
    ) -> Self {
        Self {
            offset,
            deleted_text,
            inserted_text,
            cursor_before,
            cursor_after,
        }
    }

    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
        }
    }
}

/// Operations that undo and redo together, in application order.
pub type EditGroup = Vec<EditOperation>;

/// Edit history with undo/redo stacks of operation groups.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditGroup>,
    redo_stack: Vec<EditGroup>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Start a new group with `op` (clears redo stack)
    pub fn push(&mut self, op: EditOperation) {
        self.redo_stack.clear();
        self.undo_stack.push(vec![op]);

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Append `op` to the most recent group, starting one if there is none
    pub fn append(&mut self, op: EditOperation) {
        match self.undo_stack.last_mut() {
            Some(group) => {
                self.redo_stack.clear();
                group.push(op);
            }
            None => self.push(op),
        }
    }

    /// Record where the cursor was left after the most recent operation.
    pub fn amend_cursor_after(&mut self, cursor: Position) {
        if let Some(op) = self.undo_stack.last_mut().and_then(|g| g.last_mut()) {
            op.cursor_after = cursor;
        }
    }

    /// Pop a group from the undo stack (moves it to the redo stack)
    pub fn pop_undo(&mut self) -> Option<EditGroup> {
        let group = self.undo_stack.pop()?;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    /// Pop a group from the redo stack (moves it back to the undo stack)
    pub fn pop_redo(&mut self) -> Option<EditGroup> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push(group.clone());
        Some(group)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(offset: usize, text: &str) -> EditOperation {
        EditOperation::replace(
            offset,
            String::new(),
            text.to_string(),
            Position::new(0, offset),
            Position::new(0, offset + text.chars().count()),
        )
    }

    #[test]
    fn test_edit_operation_inverse() {
        let op = EditOperation::replace(
            5,
            "old".to_string(),
            "new".to_string(),
            Position::new(0, 5),
            Position::new(0, 8),
        );
        let inv = op.inverse();
        assert_eq!(inv.deleted_text, "new");
        assert_eq!(inv.inserted_text, "old");
        assert_eq!(inv.cursor_before, op.cursor_after);
        assert_eq!(inv.cursor_after, op.cursor_before);
    }

    #[test]
    fn test_append_joins_last_group() {
        let mut history = EditHistory::new();
        history.push(insert(0, "【"));
        history.append(insert(1, "】"));

        let group = history.pop_undo().unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[1].inserted_text, "】");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_append_on_empty_history_starts_group() {
        let mut history = EditHistory::new();
        history.append(insert(0, "a"));
        assert_eq!(history.pop_undo().unwrap().len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_redo_moves_groups() {
        let mut history = EditHistory::new();
        history.push(insert(0, "a"));
        history.push(insert(1, "b"));

        let group = history.pop_undo().unwrap();
        assert_eq!(group[0].inserted_text, "b");
        assert!(history.can_redo());

        let group = history.pop_redo().unwrap();
        assert_eq!(group[0].inserted_text, "b");
        assert!(!history.can_redo());
        assert_eq!(history.pop_undo().unwrap()[0].inserted_text, "b");
        assert_eq!(history.pop_undo().unwrap()[0].inserted_text, "a");
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = EditHistory::new();
        history.push(insert(0, "a"));
        history.pop_undo();
        assert!(history.can_redo());

        history.push(insert(0, "b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_amend_cursor_after() {
        let mut history = EditHistory::new();
        history.push(insert(0, "【"));
        history.append(insert(1, "】"));
        history.amend_cursor_after(Position::new(0, 1));

        let group = history.pop_undo().unwrap();
        assert_eq!(group[1].cursor_after, Position::new(0, 1));
    }

    #[test]
    fn test_history_max_size() {
        let mut history = EditHistory::with_max_size(3);
        for i in 0..5 {
            history.push(insert(i, "x"));
        }
        let offsets: Vec<usize> = std::iter::from_fn(|| history.pop_undo())
            .map(|group| group[0].offset)
            .collect();
        assert_eq!(offsets, vec![4, 3, 2]);
    }
}
