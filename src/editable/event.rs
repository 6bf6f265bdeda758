//! Edit events delivered by a surface to its listeners.

use super::position::Position;

/// When a listener is notified relative to the edit being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditPhase {
    /// Before commit; the listener may rewrite the pending edit
    Pre,
    /// After commit; the listener may issue follow-up edits
    Post,
}

/// Provenance of an edit.
///
/// The surface tags what the user does; the pairing engine tags everything it
/// issues itself, and reacts only to user-originated edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginTag {
    /// Text typed, pasted or committed by an input method
    UserEdit,
    /// Backspace / Delete / cut
    UserDelete,
    /// Closer inserted after a typed opener
    SyntheticAutoClose,
    /// Selection replaced by `opener + selection + closer`
    SyntheticSelectionWrap,
    /// Closer removed together with its deleted opener
    SyntheticDeleteCollapse,
    /// Bare closing quote promoted to a full quote pair
    SyntheticQuotePair,
    /// Reversal of a spurious input-method edit
    SyntheticRevert,
    /// Undo/redo replay by the surface itself
    History,
}

impl OriginTag {
    pub fn is_user(self) -> bool {
        matches!(self, OriginTag::UserEdit | OriginTag::UserDelete)
    }

    /// True for every tag the pairing engine issues
    pub fn is_synthetic(self) -> bool {
        matches!(
            self,
            OriginTag::SyntheticAutoClose
                | OriginTag::SyntheticSelectionWrap
                | OriginTag::SyntheticDeleteCollapse
                | OriginTag::SyntheticQuotePair
                | OriginTag::SyntheticRevert
        )
    }
}

/// The selection that existed immediately before an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRange {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl SelectedRange {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One change, as seen by listeners.
///
/// `range_start..range_end` is the replaced range in the coordinates of the
/// document before the edit; `range_start <= range_end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub phase: EditPhase,
    pub inserted: String,
    pub removed: String,
    pub range_start: Position,
    pub range_end: Position,
    pub origin: OriginTag,
    pub selection_before: Option<SelectedRange>,
}

impl EditEvent {
    /// The inserted character when exactly one was inserted
    pub fn single_inserted(&self) -> Option<char> {
        let mut chars = self.inserted.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    /// A pure removal: something removed, nothing inserted
    pub fn is_deletion(&self) -> bool {
        self.inserted.is_empty() && !self.removed.is_empty()
    }

    /// End of the inserted text in post-edit coordinates
    pub fn inserted_end(&self) -> Position {
        self.range_start.advanced_by(&self.inserted)
    }
}

/// Replacement for a pending edit, returned by a pre-commit listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub from: Position,
    pub to: Position,
    pub origin: OriginTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(inserted: &str, removed: &str) -> EditEvent {
        EditEvent {
            phase: EditPhase::Post,
            inserted: inserted.to_string(),
            removed: removed.to_string(),
            range_start: Position::new(0, 2),
            range_end: Position::new(0, 2 + removed.chars().count()),
            origin: OriginTag::UserEdit,
            selection_before: None,
        }
    }

    #[test]
    fn test_single_inserted() {
        assert_eq!(event("【", "").single_inserted(), Some('【'));
        assert_eq!(event("【】", "").single_inserted(), None);
        assert_eq!(event("", "a").single_inserted(), None);
    }

    #[test]
    fn test_is_deletion() {
        assert!(event("", "《").is_deletion());
        assert!(!event("x", "《").is_deletion());
        assert!(!event("", "").is_deletion());
    }

    #[test]
    fn test_inserted_end() {
        assert_eq!(event("《hello》", "hello").inserted_end(), Position::new(0, 9));
    }

    #[test]
    fn test_origin_classification() {
        assert!(OriginTag::UserEdit.is_user());
        assert!(OriginTag::UserDelete.is_user());
        assert!(!OriginTag::History.is_user());
        assert!(!OriginTag::History.is_synthetic());
        for tag in [
            OriginTag::SyntheticAutoClose,
            OriginTag::SyntheticSelectionWrap,
            OriginTag::SyntheticDeleteCollapse,
            OriginTag::SyntheticQuotePair,
            OriginTag::SyntheticRevert,
        ] {
            assert!(tag.is_synthetic());
            assert!(!tag.is_user());
        }
    }
}
