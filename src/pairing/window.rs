//! Two-slot memory of the most recent post-commit events.

use crate::editable::EditEvent;

/// The last two post-commit events seen by one engine, newest in `latest`.
#[derive(Debug, Clone, Default)]
pub struct RecentEventWindow {
    previous: Option<EditEvent>,
    latest: Option<EditEvent>,
}

impl RecentEventWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event`, dropping the oldest one
    pub fn push(&mut self, event: EditEvent) {
        self.previous = self.latest.replace(event);
    }

    pub fn latest(&self) -> Option<&EditEvent> {
        self.latest.as_ref()
    }

    pub fn previous(&self) -> Option<&EditEvent> {
        self.previous.as_ref()
    }

    pub fn clear(&mut self) {
        self.previous = None;
        self.latest = None;
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}
