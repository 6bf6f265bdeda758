//! The pairing engine: a listener that keeps CJK brackets and quotes paired.
//!
//! Each committed change reaches the engine twice:
//!
//! - **Pre-commit**: an opener typed over a selection is rewritten into
//!   `opener + selection + closer`.
//! - **Post-commit**: a typed opener gets its closer (auto-close), a deleted
//!   opener takes its adjacent closer with it (delete-collapse), and a bare
//!   closing quote is promoted to a full quote pair (quote lookahead).
//!
//! The engine reacts only to user-originated edits. Everything it issues
//! carries a synthetic [`OriginTag`], so observing its own output never
//! triggers another action and recursion stops after one level.

use std::rc::Rc;

use crate::config::{PairingConfig, SettingsStore, TriggerMode};
use crate::editable::{
    EditEvent, EditHandler, EditPhase, EditableSurface, OriginTag, Position, Rewrite,
};

use super::error::ConfigurationError;
use super::keycode::{KeyChord, KeycodeTable};
use super::table::{PairRule, PairingTable};
use super::window::RecentEventWindow;

pub struct PairingEngine {
    settings: Rc<dyn SettingsStore>,
    table: PairingTable,
    keycodes: KeycodeTable,
    window: RecentEventWindow,
    /// Rule armed by a key chord, consumed by the next user insertion
    armed: Option<PairRule>,
    /// Set when the pre-commit pass wrapped the pending edit
    wrap_pending: bool,
}

impl std::fmt::Debug for PairingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingEngine")
            .field("pairs", &self.table.len())
            .field("key_chords", &self.keycodes.len())
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

impl PairingEngine {
    /// Build an engine from the configuration current in `settings`.
    ///
    /// The tables are fixed from here on; the toggles are re-read on every
    /// event. Invalid pairing data refuses to build.
    pub fn new(settings: Rc<dyn SettingsStore>) -> Result<Self, ConfigurationError> {
        let config = settings.load_config();
        let table = config.pairing_table()?;
        let keycodes = config.keycode_table(&table)?;
        tracing::debug!(
            "Pairing engine ready: {} pairs, {} key chords, trigger {:?}",
            table.len(),
            keycodes.len(),
            config.trigger
        );

        Ok(Self {
            settings,
            table,
            keycodes,
            window: RecentEventWindow::new(),
            armed: None,
            wrap_pending: false,
        })
    }

    pub fn table(&self) -> &PairingTable {
        &self.table
    }

    pub fn keycodes(&self) -> &KeycodeTable {
        &self.keycodes
    }

    pub fn recent_events(&self) -> &RecentEventWindow {
        &self.window
    }

    pub fn armed(&self) -> Option<PairRule> {
        self.armed
    }

    /// Report a physical key press. In keycode mode a bound chord arms its
    /// pair for the next insertion; any other chord disarms.
    pub fn press_key(&mut self, chord: KeyChord) -> Option<PairRule> {
        if self.settings.load_config().trigger != TriggerMode::Keycode {
            return None;
        }
        self.armed = self.keycodes.lookup(chord);
        tracing::trace!("Key {} armed {:?}", chord, self.armed);
        self.armed
    }

    /// The rule an insertion triggers, if any, under the active trigger mode.
    fn resolve_trigger(
        &self,
        event: &EditEvent,
        mode: TriggerMode,
        armed: Option<PairRule>,
    ) -> Option<PairRule> {
        let symbol = event.single_inserted()?;
        match mode {
            TriggerMode::Symbol => self.table.lookup_by_opener(symbol),
            TriggerMode::Keycode => armed.filter(|rule| rule.opener == symbol),
        }
    }

    // =========================================================================
    // Pre-commit
    // =========================================================================

    fn before_commit(&mut self, event: &EditEvent) -> Option<Rewrite> {
        let config = self.settings.load_config();
        if !config.allow_selection_wrap || event.origin != OriginTag::UserEdit {
            return None;
        }

        let selection = event
            .selection_before
            .as_ref()
            .filter(|selection| !selection.is_empty())?;
        let rule = self.resolve_trigger(event, config.trigger, self.armed)?;

        let mut text = String::with_capacity(selection.text.len() + 8);
        text.push(rule.opener);
        text.push_str(&selection.text);
        text.push(rule.closer);

        tracing::debug!(
            "Wrapping selection {:?}..{:?} with {}{}",
            selection.start,
            selection.end,
            rule.opener,
            rule.closer
        );
        self.wrap_pending = true;
        Some(Rewrite {
            text,
            from: selection.start,
            to: selection.end,
            origin: OriginTag::SyntheticSelectionWrap,
        })
    }

    // =========================================================================
    // Post-commit
    // =========================================================================

    fn after_commit(&mut self, event: &EditEvent, surface: &mut dyn EditableSurface) {
        let config = self.settings.load_config();
        let armed = if event.origin.is_user() || event.origin == OriginTag::SyntheticSelectionWrap
        {
            self.armed.take()
        } else {
            None
        };
        let wrapped = std::mem::take(&mut self.wrap_pending);

        self.window.push(event.clone());
        if self.reverse_composition_artifact(surface) {
            return;
        }

        if event.origin.is_synthetic() {
            tracing::trace!("Ignoring own {:?} edit", event.origin);
            return;
        }
        if !event.origin.is_user() {
            tracing::trace!("Ignoring {:?} replay", event.origin);
            return;
        }

        if config.auto_close && !wrapped {
            self.auto_close(event, &config, armed, surface);
        }
        if config.delete_collapse {
            self.collapse_delete(event, surface);
        }
        if config.allow_quote_lookahead && config.trigger == TriggerMode::Symbol {
            self.promote_quote(event, surface);
        }
    }

    /// Insert the closer after a typed opener, leaving the cursor between them.
    fn auto_close(
        &self,
        event: &EditEvent,
        config: &PairingConfig,
        armed: Option<PairRule>,
        surface: &mut dyn EditableSurface,
    ) {
        if event.origin != OriginTag::UserEdit {
            return;
        }
        let Some(rule) = self.resolve_trigger(event, config.trigger, armed) else {
            return;
        };

        let cursor = surface.cursor();
        tracing::debug!("Auto-closing {} with {} at {:?}", rule.opener, rule.closer, cursor);
        surface.replace_range(
            &rule.closer.to_string(),
            cursor,
            cursor,
            OriginTag::SyntheticAutoClose,
        );
        surface.set_cursor(cursor);
    }

    /// Remove the closer that sat right after a deleted opener.
    fn collapse_delete(&self, event: &EditEvent, surface: &mut dyn EditableSurface) {
        if !event.is_deletion() {
            return;
        }
        let Some(rule) = event
            .removed
            .chars()
            .next()
            .and_then(|first| self.table.lookup_by_opener(first))
        else {
            return;
        };

        let start = event.range_start;
        if surface.char_at(start) == Some(rule.closer) {
            tracing::debug!("Collapsing {}{} at {:?}", rule.opener, rule.closer, start);
            surface.replace_range(
                "",
                start,
                start.next_column(),
                OriginTag::SyntheticDeleteCollapse,
            );
        } else {
            tracing::trace!("Deleted {} without adjacent closer", rule.opener);
        }
    }

    /// Turn a lone closing quote into `opener + closer`, cursor between.
    fn promote_quote(&self, event: &EditEvent, surface: &mut dyn EditableSurface) {
        if event.origin != OriginTag::UserEdit || !event.removed.is_empty() {
            return;
        }
        let Some(rule) = event
            .single_inserted()
            .and_then(|symbol| self.table.lookup_by_closer(symbol))
            .and_then(|opener| self.table.lookup_by_opener(opener))
            .filter(PairRule::is_quote)
        else {
            return;
        };

        let start = event.range_start;
        let line_prefix = surface.range(Position::new(start.line, 0), start);
        if has_unmatched_opener(&line_prefix, rule) {
            tracing::trace!("{} closes an open quote, leaving it", rule.closer);
            return;
        }

        let pair: String = [rule.opener, rule.closer].iter().collect();
        tracing::debug!("Promoting {} to {} at {:?}", rule.closer, pair, start);
        surface.replace_range(&pair, start, start.next_column(), OriginTag::SyntheticQuotePair);
        surface.set_cursor(start.next_column());
    }

    /// Undo the duplicate edit some input methods emit right after a
    /// selection wrap, when composition finalizes. Returns true if reversed.
    ///
    /// Only the edit directly after the wrap qualifies, with no cursor
    /// movement in between, inserting the same opener at the caret the wrap
    /// left or at the caret the input method held before it.
    fn reverse_composition_artifact(&self, surface: &mut dyn EditableSurface) -> bool {
        let (Some(wrap), Some(current)) = (self.window.previous(), self.window.latest()) else {
            return false;
        };
        if wrap.origin != OriginTag::SyntheticSelectionWrap
            || current.origin != OriginTag::UserEdit
            || current.selection_before.is_some()
        {
            return false;
        }

        let opener = wrap.inserted.chars().next();
        if opener.is_none() || current.single_inserted() != opener {
            return false;
        }

        let wrap_end = wrap.inserted_end();
        let stale_caret = wrap.selection_before.as_ref().map(|selection| selection.end);
        if current.range_start != wrap_end && Some(current.range_start) != stale_caret {
            return false;
        }

        let from = current.range_start;
        let to = current.inserted_end();
        let removed = current.removed.clone();
        tracing::debug!("Reverting composition artifact {:?} at {:?}", current.inserted, from);
        surface.replace_range(&removed, from, to, OriginTag::SyntheticRevert);
        surface.set_cursor(wrap_end);
        true
    }
}

impl EditHandler for PairingEngine {
    fn on_edit(
        &mut self,
        event: &EditEvent,
        surface: &mut dyn EditableSurface,
    ) -> Option<Rewrite> {
        match event.phase {
            EditPhase::Pre => self.before_commit(event),
            EditPhase::Post => {
                self.after_commit(event, surface);
                None
            }
        }
    }

    /// A moved caret ends any edit sequence the window was tracking.
    fn on_cursor_moved(&mut self, cursor: Position) {
        if !self.window.is_empty() {
            tracing::trace!("Cursor moved to {:?}, forgetting recent edits", cursor);
            self.window.clear();
        }
    }
}

/// Whether `prefix` leaves an opener of `rule` unclosed
fn has_unmatched_opener(prefix: &str, rule: PairRule) -> bool {
    let depth = prefix.chars().fold(0usize, |depth, ch| {
        if ch == rule.opener {
            depth + 1
        } else if ch == rule.closer {
            depth.saturating_sub(1)
        } else {
            depth
        }
    });
    depth > 0
}
