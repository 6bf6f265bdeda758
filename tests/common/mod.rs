//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::rc::Rc;

use cjk_autopair::config::{MemorySettings, PairingConfig, SettingsStore, TriggerMode};
use cjk_autopair::editable::{Document, EditableSurface, TextBuffer};
use cjk_autopair::pairing::{PairingEngine, PairingSession};

/// Document holding `text` with the cursor at its end
pub fn doc_at_end(text: &str) -> Document {
    let mut doc = Document::with_text(text);
    let end = doc.position_at(doc.buffer().len_chars());
    doc.set_cursor(end);
    doc
}

/// Attach a fresh engine built from `config` to `doc`
pub fn attach(doc: &mut Document, config: PairingConfig) -> PairingSession {
    let settings: Rc<dyn SettingsStore> = Rc::new(MemorySettings::new(config));
    let engine = PairingEngine::new(settings).expect("valid pairing config");
    PairingSession::attach(engine, doc)
}

/// Document with `text`, cursor at its end, and a default engine attached
pub fn paired(text: &str) -> (Document, PairingSession) {
    paired_with(text, PairingConfig::default())
}

pub fn paired_with(text: &str, config: PairingConfig) -> (Document, PairingSession) {
    let mut doc = doc_at_end(text);
    let session = attach(&mut doc, config);
    (doc, session)
}

pub fn lookahead_config() -> PairingConfig {
    PairingConfig {
        allow_quote_lookahead: true,
        ..PairingConfig::default()
    }
}

pub fn keycode_config() -> PairingConfig {
    PairingConfig {
        trigger: TriggerMode::Keycode,
        ..PairingConfig::default()
    }
}

/// Text with `|` at the cursor
pub fn with_cursor(doc: &Document) -> String {
    cjk_autopair::cli::render(doc)
}
