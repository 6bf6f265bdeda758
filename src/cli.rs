//! Command-line interface for the replay binary

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::config::{PairingConfig, TriggerMode};
use crate::editable::{Document, EditableSurface, TextBuffer};
use crate::pairing::{KeyChord, PairingSession};

/// Replay an editing session through the CJK pairing engine
#[derive(Parser, Debug)]
#[command(name = "cjk-autopair")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Steps to replay: type:TEXT, key:CHORD, backspace, delete, undo, redo,
    /// select:A:B, cursor:N (offsets are in characters)
    #[arg(value_name = "STEP")]
    pub steps: Vec<Step>,

    /// Initial document text; the cursor starts at its end
    #[arg(long, default_value = "")]
    pub text: String,

    /// Settings file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore any settings file and start from built-in defaults
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Don't wrap selections when an opener is typed over them
    #[arg(long)]
    pub no_wrap: bool,

    /// Promote bare closing quotes to full pairs
    #[arg(long)]
    pub lookahead: bool,

    /// Trigger on key chords (`key:` steps) instead of typed openers
    #[arg(long)]
    pub keycode: bool,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    pub save: bool,
}

impl CliArgs {
    /// Apply the command-line toggles on top of a loaded config
    pub fn apply_overrides(&self, config: &mut PairingConfig) {
        if self.no_wrap {
            config.allow_selection_wrap = false;
        }
        if self.lookahead {
            config.allow_quote_lookahead = true;
        }
        if self.keycode {
            config.trigger = TriggerMode::Keycode;
        }
    }
}

/// One replayed editor action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Type(String),
    Key(KeyChord),
    Backspace,
    Delete,
    Undo,
    Redo,
    Select(usize, usize),
    Cursor(usize),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let offset = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid offset '{}' in step '{}'", value, s))
        };

        match (name.to_lowercase().as_str(), arg) {
            ("type", Some(text)) if !text.is_empty() => Ok(Step::Type(text.to_string())),
            ("key", Some(chord)) => chord
                .parse::<KeyChord>()
                .map(Step::Key)
                .map_err(|e| e.to_string()),
            ("backspace", None) => Ok(Step::Backspace),
            ("delete", None) => Ok(Step::Delete),
            ("undo", None) => Ok(Step::Undo),
            ("redo", None) => Ok(Step::Redo),
            ("select", Some(range)) => {
                let (anchor, head) = range
                    .split_once(':')
                    .ok_or_else(|| format!("Expected select:A:B, got '{}'", s))?;
                Ok(Step::Select(offset(anchor)?, offset(head)?))
            }
            ("cursor", Some(at)) => Ok(Step::Cursor(offset(at)?)),
            _ => Err(format!("Unknown step '{}'", s)),
        }
    }
}

impl Step {
    /// Perform this step against `doc`, with `session` attached to it
    pub fn apply(&self, doc: &mut Document, session: &PairingSession) {
        tracing::debug!("Step {:?}", self);
        match self {
            Step::Type(text) => doc.type_text(text),
            Step::Key(chord) => {
                session.press_key(*chord);
            }
            Step::Backspace => {
                doc.delete_backward();
            }
            Step::Delete => {
                doc.delete_forward();
            }
            Step::Undo => {
                doc.undo();
            }
            Step::Redo => {
                doc.redo();
            }
            Step::Select(anchor, head) => doc.select_offsets(*anchor, *head),
            Step::Cursor(at) => {
                let pos = doc.position_at(*at);
                doc.set_cursor(pos);
            }
        }
    }
}

/// Document text with `|` marking the cursor, or `[`/`]` around a selection
pub fn render(doc: &Document) -> String {
    let selection = doc.selection_range();
    let mut out = String::new();

    if selection.is_empty() {
        let cursor = doc.cursor_offset();
        for (i, ch) in doc.text().chars().enumerate() {
            if i == cursor {
                out.push('|');
            }
            out.push(ch);
        }
        if cursor >= doc.buffer().len_chars() {
            out.push('|');
        }
        return out;
    }

    let start = doc.offset_of(selection.start());
    let end = doc.offset_of(selection.end());
    for (i, ch) in doc.text().chars().enumerate() {
        if i == start {
            out.push('[');
        }
        if i == end {
            out.push(']');
        }
        out.push(ch);
    }
    if end >= doc.buffer().len_chars() {
        out.push(']');
    }
    out
}
