//! cjk-autopair - automatic pairing of CJK brackets and quotes
//!
//! This crate provides a pairing engine that listens to the edit feed of an
//! editable text surface and keeps CJK punctuation paired: auto-closing typed
//! openers, wrapping selections, collapsing deleted pairs and promoting bare
//! closing quotes. A rope-backed reference surface is included.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod pairing;
pub mod tracing;

// Re-export commonly used types
pub use config::{PairingConfig, SettingsStore, TriggerMode};
pub use editable::{Document, EditableSurface, OriginTag, Position};
pub use pairing::{ConfigurationError, PairRule, PairingEngine, PairingSession, PairingTable};
