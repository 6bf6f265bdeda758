//! CJK symbol pairing.
//!
//! # Architecture
//!
//! ```text
//! PairingConfig ─▶ PairingTable ─┬─▶ PairingEngine ◀── EditEvent feed ── EditableSurface
//!                  KeycodeTable ─┘        │
//!                                         └── synthetic edits (tagged) ──▶ EditableSurface
//! ```
//!
//! - [`PairingTable`]: opener → closer map, validated on construction
//! - [`KeycodeTable`]: (physical key, shift) → pair, the legacy trigger source
//! - [`PairingEngine`]: the edit listener doing wrap / auto-close / collapse
//! - [`PairingSession`]: owns an engine's subscriptions on one surface

mod engine;
mod error;
mod keycode;
mod session;
mod table;
mod window;

pub use engine::PairingEngine;
pub use error::ConfigurationError;
pub use keycode::{KeyChord, KeyCode, KeycodeTable, DEFAULT_KEY_BINDINGS};
pub use session::PairingSession;
pub use table::{PairRule, PairingTable, DEFAULT_PAIRS};
pub use window::RecentEventWindow;
