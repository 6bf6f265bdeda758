//! Editable text surface abstraction and its reference implementation.
//!
//! The pairing engine only ever talks to an [`EditableSurface`]: it reads the
//! cursor and ranges, issues tagged replacements, and listens to the surface's
//! [`EditEvent`] feed. [`Document`] implements the surface over a rope buffer
//! so the engine can be driven end to end without a host editor.
//!
//! # Example
//!
//! ```ignore
//! use cjk_autopair::editable::{Document, EditableSurface};
//!
//! let mut doc = Document::with_text("hello");
//! doc.select_offsets(0, 5);
//! doc.type_text("bye");
//! assert_eq!(doc.text(), "bye");
//! ```

mod buffer;
mod document;
mod event;
mod history;
mod position;
mod selection;
mod surface;

pub use buffer::{RopeBuffer, TextBuffer, TextBufferMut};
pub use document::Document;
pub use event::{EditEvent, EditPhase, OriginTag, Rewrite, SelectedRange};
pub use history::{EditGroup, EditHistory, EditOperation};
pub use position::Position;
pub use selection::Selection;
pub use surface::{EditHandler, EditableSurface, SharedHandler, Subscription};
