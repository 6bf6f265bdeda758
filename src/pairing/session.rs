//! Attaching an engine to a surface, and detaching it again.

use std::cell::RefCell;
use std::rc::Rc;

use crate::editable::{EditPhase, EditableSurface, SharedHandler, Subscription};

use super::engine::PairingEngine;
use super::keycode::KeyChord;
use super::table::PairRule;

/// An engine subscribed to one surface.
///
/// The session owns the shared engine handle and the subscriptions made with
/// it; [`detach`](Self::detach) hands exactly those subscriptions back.
#[derive(Debug)]
pub struct PairingSession {
    engine: Rc<RefCell<PairingEngine>>,
    pre: Subscription,
    post: Subscription,
}

impl PairingSession {
    /// Subscribe `engine` to both phases of `surface`'s edit feed
    pub fn attach(engine: PairingEngine, surface: &mut dyn EditableSurface) -> Self {
        let engine = Rc::new(RefCell::new(engine));
        let handler: SharedHandler = engine.clone();
        let pre = surface.subscribe(EditPhase::Pre, handler.clone());
        let post = surface.subscribe(EditPhase::Post, handler);
        tracing::debug!("Pairing session attached ({:?}, {:?})", pre, post);

        Self { engine, pre, post }
    }

    /// Unsubscribe from `surface`. Returns false if either subscription was
    /// already gone.
    pub fn detach(self, surface: &mut dyn EditableSurface) -> bool {
        let pre = surface.unsubscribe(self.pre);
        let post = surface.unsubscribe(self.post);
        tracing::debug!("Pairing session detached");
        pre && post
    }

    pub fn engine(&self) -> &Rc<RefCell<PairingEngine>> {
        &self.engine
    }

    pub fn subscriptions(&self) -> [Subscription; 2] {
        [self.pre, self.post]
    }

    /// Forward a physical key press to the engine (keycode trigger mode)
    pub fn press_key(&self, chord: KeyChord) -> Option<PairRule> {
        self.engine.borrow_mut().press_key(chord)
    }
}
