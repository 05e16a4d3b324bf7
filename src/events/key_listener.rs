//! Listener decorator that forwards only matching key events

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use crate::events::{Key, KeyModifier, KeyboardEvent, ListenerContext};

/// Forwards a keyboard event to the wrapped listener when its key matches the
/// configured key and the held modifiers are exactly the configured ones.
///
/// A non-matching event is ignored.
pub struct KeyEventListener<E> {
    key: Key,
    modifiers: BTreeSet<KeyModifier>,
    listener: Box<dyn Fn(&E, &mut ListenerContext)>,
    _event: PhantomData<fn(&E)>,
}

impl<E: KeyboardEvent> KeyEventListener<E> {
    /// Wrap `listener` so it only sees `key` with exactly `modifiers` held
    pub fn new(
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
        listener: impl Fn(&E, &mut ListenerContext) + 'static,
    ) -> Self {
        Self {
            key,
            modifiers: modifiers.into_iter().collect(),
            listener: Box::new(listener),
            _event: PhantomData,
        }
    }

    /// Whether an event passes the key and modifier check
    pub fn matches(&self, event: &E) -> bool {
        self.key.matches_key(event.key()) && *event.modifiers() == self.modifiers
    }

    /// Forward `event` if it matches
    pub fn handle(&self, event: &E, context: &mut ListenerContext) {
        if self.matches(event) {
            (self.listener)(event, context);
        }
    }

    /// Turn the decorator into a plain listener callback
    pub fn into_listener(self) -> impl Fn(&E, &mut ListenerContext) {
        move |event: &E, context: &mut ListenerContext| self.handle(event, context)
    }
}

impl<E> fmt::Debug for KeyEventListener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEventListener")
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}
