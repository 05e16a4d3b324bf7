//! Per-component listener registry and dispatcher

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::{DisabledUpdateMode, DomListenerRegistration};
use crate::events::{ComponentEvent, Registration};

/// Type-erased listener callback
type ErasedListener = Rc<dyn Fn(&dyn Any, &mut ListenerContext)>;

/// Type name without its module path
fn short_type_name<E>() -> &'static str {
    let name = type_name::<E>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Context handed to a listener for the duration of one invocation.
///
/// It only exists while the listener runs, so the unregister command cannot
/// outlive the dispatch it belongs to.
#[derive(Debug)]
pub struct ListenerContext {
    event_type: &'static str,
    unregister: bool,
}

impl ListenerContext {
    fn new(event_type: &'static str) -> Self {
        Self {
            event_type,
            unregister: false,
        }
    }

    /// Remove the listener currently being invoked once it returns.
    ///
    /// Listeners after it in the same dispatch still run.
    pub fn unregister_listener(&mut self) {
        self.unregister = true;
    }

    /// Whether the current listener asked to be removed
    pub fn is_unregistering(&self) -> bool {
        self.unregister
    }

    /// Name of the event type being dispatched
    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

/// How an event reached the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// Fired by server code; every binding receives it
    Server,
    /// Reconstructed from a DOM event; disabled sources only reach bindings
    /// that allow it
    Client { source_enabled: bool },
}

/// A registered listener
struct Binding {
    id: u64,
    listener: ErasedListener,
    mode: DisabledUpdateMode,
    alive: Cell<bool>,
}

/// Bindings and DOM triggers for one event type
struct TypeListeners {
    type_name: &'static str,
    bindings: Vec<Rc<Binding>>,
    dom_events: Vec<&'static str>,
    dom_registrations: Vec<DomListenerRegistration>,
}

impl TypeListeners {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            bindings: Vec::new(),
            dom_events: Vec::new(),
            dom_registrations: Vec::new(),
        }
    }

    /// Push the most permissive mode of the remaining bindings to the DOM triggers
    fn sync_dom_mode(&self) {
        if let Some(mode) = DisabledUpdateMode::merge(self.bindings.iter().map(|b| b.mode)) {
            for registration in &self.dom_registrations {
                registration.set_disabled_update_mode(mode);
            }
        }
    }
}

#[derive(Default)]
struct BusState {
    listeners: HashMap<TypeId, TypeListeners>,
    next_id: u64,
}

/// Event bus owned by a component.
///
/// Listeners are kept per event type in insertion order, which is also the
/// delivery order. Dispatch works on a snapshot taken when it begins:
/// listeners added during a dispatch do not receive it, and listeners removed
/// during a dispatch are skipped if they have not run yet.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        let types: Vec<_> = state
            .listeners
            .values()
            .map(|l| format!("{} ({})", l.type_name, l.bindings.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &types).finish()
    }
}

impl EventBus {
    /// Create an empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener at the tail of the list for `E`.
    ///
    /// Returns the registration and whether this is the first listener for
    /// the type (in which case the caller installs the DOM trigger).
    pub(crate) fn add<E, F>(&self, listener: F, mode: DisabledUpdateMode) -> (Registration, bool)
    where
        E: ComponentEvent,
        F: Fn(&E, &mut ListenerContext) + 'static,
    {
        let type_id = TypeId::of::<E>();
        let erased: ErasedListener = Rc::new(move |event: &dyn Any, context| {
            if let Some(event) = event.downcast_ref::<E>() {
                listener(event, context);
            }
        });

        let (id, first) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;

            let entry = state
                .listeners
                .entry(type_id)
                .or_insert_with(|| TypeListeners::new(short_type_name::<E>()));
            let first = entry.bindings.is_empty();
            entry.bindings.push(Rc::new(Binding {
                id,
                listener: erased,
                mode,
                alive: Cell::new(true),
            }));
            entry.sync_dom_mode();
            (id, first)
        };

        let state = Rc::downgrade(&self.state);
        let registration = Registration::new(move || Self::remove_binding(&state, type_id, id));
        (registration, first)
    }

    /// Remember the DOM trigger installed for an event type
    pub(crate) fn add_dom_registration(
        &self,
        type_id: TypeId,
        dom_event: &'static str,
        registration: DomListenerRegistration,
    ) {
        let mut state = self.state.borrow_mut();
        match state.listeners.get_mut(&type_id) {
            Some(entry) => {
                entry.dom_events.push(dom_event);
                entry.dom_registrations.push(registration);
                entry.sync_dom_mode();
            }
            // Every binding went away while the trigger was being installed
            None => registration.remove(),
        }
    }

    fn remove_binding(state: &Weak<RefCell<BusState>>, type_id: TypeId, id: u64) {
        let Some(state) = state.upgrade() else {
            return;
        };

        let dom_registrations = {
            let mut state = state.borrow_mut();
            let Some(entry) = state.listeners.get_mut(&type_id) else {
                return;
            };
            let Some(position) = entry.bindings.iter().position(|b| b.id == id) else {
                return;
            };

            let binding = entry.bindings.remove(position);
            binding.alive.set(false);

            if entry.bindings.is_empty() {
                // Last listener for the type: the DOM trigger goes too
                state
                    .listeners
                    .remove(&type_id)
                    .map(|entry| entry.dom_registrations)
                    .unwrap_or_default()
            } else {
                entry.sync_dom_mode();
                Vec::new()
            }
        };

        for registration in dom_registrations {
            registration.remove();
        }
    }

    /// Deliver an event to the listeners registered for its exact type
    pub(crate) fn dispatch<E: ComponentEvent>(&self, event: &E, delivery: Delivery) {
        let type_id = TypeId::of::<E>();
        let snapshot: Vec<Rc<Binding>> = match self.state.borrow().listeners.get(&type_id) {
            Some(entry) => entry.bindings.clone(),
            None => return,
        };

        log::trace!(
            "Dispatching {} to {} listener(s)",
            short_type_name::<E>(),
            snapshot.len()
        );

        for binding in snapshot {
            if !binding.alive.get() {
                continue;
            }

            if delivery == (Delivery::Client { source_enabled: false })
                && !binding.mode.allows_disabled()
            {
                log::debug!(
                    "Not delivering {} to listener {}: source is disabled",
                    short_type_name::<E>(),
                    binding.id
                );
                continue;
            }

            let mut context = ListenerContext::new(short_type_name::<E>());
            (binding.listener)(event, &mut context);

            if context.unregister {
                Self::remove_binding(&Rc::downgrade(&self.state), type_id, binding.id);
            }
        }
    }

    /// Whether any listener is registered for `E`
    pub fn has_listener<E: ComponentEvent>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    /// Number of listeners registered for `E`
    pub fn listener_count<E: ComponentEvent>(&self) -> usize {
        self.state
            .borrow()
            .listeners
            .get(&TypeId::of::<E>())
            .map_or(0, |entry| entry.bindings.len())
    }

    /// Names of the event types bound to a DOM event name
    pub fn event_types_for(&self, dom_event: &str) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .state
            .borrow()
            .listeners
            .values()
            .filter(|entry| entry.dom_events.iter().any(|e| *e == dom_event))
            .map(|entry| entry.type_name)
            .collect();
        names.sort_unstable();
        names
    }
}
