//! Keyboard shortcuts
//!
//! A shortcut binds a key and an exact modifier set to a listener. It is
//! scoped to a *lifecycle owner*: the shortcut's keydown listener exists only
//! while the owner is attached, and the listener only runs while the owner is
//! enabled. By default the keydown listener is placed on the UI the owner is
//! attached to, so the shortcut works anywhere on the page; `listen_on`
//! narrows that to one component.
//!
//! Key matching happens on the client through the listener filter, so only
//! matching key presses ever reach the server.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::component::{AsComponent, Component, Ui, WeakComponent};
use crate::dom::{DomEvent, DomListenerRegistration};
use crate::events::event::component_event;
use crate::events::{ClickEvent, EventError, Key, KeyModifier, Registration};

const KEYDOWN: &str = "keydown";

/// A shortcut was triggered
#[derive(Debug, Clone)]
pub struct ShortcutEvent {
    source: Component,
    from_client: bool,
    lifecycle_owner: Component,
    key: Key,
    modifiers: BTreeSet<KeyModifier>,
}

impl ShortcutEvent {
    /// Create a shortcut event for the component the key press was observed on
    pub fn new(
        source: &Component,
        from_client: bool,
        lifecycle_owner: &Component,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
    ) -> Self {
        Self {
            source: source.clone(),
            from_client,
            lifecycle_owner: lifecycle_owner.clone(),
            key,
            modifiers: modifiers.into_iter().collect(),
        }
    }

    /// Component controlling when the shortcut is active
    pub fn lifecycle_owner(&self) -> &Component {
        &self.lifecycle_owner
    }

    /// Primary key of the shortcut
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Modifiers of the shortcut
    pub fn modifiers(&self) -> &BTreeSet<KeyModifier> {
        &self.modifiers
    }

    /// Whether the event is for `key` with exactly `modifiers`
    pub fn matches(&self, key: &Key, modifiers: impl IntoIterator<Item = KeyModifier>) -> bool {
        let modifiers: BTreeSet<_> = modifiers.into_iter().collect();
        self.key.matches_key(key) && self.modifiers == modifiers
    }
}

component_event!(ShortcutEvent);

type ShortcutListener = Rc<dyn Fn(&ShortcutEvent)>;

struct ShortcutState {
    key: Key,
    modifiers: BTreeSet<KeyModifier>,
    listener: Option<ShortcutListener>,
    lifecycle_owner: WeakComponent,
    listen_on: Option<WeakComponent>,
    allow_default: bool,
    allow_propagation: bool,
    lifecycle_registration: Option<Registration>,
    listen_on_registration: Option<Registration>,
    dom_registration: Option<DomListenerRegistration>,
    active_on: WeakComponent,
}

impl ShortcutState {
    fn filter_expression(&self) -> String {
        let mut filter = format!(
            "{} && {}",
            self.key.filter_expression(),
            KeyModifier::filter_expression(&self.modifiers)
        );
        if !self.allow_default {
            filter.push_str(" && (event.preventDefault() || true)");
        }
        if !self.allow_propagation {
            filter.push_str(" && (event.stopPropagation() || true)");
        }
        filter
    }

    /// Component the keydown listener belongs on, if it can be resolved now
    fn resolve_listen_on(&self) -> Option<Component> {
        match &self.listen_on {
            Some(listen_on) => listen_on.upgrade(),
            None => self
                .lifecycle_owner
                .upgrade()
                .and_then(|owner| owner.ui())
                .map(|ui| ui.as_component().clone()),
        }
    }

    fn deactivate(&mut self) {
        if let Some(registration) = self.dom_registration.take() {
            registration.remove();
            log::debug!("Shortcut {} deactivated", self.key);
        }
        self.active_on = WeakComponent::default();
    }
}

/// Handle for a shortcut.
///
/// Configuration methods return the handle so calls can be chained.
/// Dropping the handle keeps the shortcut alive; it lives as long as its
/// lifecycle owner or until [`remove`](Self::remove) is called.
#[derive(Clone)]
pub struct ShortcutRegistration {
    state: Rc<RefCell<ShortcutState>>,
}

impl fmt::Debug for ShortcutRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ShortcutRegistration")
            .field("key", &state.key)
            .field("modifiers", &state.modifiers)
            .field("lifecycle_owner", &state.lifecycle_owner)
            .field("listen_on", &state.active_on)
            .field("allow_default", &state.allow_default)
            .field("allow_propagation", &state.allow_propagation)
            .finish()
    }
}

/// Entry points for registering shortcuts
#[derive(Debug)]
pub struct Shortcuts;

impl Shortcuts {
    /// Invoke `listener` when `key` is pressed while `lifecycle_owner` is
    /// attached and enabled.
    ///
    /// The key may not be empty and may not be a modifier; add modifiers with
    /// the returned registration.
    pub fn add_shortcut_listener(
        lifecycle_owner: &dyn AsComponent,
        listener: impl Fn(&ShortcutEvent) + 'static,
        key: Key,
    ) -> crate::Result<ShortcutRegistration> {
        if key.is_empty() {
            return Err(EventError::InvalidArgument("The shortcut key cannot be empty".into()).into());
        }
        if key.is_modifier() {
            return Err(EventError::InvalidArgument(format!(
                "The shortcut key cannot be the modifier {}",
                key
            ))
            .into());
        }

        let registration = ShortcutRegistration {
            state: Rc::new(RefCell::new(ShortcutState {
                key,
                modifiers: BTreeSet::new(),
                listener: Some(Rc::new(listener)),
                lifecycle_owner: WeakComponent::default(),
                listen_on: None,
                allow_default: false,
                allow_propagation: false,
                lifecycle_registration: None,
                listen_on_registration: None,
                dom_registration: None,
                active_on: WeakComponent::default(),
            })),
        };
        registration.track_lifecycle_owner(lifecycle_owner.as_component());
        Ok(registration)
    }
}

impl ShortcutRegistration {
    /// Whether [`remove`](Self::remove) has been called
    fn is_removed(&self) -> bool {
        self.state.borrow().listener.is_none()
    }

    /// Follow attach and detach of the lifecycle owner
    fn track_lifecycle_owner(&self, owner: &Component) {
        if self.is_removed() {
            return;
        }
        let attach_state = self.state.clone();
        let detach_state = self.state.clone();
        let registration = Registration::combine([
            owner.add_attach_listener(move |_, _| Self::refresh(&attach_state)),
            owner.add_detach_listener(move |_, _| detach_state.borrow_mut().deactivate()),
        ]);

        {
            let mut state = self.state.borrow_mut();
            if let Some(previous) = state.lifecycle_registration.replace(registration) {
                previous.remove();
            }
            state.lifecycle_owner = owner.downgrade();
        }
        Self::refresh(&self.state);
    }

    /// Install, move or reconfigure the keydown listener to match the current state
    fn refresh(state: &Rc<RefCell<ShortcutState>>) {
        let mut guard = state.borrow_mut();
        if guard.listener.is_none() {
            return;
        }

        let owner_attached = guard
            .lifecycle_owner
            .upgrade()
            .is_some_and(|owner| owner.is_attached());
        if !owner_attached {
            guard.deactivate();
            return;
        }

        let Some(target) = guard.resolve_listen_on().filter(Component::is_attached) else {
            log::warn!(
                "Shortcut {} has no attached component to listen on",
                guard.key
            );
            guard.deactivate();
            return;
        };

        let filter = guard.filter_expression();
        if guard.active_on.upgrade().as_ref() == Some(&target) {
            if let Some(registration) = &guard.dom_registration {
                registration.set_filter(Some(&filter));
                return;
            }
        }
        guard.deactivate();

        let weak_state = Rc::downgrade(state);
        let source = target.downgrade();
        let handler = move |_: &DomEvent| -> Result<(), EventError> {
            Self::invoke(&weak_state, &source);
            Ok(())
        };
        match target.element().add_event_listener(KEYDOWN, handler) {
            Ok(registration) => {
                registration.set_filter(Some(&filter));
                guard.dom_registration = Some(registration);
                guard.active_on = target.downgrade();
                log::debug!("Shortcut {} activated on {}", guard.key, target.id());
            }
            Err(e) => log::error!("Cannot install shortcut {}: {}", guard.key, e),
        }
    }

    fn invoke(state: &Weak<RefCell<ShortcutState>>, source: &WeakComponent) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let Some(source) = source.upgrade() else {
            return;
        };

        let (listener, event) = {
            let state = state.borrow();
            let Some(listener) = state.listener.clone() else {
                return;
            };
            let Some(owner) = state.lifecycle_owner.upgrade() else {
                return;
            };
            if !owner.is_attached() || !owner.is_enabled() {
                log::debug!("Shortcut {} ignored: lifecycle owner inactive", state.key);
                return;
            }
            let event = ShortcutEvent::new(
                &source,
                true,
                &owner,
                state.key.clone(),
                state.modifiers.clone(),
            );
            (listener, event)
        };

        listener(&event);
    }

    fn update(&self, f: impl FnOnce(&mut ShortcutState)) -> &Self {
        f(&mut self.state.borrow_mut());
        Self::refresh(&self.state);
        self
    }

    /// Replace the modifiers of the shortcut
    pub fn with_modifiers(&self, modifiers: impl IntoIterator<Item = KeyModifier>) -> &Self {
        let modifiers: BTreeSet<_> = modifiers.into_iter().collect();
        self.update(|state| state.modifiers = modifiers)
    }

    fn with_modifier(&self, modifier: KeyModifier) -> &Self {
        self.update(|state| {
            state.modifiers.insert(modifier);
        })
    }

    /// Also require Alt
    pub fn with_alt(&self) -> &Self {
        self.with_modifier(KeyModifier::Alt)
    }

    /// Also require Control
    pub fn with_ctrl(&self) -> &Self {
        self.with_modifier(KeyModifier::Control)
    }

    /// Also require Shift
    pub fn with_shift(&self) -> &Self {
        self.with_modifier(KeyModifier::Shift)
    }

    /// Also require Meta
    pub fn with_meta(&self) -> &Self {
        self.with_modifier(KeyModifier::Meta)
    }

    /// Let the browser run its default action for the key press
    pub fn allow_browser_default(&self) -> &Self {
        self.update(|state| state.allow_default = true)
    }

    /// Let the key press propagate to parent elements on the client
    pub fn allow_event_propagation(&self) -> &Self {
        self.update(|state| state.allow_propagation = true)
    }

    /// Listen for the key press on `component` instead of the whole UI
    pub fn listen_on(&self, component: &dyn AsComponent) -> &Self {
        if self.is_removed() {
            return self;
        }
        let component = component.as_component();
        let attach_state = self.state.clone();
        let detach_state = self.state.clone();
        let registration = Registration::combine([
            component.add_attach_listener(move |_, _| Self::refresh(&attach_state)),
            component.add_detach_listener(move |_, _| detach_state.borrow_mut().deactivate()),
        ]);

        self.update(|state| {
            if let Some(previous) = state.listen_on_registration.replace(registration) {
                previous.remove();
            }
            state.listen_on = Some(component.downgrade());
        })
    }

    /// Tie the shortcut's lifetime to `component` instead of the original owner
    pub fn bind_lifecycle_to(&self, component: &dyn AsComponent) -> &Self {
        self.track_lifecycle_owner(component.as_component());
        self
    }

    /// Remove the shortcut; repeated calls do nothing
    pub fn remove(&self) {
        let registrations = {
            let mut state = self.state.borrow_mut();
            if state.listener.take().is_none() {
                return;
            }
            state.deactivate();
            [
                state.lifecycle_registration.take(),
                state.listen_on_registration.take(),
            ]
        };
        for registration in registrations.into_iter().flatten() {
            registration.remove();
        }
    }

    /// Whether the keydown listener is currently installed
    pub fn is_shortcut_active(&self) -> bool {
        self.state.borrow().dom_registration.is_some()
    }

    /// Primary key
    pub fn key(&self) -> Key {
        self.state.borrow().key.clone()
    }

    /// Required modifiers
    pub fn modifiers(&self) -> BTreeSet<KeyModifier> {
        self.state.borrow().modifiers.clone()
    }

    /// Whether the browser default action runs
    pub fn is_browser_default_allowed(&self) -> bool {
        self.state.borrow().allow_default
    }

    /// Whether the key press propagates on the client
    pub fn is_event_propagation_allowed(&self) -> bool {
        self.state.borrow().allow_propagation
    }

    /// Component controlling when the shortcut is active
    pub fn lifecycle_owner(&self) -> Option<Component> {
        self.state.borrow().lifecycle_owner.upgrade()
    }

    /// Component the keydown listener is installed on while active
    pub fn owner(&self) -> Option<Component> {
        self.state.borrow().active_on.upgrade()
    }

    /// Client-side filter of the keydown listener
    pub fn filter_expression(&self) -> String {
        self.state.borrow().filter_expression()
    }
}

impl From<ShortcutRegistration> for Registration {
    fn from(registration: ShortcutRegistration) -> Self {
        Registration::new(move || registration.remove())
    }
}

/// Common shortcut actions
#[derive(Debug)]
pub struct ShortcutActions;

impl ShortcutActions {
    /// Focus `component` when `key` is pressed
    pub fn focus(component: &dyn AsComponent, key: Key) -> crate::Result<ShortcutRegistration> {
        let target = component.as_component().downgrade();
        Shortcuts::add_shortcut_listener(
            component,
            move |_| {
                if let Some(target) = target.upgrade() {
                    target.element().call_js_function("focus", Vec::new());
                }
            },
            key,
        )
    }

    /// Fire a click on `component` when `key` is pressed
    pub fn click(component: &dyn AsComponent, key: Key) -> crate::Result<ShortcutRegistration> {
        let target = component.as_component().downgrade();
        Shortcuts::add_shortcut_listener(
            component,
            move |_| {
                if let Some(target) = target.upgrade() {
                    target.fire_event(&ClickEvent::new(&target));
                }
            },
            key,
        )
    }

    /// Run `command` when `key` is pressed anywhere in the current UI
    pub fn exec(command: impl Fn() + 'static, key: Key) -> crate::Result<ShortcutRegistration> {
        let ui = Ui::require_current()?;
        Shortcuts::add_shortcut_listener(&ui, move |_| command(), key)
    }
}
