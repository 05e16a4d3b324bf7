//! Component model for the Tether framework
//!
//! A [`Component`] is a cheap, clonable handle to a server-side node. Each
//! node owns exactly one [`Element`], an [`EventBus`] and its children; the
//! parent link is weak. All mutation happens on the thread that owns the
//! component tree, so state lives in `Cell`/`RefCell` rather than behind
//! locks.

mod enabled;
mod error;
mod lifecycle;
mod registry;
mod ui;

#[cfg(test)]
mod tests;

pub use error::ComponentError;
pub use lifecycle::{AttachEvent, DetachEvent};
pub use registry::ComponentRegistry;
pub use ui::Ui;

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::dom::{DisabledUpdateMode, DomEvent, Element};
use crate::events::bus::Delivery;
use crate::events::{
    ComponentEvent, DomBinding, EventArgs, EventBus, EventError, ListenerContext, Registration,
};

/// Unique identifier for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Generate a new unique component ID
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component-{}", self.0)
    }
}

/// Anything backed by a component.
///
/// This is the base contract every capability mixin builds on.
pub trait AsComponent {
    /// The component backing this object
    fn as_component(&self) -> &Component;
}

pub(crate) struct ComponentInner {
    id: ComponentId,
    element: Element,
    bus: EventBus,
    parent: RefCell<Weak<ComponentInner>>,
    children: RefCell<Vec<Component>>,
    explicitly_disabled: Cell<bool>,
    attached_once: Cell<bool>,
    is_ui: bool,
}

/// Handle to a server-side component
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

/// Non-owning handle to a component
#[derive(Clone, Default)]
pub struct WeakComponent {
    inner: Weak<ComponentInner>,
}

impl WeakComponent {
    /// Get the component if it is still alive
    pub fn upgrade(&self) -> Option<Component> {
        self.inner.upgrade().map(|inner| Component { inner })
    }
}

impl fmt::Debug for WeakComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(component) => write!(f, "WeakComponent({})", component.id()),
            None => write!(f, "WeakComponent(dropped)"),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("tag", &self.inner.element.tag())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Component {}

impl AsComponent for Component {
    fn as_component(&self) -> &Component {
        self
    }
}

impl Component {
    /// Create a detached component backed by a new element with the given tag
    pub fn new(tag: &str) -> Self {
        Self::build(Element::new(tag), false)
    }

    /// Create a detached component backed by an existing element.
    ///
    /// Fails if another component already owns the element.
    pub fn with_element(element: Element) -> Result<Self, ComponentError> {
        if element.is_owned() {
            return Err(ComponentError::ElementOwned(element.tag()));
        }
        Ok(Self::build(element, false))
    }

    fn build(element: Element, is_ui: bool) -> Self {
        element.claim();
        Self {
            inner: Rc::new(ComponentInner {
                id: ComponentId::next(),
                element,
                bus: EventBus::new(),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                explicitly_disabled: Cell::new(false),
                attached_once: Cell::new(is_ui),
                is_ui,
            }),
        }
    }

    /// Get the component's ID
    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    /// The element backing this component; never changes
    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    /// The component's event bus
    pub fn event_bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// Create a non-owning handle
    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Parent component, if any
    pub fn parent(&self) -> Option<Component> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Component { inner })
    }

    /// Direct children in order
    pub fn children(&self) -> Vec<Component> {
        self.inner.children.borrow().clone()
    }

    /// Whether this component is `other` or one of its ancestors
    pub fn is_ancestor_of(&self, other: &Component) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Root of the tree this component belongs to
    fn root(&self) -> Component {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Whether the component is part of a tree rooted at a [`Ui`]
    pub fn is_attached(&self) -> bool {
        self.root().inner.is_ui
    }

    /// The UI this component is attached to
    pub fn ui(&self) -> Option<Ui> {
        let root = self.root();
        root.inner.is_ui.then(|| Ui::from_root(root))
    }

    /// Append a child, moving it from its previous parent if it has one
    pub fn append(&self, child: &Component) -> Result<(), ComponentError> {
        let index = self.inner.children.borrow().len();
        self.insert(index, child)
    }

    /// Insert a child at `index`, moving it from its previous parent if it has one.
    ///
    /// Attach events fire child-first when the parent is attached.
    pub fn insert(&self, index: usize, child: &Component) -> Result<(), ComponentError> {
        // A UI is the root of every tree it is in
        if child.inner.is_ui || child.is_ancestor_of(self) {
            return Err(ComponentError::CycleDetected {
                parent: self.id(),
                child: child.id(),
            });
        }

        if let Some(old_parent) = child.parent() {
            old_parent.remove(child)?;

            // A detach listener may have placed the child somewhere else
            if child.parent().is_some() {
                log::debug!("{} was moved by a detach listener", child.id());
                return Ok(());
            }
            if child.is_ancestor_of(self) {
                return Err(ComponentError::CycleDetected {
                    parent: self.id(),
                    child: child.id(),
                });
            }
        }

        {
            let mut children = self.inner.children.borrow_mut();
            let index = index.min(children.len());
            children.insert(index, child.clone());
        }
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);

        child.refresh_enabled_subtree();

        if self.is_attached() {
            lifecycle::fire_attach(child);
        }
        Ok(())
    }

    /// Remove a direct child.
    ///
    /// Detach events fire child-first while the child is still linked.
    pub fn remove(&self, child: &Component) -> Result<(), ComponentError> {
        let is_child = child.parent().as_ref() == Some(self);
        if !is_child {
            return Err(ComponentError::NotAChild {
                parent: self.id(),
                child: child.id(),
            });
        }

        if child.is_attached() {
            lifecycle::fire_detach(child);
        }

        // A detach listener may already have moved the child elsewhere
        if child.parent().as_ref() != Some(self) {
            return Ok(());
        }

        self.inner.children.borrow_mut().retain(|c| c != child);
        *child.inner.parent.borrow_mut() = Weak::new();

        child.refresh_enabled_subtree();
        Ok(())
    }

    /// Remove this component from its parent, if it has one
    pub fn remove_from_parent(&self) {
        if let Some(parent) = self.parent() {
            // Only fails if the link changed underneath us
            if let Err(e) = parent.remove(self) {
                log::debug!("Removing {} from parent: {}", self.id(), e);
            }
        }
    }

    /// Register a listener for events of type `E`.
    ///
    /// The listener only receives client-originated events while the
    /// component is enabled.
    pub fn add_listener<E, F>(&self, listener: F) -> Registration
    where
        E: ComponentEvent,
        F: Fn(&E, &mut ListenerContext) + 'static,
    {
        self.add_listener_with_mode(DisabledUpdateMode::OnlyWhenEnabled, listener)
    }

    /// Register a listener with an explicit disabled-update mode
    pub fn add_listener_with_mode<E, F>(&self, mode: DisabledUpdateMode, listener: F) -> Registration
    where
        E: ComponentEvent,
        F: Fn(&E, &mut ListenerContext) + 'static,
    {
        let (registration, first) = self.inner.bus.add::<E, F>(listener, mode);
        if first {
            if let Some(binding) = E::dom_binding() {
                self.add_dom_trigger(binding);
            }
        }
        registration
    }

    /// Register DOM listeners that turn browser events into `E` events
    fn add_dom_trigger<E: ComponentEvent>(&self, binding: DomBinding<E>) {
        let DomBinding {
            descriptor,
            construct,
        } = binding;

        for dom_event in descriptor.dom_events.clone() {
            let source = self.downgrade();
            let handler_descriptor = descriptor.clone();
            let handler = move |event: &DomEvent| -> Result<(), EventError> {
                let Some(source) = source.upgrade() else {
                    return Ok(());
                };
                let args = EventArgs::extract(&handler_descriptor, event)?;
                let typed = construct(&source, &args)?;
                let delivery = Delivery::Client {
                    source_enabled: source.is_enabled(),
                };
                source.inner.bus.dispatch(&typed, delivery);
                Ok(())
            };

            let registration = match self.inner.element.add_event_listener(dom_event, handler) {
                Ok(registration) => registration,
                Err(e) => {
                    log::error!(
                        "Cannot bind {} to DOM event '{}': {}",
                        descriptor.type_name,
                        dom_event,
                        e
                    );
                    continue;
                }
            };

            for spec in &descriptor.data {
                registration.add_event_data(spec.expression);
            }
            registration.set_filter(descriptor.filter);
            if let Some(debounce) = &descriptor.debounce {
                registration.debounce(debounce.clone());
            }

            self.inner
                .bus
                .add_dom_registration(TypeId::of::<E>(), dom_event, registration);
        }
    }

    /// Fire an event created on the server to every listener for its type
    pub fn fire_event<E: ComponentEvent>(&self, event: &E) {
        self.inner.bus.dispatch(event, Delivery::Server);
    }

    /// Names of the event types currently bound to a DOM event name
    pub fn event_types_for(&self, dom_event: &str) -> Vec<&'static str> {
        self.inner.bus.event_types_for(dom_event)
    }

    /// Deliver a browser DOM event to the element listeners for its name.
    ///
    /// Listeners are skipped when the component is disabled and they do not
    /// allow updates while disabled, or when their filter did not match on
    /// the client. The first listener error is returned.
    pub fn handle_dom_event(&self, event: &DomEvent) -> Result<(), EventError> {
        let listeners = self.inner.element.listeners_for(event.event_type());
        if listeners.is_empty() {
            log::debug!(
                "No listener for DOM event '{}' on {}",
                event.event_type(),
                self.id()
            );
            return Ok(());
        }

        let enabled = self.is_enabled();
        for listener in listeners {
            if !listener.is_active() {
                continue;
            }
            if !enabled && !listener.mode().allows_disabled() {
                log::debug!(
                    "Dropping DOM event '{}' for disabled {}",
                    event.event_type(),
                    self.id()
                );
                continue;
            }
            if let Some(filter) = listener.filter() {
                if !event.filter_matches(&filter) {
                    continue;
                }
            }
            listener.invoke(event)?;
        }
        Ok(())
    }

    /// Apply a property value sent by the client.
    ///
    /// Returns whether the value was applied: the property must be
    /// synchronized, and a disabled component only accepts it when the merged
    /// mode of its synchronizations allows it.
    pub fn update_property_from_client(&self, property: &str, value: Value) -> bool {
        let Some(mode) = self.inner.element.synchronized_property_mode(property) else {
            log::warn!(
                "Ignoring client update of non-synchronized property '{}' on {}",
                property,
                self.id()
            );
            return false;
        };

        if !self.is_enabled() && !mode.allows_disabled() {
            log::debug!(
                "Ignoring client update of '{}' for disabled {}",
                property,
                self.id()
            );
            return false;
        }

        self.inner.element.set_property(property, value);
        true
    }

    /// Register a listener for attach events
    pub fn add_attach_listener(
        &self,
        listener: impl Fn(&AttachEvent, &mut ListenerContext) + 'static,
    ) -> Registration {
        self.add_listener(listener)
    }

    /// Register a listener for detach events
    pub fn add_detach_listener(
        &self,
        listener: impl Fn(&DetachEvent, &mut ListenerContext) + 'static,
    ) -> Registration {
        self.add_listener(listener)
    }
}
