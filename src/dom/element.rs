//! In-memory element backing a component
//!
//! The element stores what the client-side tree needs to know about one node:
//! attributes, properties, classes, text, pending client function calls and
//! the DOM listeners the server is interested in. Synchronizing this state to
//! a browser is out of scope here.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde_json::{json, Value};

use crate::dom::{DebounceSettings, DisabledUpdateMode, DomEvent};
use crate::events::{EventError, Registration};

/// Handler invoked for a DOM event delivered to an element
pub type DomEventHandler = Box<dyn Fn(&DomEvent) -> Result<(), EventError>>;

/// A client-side function call queued for the element, e.g. `focus()`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsInvocation {
    /// Function name on the element
    pub function: String,
    /// Arguments to pass
    pub arguments: Vec<Value>,
}

/// Client-facing configuration of a DOM listener
#[derive(Debug, Clone, Default, Serialize)]
struct ListenerConfig {
    event_data: Vec<String>,
    filter: Option<String>,
    debounce: Vec<DebounceSettings>,
    mode: DisabledUpdateMode,
}

/// A DOM listener stored on an element
pub(crate) struct DomListener {
    event_type: String,
    handler: DomEventHandler,
    config: RefCell<ListenerConfig>,
    active: Cell<bool>,
}

impl DomListener {
    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn mode(&self) -> DisabledUpdateMode {
        self.config.borrow().mode
    }

    pub(crate) fn filter(&self) -> Option<String> {
        self.config.borrow().filter.clone()
    }

    pub(crate) fn invoke(&self, event: &DomEvent) -> Result<(), EventError> {
        (self.handler)(event)
    }
}

/// A property the client is allowed to update
#[derive(Debug)]
struct PropertySync {
    id: u64,
    dom_event: String,
    mode: DisabledUpdateMode,
}

#[derive(Default)]
struct ElementState {
    tag: String,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Value>,
    classes: Vec<String>,
    text: String,
    listeners: Vec<Rc<DomListener>>,
    synchronized: BTreeMap<String, Vec<PropertySync>>,
    invocations: Vec<JsInvocation>,
    next_sync_id: u64,
    owned: bool,
}

/// Element owned by exactly one component
#[derive(Clone)]
pub struct Element {
    state: Rc<RefCell<ElementState>>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Element")
            .field("tag", &state.tag)
            .field("attributes", &state.attributes)
            .field("listeners", &format!("[{} listeners]", state.listeners.len()))
            .finish()
    }
}

impl Element {
    /// Create an element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ElementState {
                tag: tag.into(),
                ..ElementState::default()
            })),
        }
    }

    /// Mark the element as owned by a component
    pub(crate) fn claim(&self) {
        self.state.borrow_mut().owned = true;
    }

    /// Whether a component already owns this element
    pub fn is_owned(&self) -> bool {
        self.state.borrow().owned
    }

    /// Tag name of the element
    pub fn tag(&self) -> String {
        self.state.borrow().tag.clone()
    }

    /// Set an attribute value
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.into());
    }

    /// Set or remove a boolean attribute
    pub fn set_boolean_attribute(&self, name: &str, present: bool) {
        if present {
            self.set_attribute(name, "");
        } else {
            self.remove_attribute(name);
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.state.borrow_mut().attributes.remove(name)
    }

    /// Get an attribute value
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    /// Check whether an attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.state.borrow().attributes.contains_key(name)
    }

    /// Set a property value
    pub fn set_property(&self, name: &str, value: impl Into<Value>) {
        self.state
            .borrow_mut()
            .properties
            .insert(name.to_string(), value.into());
    }

    /// Get a property value
    pub fn property(&self, name: &str) -> Option<Value> {
        self.state.borrow().properties.get(name).cloned()
    }

    /// Remove a property, returning its previous value
    pub fn remove_property(&self, name: &str) -> Option<Value> {
        self.state.borrow_mut().properties.remove(name)
    }

    /// Add a class name; returns false if it was already present
    pub fn add_class_name(&self, class_name: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if state.classes.iter().any(|c| c == class_name) {
            return false;
        }
        state.classes.push(class_name.to_string());
        true
    }

    /// Remove a class name; returns false if it was not present
    pub fn remove_class_name(&self, class_name: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.classes.len();
        state.classes.retain(|c| c != class_name);
        state.classes.len() != before
    }

    /// Check whether a class name is present
    pub fn has_class_name(&self, class_name: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class_name)
    }

    /// Class names in insertion order
    pub fn class_names(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    /// Remove all class names
    pub fn clear_class_names(&self) {
        self.state.borrow_mut().classes.clear();
    }

    /// Replace the text content
    pub fn set_text(&self, text: impl Into<String>) {
        self.state.borrow_mut().text = text.into();
    }

    /// Text content
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Queue a function call to run on the client-side element
    pub fn call_js_function(&self, function: &str, arguments: Vec<Value>) {
        self.state.borrow_mut().invocations.push(JsInvocation {
            function: function.to_string(),
            arguments,
        });
    }

    /// Take the queued client function calls
    pub fn take_invocations(&self) -> Vec<JsInvocation> {
        std::mem::take(&mut self.state.borrow_mut().invocations)
    }

    /// Register a listener for a DOM event name
    pub fn add_event_listener(
        &self,
        event_type: &str,
        handler: impl Fn(&DomEvent) -> Result<(), EventError> + 'static,
    ) -> Result<DomListenerRegistration, EventError> {
        if event_type.is_empty() {
            return Err(EventError::InvalidArgument(
                "The DOM event type cannot be empty".to_string(),
            ));
        }

        let listener = Rc::new(DomListener {
            event_type: event_type.to_string(),
            handler: Box::new(handler),
            config: RefCell::new(ListenerConfig::default()),
            active: Cell::new(true),
        });
        self.state.borrow_mut().listeners.push(listener.clone());

        Ok(DomListenerRegistration {
            listener,
            element: Rc::downgrade(&self.state),
        })
    }

    /// Snapshot of the active listeners for an event name, in registration order
    pub(crate) fn listeners_for(&self, event_type: &str) -> Vec<Rc<DomListener>> {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Number of listeners registered for an event name
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }

    /// Allow the client to update `property` when `dom_event` fires.
    ///
    /// Several synchronizations of the same property merge to the most
    /// permissive mode.
    pub fn synchronize_property(
        &self,
        property: &str,
        dom_event: &str,
        mode: DisabledUpdateMode,
    ) -> Registration {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_sync_id;
            state.next_sync_id += 1;
            state
                .synchronized
                .entry(property.to_string())
                .or_default()
                .push(PropertySync {
                    id,
                    dom_event: dom_event.to_string(),
                    mode,
                });
            id
        };

        let element = Rc::downgrade(&self.state);
        let property = property.to_string();
        Registration::new(move || {
            let Some(element) = element.upgrade() else {
                return;
            };
            let mut state = element.borrow_mut();
            if let Some(syncs) = state.synchronized.get_mut(&property) {
                syncs.retain(|s| s.id != id);
                if syncs.is_empty() {
                    state.synchronized.remove(&property);
                }
            }
        })
    }

    /// Effective mode for a synchronized property, `None` if not synchronized
    pub fn synchronized_property_mode(&self, property: &str) -> Option<DisabledUpdateMode> {
        let state = self.state.borrow();
        let syncs = state.synchronized.get(property)?;
        DisabledUpdateMode::merge(syncs.iter().map(|s| s.mode))
    }

    /// DOM events that carry updates for a synchronized property
    pub fn synchronized_property_events(&self, property: &str) -> Vec<String> {
        let state = self.state.borrow();
        let mut events: Vec<String> = state
            .synchronized
            .get(property)
            .map(|syncs| syncs.iter().map(|s| s.dom_event.clone()).collect())
            .unwrap_or_default();
        events.dedup();
        events
    }

    /// Render the element state as JSON
    pub fn snapshot(&self) -> Value {
        let state = self.state.borrow();
        let listeners: Vec<Value> = state
            .listeners
            .iter()
            .map(|l| {
                json!({
                    "type": l.event_type,
                    "config": serde_json::to_value(&*l.config.borrow()).unwrap_or(Value::Null),
                })
            })
            .collect();

        json!({
            "tag": state.tag,
            "attributes": state.attributes,
            "properties": state.properties,
            "classes": state.classes,
            "text": state.text,
            "listeners": listeners,
        })
    }
}

/// Handle for a DOM listener registered on an element.
///
/// Configuration methods return the handle so calls can be chained.
#[derive(Clone)]
pub struct DomListenerRegistration {
    listener: Rc<DomListener>,
    element: Weak<RefCell<ElementState>>,
}

impl fmt::Debug for DomListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomListenerRegistration")
            .field("event_type", &self.listener.event_type)
            .field("config", &*self.listener.config.borrow())
            .field("active", &self.listener.is_active())
            .finish()
    }
}

impl DomListenerRegistration {
    /// Request the client to send the value of `expression` with the event
    pub fn add_event_data(&self, expression: &str) -> &Self {
        let mut config = self.listener.config.borrow_mut();
        if !config.event_data.iter().any(|e| e == expression) {
            config.event_data.push(expression.to_string());
        }
        self
    }

    /// Only deliver events for which the client evaluates `filter` to true
    pub fn set_filter(&self, filter: Option<&str>) -> &Self {
        self.listener.config.borrow_mut().filter = filter.map(str::to_string);
        self
    }

    /// Add debounce settings; identical settings are kept once
    pub fn debounce(&self, settings: DebounceSettings) -> &Self {
        let mut config = self.listener.config.borrow_mut();
        if !config.debounce.contains(&settings) {
            config.debounce.push(settings);
        }
        self
    }

    /// Set whether events are delivered while the component is disabled
    pub fn set_disabled_update_mode(&self, mode: DisabledUpdateMode) -> &Self {
        self.listener.config.borrow_mut().mode = mode;
        self
    }

    /// DOM event name
    pub fn event_type(&self) -> &str {
        &self.listener.event_type
    }

    /// Requested event data expressions
    pub fn event_data(&self) -> Vec<String> {
        self.listener.config.borrow().event_data.clone()
    }

    /// Filter expression
    pub fn filter(&self) -> Option<String> {
        self.listener.filter()
    }

    /// Configured debounce settings
    pub fn debounce_settings(&self) -> Vec<DebounceSettings> {
        self.listener.config.borrow().debounce.clone()
    }

    /// Current disabled-update mode
    pub fn disabled_update_mode(&self) -> DisabledUpdateMode {
        self.listener.mode()
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.listener.is_active()
    }

    /// Unregister the listener; repeated calls do nothing
    pub fn remove(&self) {
        if !self.listener.active.replace(false) {
            return;
        }
        if let Some(element) = self.element.upgrade() {
            element
                .borrow_mut()
                .listeners
                .retain(|l| !Rc::ptr_eq(l, &self.listener));
        }
    }
}

impl From<DomListenerRegistration> for Registration {
    fn from(registration: DomListenerRegistration) -> Self {
        Registration::new(move || registration.remove())
    }
}
