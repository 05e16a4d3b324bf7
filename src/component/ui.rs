//! The UI root

use std::cell::RefCell;

use crate::component::{AsComponent, Component, ComponentError};
use crate::dom::Element;

thread_local! {
    static CURRENT_UI: RefCell<Option<Ui>> = const { RefCell::new(None) };
}

/// Root of an attached component tree.
///
/// A component counts as attached while its tree is rooted at a `Ui`. The UI
/// itself is always attached and can never be added as a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ui {
    root: Component,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    /// Create a new UI backed by a `body` element
    pub fn new() -> Self {
        Self {
            root: Component::build(Element::new("body"), true),
        }
    }

    pub(crate) fn from_root(root: Component) -> Self {
        Self { root }
    }

    /// Attach components to the UI, in order
    pub fn add(&self, components: &[&dyn AsComponent]) -> Result<(), ComponentError> {
        for component in components {
            self.root.append(component.as_component())?;
        }
        Ok(())
    }

    /// Detach a component from the UI
    pub fn remove(&self, component: &dyn AsComponent) -> Result<(), ComponentError> {
        self.root.remove(component.as_component())
    }

    /// The UI that is current on this thread
    pub fn current() -> Option<Ui> {
        CURRENT_UI.with(|current| current.borrow().clone())
    }

    /// Make `ui` the current UI of this thread, returning the previous one
    pub fn set_current(ui: Option<Ui>) -> Option<Ui> {
        CURRENT_UI.with(|current| current.replace(ui))
    }

    /// The current UI, or an error if none is set
    pub fn require_current() -> Result<Ui, ComponentError> {
        Self::current().ok_or(ComponentError::NoCurrentUi)
    }
}

impl AsComponent for Ui {
    fn as_component(&self) -> &Component {
        &self.root
    }
}
