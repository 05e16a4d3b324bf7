//! Error types for component operations

use crate::component::ComponentId;

/// Errors that can occur during component operations
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Adding the child would make a component its own ancestor
    #[error("Cannot add {child} to {parent}: it would create a cycle")]
    CycleDetected {
        parent: ComponentId,
        child: ComponentId,
    },

    /// The element already backs another component
    #[error("Element <{0}> already belongs to a component")]
    ElementOwned(String),

    /// The component is not a direct child of the given parent
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        parent: ComponentId,
        child: ComponentId,
    },

    /// A capability method was used on a type that does not provide the
    /// capability it needs
    #[error("{type_name} must implement {required} to use {method}")]
    CapabilityMisuse {
        type_name: &'static str,
        required: &'static str,
        method: &'static str,
    },

    /// A provider is already registered for the tag
    #[error("A component is already registered for tag '{0}'")]
    DuplicateTag(String),

    /// No provider is registered for the tag
    #[error("No component is registered for tag '{0}'")]
    UnknownTag(String),

    /// The tag is not a valid custom element name
    #[error("'{0}' is not a valid custom element name")]
    InvalidTag(String),

    /// No UI is current on this thread
    #[error("No UI is available on the current thread")]
    NoCurrentUi,
}
