// Core module of the Tether component framework
pub mod component;
pub mod dom;
pub mod events;

pub mod kit;

/// Version of the Tether framework
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::component::{
        AsComponent, AttachEvent, Component, ComponentError, ComponentRegistry, DetachEvent, Ui,
        WeakComponent,
    };
    pub use crate::dom::{DebounceSettings, DisabledUpdateMode, DomEvent, Element};
    pub use crate::events::{
        BlurEvent, ClickEvent, ComponentEvent, EventError, FocusEvent, Key, KeyDownEvent,
        KeyEventListener, KeyModifier, KeyPressEvent, KeyUpEvent, KeyboardEvent, ListenerContext,
        Registration, ShortcutActions, ShortcutEvent, ShortcutRegistration, Shortcuts,
    };
    pub use crate::kit::mixins::*;
    pub use crate::{Error, Result};
}

/// Result type used by the crate-level entry points
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Tether framework
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Component error: {0}")]
    Component(#[from] component::ComponentError),

    #[error("Event error: {0}")]
    Event(#[from] events::EventError),
}
