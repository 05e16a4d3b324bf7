//! Event system for the Tether component model
//!
//! The event system provides:
//! - A per-component event bus with insertion-ordered, snapshot-based dispatch
//! - Idempotent registration handles for every listener
//! - Declarative DOM metadata used to rebuild typed events from browser events
//! - Keys, modifiers and keyboard listeners filtered by key
//! - Shortcuts tied to the lifecycle of an owner component

pub mod bus;
pub mod error;
pub mod event;
pub mod key;
pub mod key_listener;
pub mod metadata;
pub mod registration;
pub mod shortcut;
pub mod types;

pub use bus::{EventBus, ListenerContext};
pub use error::EventError;
pub use event::ComponentEvent;
pub use key::{Key, KeyLocation, KeyModifier};
pub use key_listener::KeyEventListener;
pub use metadata::{
    DomBinding, EventArgs, EventConstructor, EventDataSpec, EventDescriptor, EventValue, ParamType,
};
pub use registration::Registration;
pub use shortcut::{ShortcutActions, ShortcutEvent, ShortcutRegistration, Shortcuts};
pub use types::{
    BlurEvent, ClickEvent, FocusEvent, KeyDownEvent, KeyPressEvent, KeyUpEvent, KeyboardEvent,
    KeyboardState,
};
