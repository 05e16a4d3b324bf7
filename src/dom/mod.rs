//! Element layer consumed by components
//!
//! - [`Element`]: attribute/property/class storage plus DOM listener registry
//! - [`DomEvent`]: a browser occurrence with its evaluated event data
//! - [`DisabledUpdateMode`]: how client updates interact with disabled state
//! - [`DebounceSettings`]: declarative client-side debounce configuration

pub mod debounce;
pub mod element;
pub mod event;
pub mod mode;

pub use debounce::{DebouncePhase, DebounceSettings};
pub use element::{DomEventHandler, DomListenerRegistration, Element, JsInvocation};
pub use event::DomEvent;
pub use mode::DisabledUpdateMode;
