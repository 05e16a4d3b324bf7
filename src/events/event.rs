//! Component event trait for the Tether events system

use std::any::Any;

use crate::component::Component;
use crate::events::DomBinding;

/// An event fired by a component.
///
/// Events are immutable values. The source is the component the event is
/// fired on; `is_from_client` tells whether the event was reconstructed from a
/// browser occurrence or created on the server.
pub trait ComponentEvent: Any {
    /// Component the event originated from
    fn source(&self) -> &Component;

    /// Whether the event was reconstructed from a client DOM event
    fn is_from_client(&self) -> bool;

    /// DOM binding, for event types synthesized from browser events.
    ///
    /// The binding is consulted the first time a listener for the type is
    /// added to a component; server-only events keep the default.
    fn dom_binding() -> Option<DomBinding<Self>>
    where
        Self: Sized,
    {
        None
    }
}

/// Implement [`ComponentEvent`] for a struct with `source` and `from_client` fields
macro_rules! component_event {
    ($name:ty) => {
        impl $crate::events::ComponentEvent for $name {
            fn source(&self) -> &$crate::component::Component {
                &self.source
            }

            fn is_from_client(&self) -> bool {
                self.from_client
            }
        }
    };
    ($name:ty, $binding:expr) => {
        impl $crate::events::ComponentEvent for $name {
            fn source(&self) -> &$crate::component::Component {
                &self.source
            }

            fn is_from_client(&self) -> bool {
                self.from_client
            }

            fn dom_binding() -> Option<$crate::events::DomBinding<Self>> {
                Some($binding)
            }
        }
    };
}

pub(crate) use component_event;
