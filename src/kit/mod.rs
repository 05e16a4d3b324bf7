// Tether Kit: capability mixins and ready-made components

pub mod components;
pub mod mixins;

/// Re-export of common components for convenience
pub mod prelude {
    pub use crate::kit::components::button::{Button, ButtonVariant};
    pub use crate::kit::components::input::Input;
    pub use crate::kit::components::layout::{Direction, Layout};
    pub use crate::kit::mixins::*;
}
