// Input component for Tether Kit

use serde_json::Value;

use crate::component::{AsComponent, Component};
use crate::dom::DisabledUpdateMode;
use crate::events::Registration;
use crate::kit::mixins::{
    AttachNotifier, BlurNotifier, DetachNotifier, FocusNotifier, Focusable, HasAriaLabel,
    HasEnabled, HasPlaceholder, HasStyle, KeyNotifier,
};

/// Text input backed by an `<input>` element.
///
/// The `value` property is updated by the client on `change`, but only while
/// the input is enabled.
#[derive(Debug, Clone)]
pub struct Input {
    component: Component,
    value_sync: Registration,
}

impl PartialEq for Input {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new("text")
    }
}

impl Input {
    /// Create an input of the given type (text, password, email, etc.)
    pub fn new(input_type: &str) -> Self {
        let component = Component::new("input");
        component.element().set_attribute("type", input_type);
        let value_sync = component.element().synchronize_property(
            "value",
            "change",
            DisabledUpdateMode::OnlyWhenEnabled,
        );
        Self {
            component,
            value_sync,
        }
    }

    /// Input type
    pub fn input_type(&self) -> String {
        self.component
            .element()
            .attribute("type")
            .unwrap_or_else(|| "text".to_string())
    }

    /// Current value
    pub fn value(&self) -> String {
        match self.component.element().property("value") {
            Some(Value::String(value)) => value,
            _ => String::new(),
        }
    }

    /// Set the value from the server
    pub fn set_value(&self, value: &str) {
        self.component.element().set_property("value", value);
    }

    /// Mark the input as required
    pub fn set_required(&self, required: bool) {
        self.component
            .element()
            .set_boolean_attribute("required", required);
    }

    /// Whether the input is required
    pub fn is_required(&self) -> bool {
        self.component.element().has_attribute("required")
    }

    /// Also accept value updates while disabled, e.g. for read-only mirrors
    pub fn accept_value_while_disabled(&self) -> Registration {
        self.component
            .element()
            .synchronize_property("value", "change", DisabledUpdateMode::Always)
    }

    /// Stop accepting value updates from the client
    pub fn stop_value_sync(&self) {
        self.value_sync.remove();
    }
}

impl AsComponent for Input {
    fn as_component(&self) -> &Component {
        &self.component
    }
}

impl AttachNotifier for Input {}
impl DetachNotifier for Input {}
impl FocusNotifier for Input {}
impl BlurNotifier for Input {}
impl HasEnabled for Input {}
impl Focusable for Input {}
impl KeyNotifier for Input {}
impl HasStyle for Input {}
impl HasAriaLabel for Input {}
impl HasPlaceholder for Input {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_sync_respects_enabled_state() {
        let input = Input::new("email");
        assert_eq!(input.input_type(), "email");

        assert!(input
            .as_component()
            .update_property_from_client("value", json!("a@b.c")));
        assert_eq!(input.value(), "a@b.c");

        input.set_enabled(false);
        assert!(!input
            .as_component()
            .update_property_from_client("value", json!("evil")));
        assert_eq!(input.value(), "a@b.c");

        let _always = input.accept_value_while_disabled();
        assert!(input
            .as_component()
            .update_property_from_client("value", json!("mirror")));
        assert_eq!(input.value(), "mirror");
    }

    #[test]
    fn test_unsynchronized_value_is_rejected() {
        let input = Input::default();
        input.stop_value_sync();
        assert!(!input
            .as_component()
            .update_property_from_client("value", json!("x")));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_placeholder_and_required() {
        let input = Input::default();
        input.set_placeholder("Name");
        input.set_required(true);
        assert_eq!(input.placeholder().as_deref(), Some("Name"));
        assert!(input.is_required());
    }
}
