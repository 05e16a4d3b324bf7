// Button component for Tether Kit

use crate::component::{AsComponent, Component};
use crate::kit::mixins::{
    AttachNotifier, BlurNotifier, ClickNotifier, DetachNotifier, FocusNotifier, Focusable,
    HasAriaLabel, HasEnabled, HasStyle, HasText, KeyNotifier,
};

/// Button style variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Link,
}

impl ButtonVariant {
    fn class_name(self) -> &'static str {
        match self {
            Self::Primary => "button-primary",
            Self::Secondary => "button-secondary",
            Self::Outline => "button-outline",
            Self::Ghost => "button-ghost",
            Self::Link => "button-link",
        }
    }
}

/// Button backed by a `<button>` element
///
/// # Examples
///
/// ```
/// use tether::prelude::*;
/// use tether::kit::components::Button;
///
/// let button = Button::new("Save");
/// button.add_click_listener(|_, _| println!("Saved"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    component: Component,
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Button {
    /// Create a button with the given text
    pub fn new(text: &str) -> Self {
        let button = Self {
            component: Component::new("button"),
        };
        button.set_text(text);
        button.set_variant(ButtonVariant::default());
        button
    }

    /// Set the visual variant
    pub fn set_variant(&self, variant: ButtonVariant) {
        let element = self.component.element();
        for class_name in element.class_names() {
            if class_name.starts_with("button-") {
                element.remove_class_name(&class_name);
            }
        }
        element.add_class_name(variant.class_name());
    }
}

impl AsComponent for Button {
    fn as_component(&self) -> &Component {
        &self.component
    }
}

impl AttachNotifier for Button {}
impl DetachNotifier for Button {}
impl FocusNotifier for Button {}
impl BlurNotifier for Button {}
impl HasEnabled for Button {}
impl Focusable for Button {}
impl ClickNotifier for Button {}
impl KeyNotifier for Button {}
impl HasStyle for Button {}
impl HasText for Button {}
impl HasAriaLabel for Button {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_defaults() {
        let button = Button::new("OK");
        assert_eq!(button.text(), "OK");
        assert_eq!(button.as_component().element().tag(), "button");
        assert!(button.has_class_name("button-primary"));
        assert!(button.is_enabled());
    }

    #[test]
    fn test_variant_replaces_previous() {
        let button = Button::new("OK");
        button.add_class_name("wide");
        button.set_variant(ButtonVariant::Ghost);
        assert!(button.has_class_name("button-ghost"));
        assert!(!button.has_class_name("button-primary"));
        assert!(button.has_class_name("wide"));
    }
}
