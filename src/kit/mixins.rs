//! Capability mixins
//!
//! Each mixin adds one standard web-platform behavior to any type backed by a
//! component. The behavior is provided entirely by default methods, so opting
//! in is an empty `impl`:
//!
//! ```ignore
//! impl ClickNotifier for MyWidget {}
//! ```
//!
//! The `AsComponent` supertrait is the only requirement; a type that is not
//! backed by a component cannot implement a mixin at all.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::component::{AsComponent, AttachEvent, DetachEvent};
use crate::events::{
    BlurEvent, ClickEvent, FocusEvent, Key, KeyDownEvent, KeyEventListener, KeyModifier,
    KeyPressEvent, KeyUpEvent, ListenerContext, Registration, ShortcutActions,
    ShortcutRegistration,
};

/// Notified when the component is attached to a UI
pub trait AttachNotifier: AsComponent {
    /// Add a listener for attach events
    fn add_attach_listener(
        &self,
        listener: impl Fn(&AttachEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }
}

/// Notified when the component is detached from a UI
pub trait DetachNotifier: AsComponent {
    /// Add a listener for detach events
    fn add_detach_listener(
        &self,
        listener: impl Fn(&DetachEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }
}

/// Notified when the component gains focus
pub trait FocusNotifier: AsComponent {
    fn add_focus_listener(
        &self,
        listener: impl Fn(&FocusEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }
}

/// Notified when the component loses focus
pub trait BlurNotifier: AsComponent {
    fn add_blur_listener(
        &self,
        listener: impl Fn(&BlurEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }
}

/// Can be enabled and disabled
pub trait HasEnabled: AsComponent {
    /// Enable or disable the component and, implicitly, its descendants
    fn set_enabled(&self, enabled: bool) {
        self.as_component().set_enabled(enabled);
    }

    /// Whether the component and all its ancestors are enabled
    fn is_enabled(&self) -> bool {
        self.as_component().is_enabled()
    }
}

/// Can receive keyboard focus
pub trait Focusable: FocusNotifier + BlurNotifier + HasEnabled {
    /// Request focus on the client
    fn focus(&self) {
        self.as_component()
            .element()
            .call_js_function("focus", Vec::new());
    }

    /// Remove focus on the client
    fn blur(&self) {
        self.as_component()
            .element()
            .call_js_function("blur", Vec::new());
    }

    /// Set the tab order position; -1 removes the component from tab navigation
    fn set_tab_index(&self, index: i32) {
        self.as_component()
            .element()
            .set_attribute("tabindex", index.to_string());
    }

    /// Tab order position, if set
    fn tab_index(&self) -> Option<i32> {
        self.as_component()
            .element()
            .attribute("tabindex")
            .and_then(|value| value.parse().ok())
    }

    /// Focus the component when `key` is pressed with exactly `modifiers`
    fn add_focus_shortcut(
        &self,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
    ) -> crate::Result<ShortcutRegistration>
    where
        Self: Sized,
    {
        let registration = ShortcutActions::focus(self.as_component(), key)?;
        registration.with_modifiers(modifiers);
        Ok(registration)
    }
}

/// Notified when the component is clicked
pub trait ClickNotifier: AsComponent {
    fn add_click_listener(
        &self,
        listener: impl Fn(&ClickEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }

    /// Click the component when `key` is pressed with exactly `modifiers`
    fn add_click_shortcut(
        &self,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
    ) -> crate::Result<ShortcutRegistration>
    where
        Self: Sized,
    {
        let registration = ShortcutActions::click(self.as_component(), key)?;
        registration.with_modifiers(modifiers);
        Ok(registration)
    }
}

/// Notified about key presses while the component has focus.
///
/// The plain variants receive every key event; the `_for` variants only
/// receive events for one key with exactly the given modifiers.
pub trait KeyNotifier: AsComponent {
    fn add_key_down_listener(
        &self,
        listener: impl Fn(&KeyDownEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }

    fn add_key_down_listener_for(
        &self,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
        listener: impl Fn(&KeyDownEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        let filtered = KeyEventListener::new(key, modifiers, listener);
        self.as_component().add_listener(filtered.into_listener())
    }

    fn add_key_press_listener(
        &self,
        listener: impl Fn(&KeyPressEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }

    fn add_key_press_listener_for(
        &self,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
        listener: impl Fn(&KeyPressEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        let filtered = KeyEventListener::new(key, modifiers, listener);
        self.as_component().add_listener(filtered.into_listener())
    }

    fn add_key_up_listener(
        &self,
        listener: impl Fn(&KeyUpEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        self.as_component().add_listener(listener)
    }

    fn add_key_up_listener_for(
        &self,
        key: Key,
        modifiers: impl IntoIterator<Item = KeyModifier>,
        listener: impl Fn(&KeyUpEvent, &mut ListenerContext) + 'static,
    ) -> Registration
    where
        Self: Sized,
    {
        let filtered = KeyEventListener::new(key, modifiers, listener);
        self.as_component().add_listener(filtered.into_listener())
    }
}

/// Has a list of CSS class names
pub trait HasStyle: AsComponent {
    fn add_class_name(&self, class_name: &str) {
        self.as_component().element().add_class_name(class_name);
    }

    fn remove_class_name(&self, class_name: &str) -> bool {
        self.as_component().element().remove_class_name(class_name)
    }

    /// Add or remove a class name
    fn set_class_name(&self, class_name: &str, set: bool) {
        if set {
            self.add_class_name(class_name);
        } else {
            self.remove_class_name(class_name);
        }
    }

    fn has_class_name(&self, class_name: &str) -> bool {
        self.as_component().element().has_class_name(class_name)
    }

    /// Replace all class names with the whitespace-separated names in `class_names`
    fn set_class_names(&self, class_names: &str) {
        let element = self.as_component().element();
        element.clear_class_names();
        for class_name in class_names.split_whitespace() {
            element.add_class_name(class_name);
        }
    }

    fn class_names(&self) -> BTreeSet<String> {
        self.as_component()
            .element()
            .class_names()
            .into_iter()
            .collect()
    }
}

/// Has an accessible label
pub trait HasAriaLabel: AsComponent {
    /// Set the label, or remove it with `None`
    fn set_aria_label(&self, label: Option<&str>) {
        let element = self.as_component().element();
        match label {
            Some(label) => element.set_attribute("aria-label", label),
            None => {
                element.remove_attribute("aria-label");
            }
        }
    }

    fn aria_label(&self) -> Option<String> {
        self.as_component().element().attribute("aria-label")
    }
}

/// Has text content
pub trait HasText: AsComponent {
    fn set_text(&self, text: &str) {
        self.as_component().element().set_text(text);
    }

    fn text(&self) -> String {
        self.as_component().element().text()
    }
}

/// Has a placeholder shown while empty
pub trait HasPlaceholder: AsComponent {
    fn set_placeholder(&self, placeholder: &str) {
        self.as_component()
            .element()
            .set_property("placeholder", placeholder);
    }

    fn placeholder(&self) -> Option<String> {
        match self.as_component().element().property("placeholder") {
            Some(Value::String(placeholder)) => Some(placeholder),
            _ => None,
        }
    }
}
