//! Enabled state of components
//!
//! Each component only stores whether it was explicitly disabled. The
//! effective state is computed on query by walking the ancestor chain, so a
//! component disabled only through an ancestor becomes enabled again as soon
//! as it leaves that ancestor's subtree.

use crate::component::Component;

/// Attribute mirroring the effective disabled state on the element
const DISABLED_ATTRIBUTE: &str = "disabled";

impl Component {
    /// Explicitly enable or disable this component.
    ///
    /// Disabling also disables every descendant; enabling only takes effect
    /// if no ancestor is disabled.
    pub fn set_enabled(&self, enabled: bool) {
        let was_disabled = self.inner.explicitly_disabled.replace(!enabled);
        if was_disabled == !enabled {
            return;
        }
        log::debug!(
            "{} {}",
            self.id(),
            if enabled { "enabled" } else { "disabled" }
        );
        self.refresh_enabled_subtree();
    }

    /// Whether this component and all of its ancestors are enabled
    pub fn is_enabled(&self) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.inner.explicitly_disabled.get() {
                return false;
            }
            current = node.parent();
        }
        true
    }

    /// Whether this component itself was disabled, regardless of ancestors
    pub fn is_explicitly_disabled(&self) -> bool {
        self.inner.explicitly_disabled.get()
    }

    /// Update the `disabled` attribute of this component and its descendants
    pub(crate) fn refresh_enabled_subtree(&self) {
        let parent_enabled = self.parent().map_or(true, |parent| parent.is_enabled());
        self.refresh_enabled_from(parent_enabled);
    }

    fn refresh_enabled_from(&self, parent_chain_enabled: bool) {
        let enabled = parent_chain_enabled && !self.inner.explicitly_disabled.get();
        self.element()
            .set_boolean_attribute(DISABLED_ATTRIBUTE, !enabled);
        for child in self.children() {
            child.refresh_enabled_from(enabled);
        }
    }
}
