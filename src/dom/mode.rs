//! Disabled-update modes for client-originated updates

use serde::{Deserialize, Serialize};

/// Controls whether client-originated updates reach a disabled component.
///
/// Variants are ordered from least to most permissive so that several
/// registrations touching the same event or property can be merged with
/// [`DisabledUpdateMode::most_permissive`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisabledUpdateMode {
    /// Updates are only delivered while the component is enabled
    #[default]
    OnlyWhenEnabled,
    /// Updates are delivered regardless of the enabled state
    Always,
}

impl DisabledUpdateMode {
    /// Merge two modes, keeping the more permissive one
    pub fn most_permissive(self, other: Self) -> Self {
        self.max(other)
    }

    /// Merge any number of modes; `None` when there is nothing to merge
    pub fn merge(modes: impl IntoIterator<Item = Self>) -> Option<Self> {
        modes.into_iter().reduce(Self::most_permissive)
    }

    /// Whether this mode lets updates through to a disabled component
    pub fn allows_disabled(self) -> bool {
        self == Self::Always
    }
}
