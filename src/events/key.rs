//! Keyboard keys, modifiers and key locations
//!
//! A [`Key`] is a set of equivalent names, since browsers report some keys
//! under legacy spellings (`Esc` for `Escape`, `Up` for `ArrowUp`). Matching
//! compares against every alias; single-character names compare without
//! regard to case so that `a` also matches the `A` reported while Shift is
//! held.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Clone)]
enum KeyNames {
    Static(&'static [&'static str]),
    Owned(Vec<String>),
}

/// A keyboard key identified by one or more equivalent names
#[derive(Clone)]
pub struct Key {
    names: KeyNames,
}

impl Key {
    pub const ENTER: Key = Key::from_static(&["Enter"]);
    pub const ESCAPE: Key = Key::from_static(&["Escape", "Esc"]);
    pub const TAB: Key = Key::from_static(&["Tab"]);
    pub const SPACE: Key = Key::from_static(&[" ", "Spacebar"]);
    pub const BACKSPACE: Key = Key::from_static(&["Backspace"]);
    pub const DELETE: Key = Key::from_static(&["Delete", "Del"]);
    pub const INSERT: Key = Key::from_static(&["Insert"]);
    pub const ARROW_UP: Key = Key::from_static(&["ArrowUp", "Up"]);
    pub const ARROW_DOWN: Key = Key::from_static(&["ArrowDown", "Down"]);
    pub const ARROW_LEFT: Key = Key::from_static(&["ArrowLeft", "Left"]);
    pub const ARROW_RIGHT: Key = Key::from_static(&["ArrowRight", "Right"]);
    pub const HOME: Key = Key::from_static(&["Home"]);
    pub const END: Key = Key::from_static(&["End"]);
    pub const PAGE_UP: Key = Key::from_static(&["PageUp"]);
    pub const PAGE_DOWN: Key = Key::from_static(&["PageDown"]);
    pub const F1: Key = Key::from_static(&["F1"]);
    pub const F2: Key = Key::from_static(&["F2"]);
    pub const F3: Key = Key::from_static(&["F3"]);
    pub const F4: Key = Key::from_static(&["F4"]);
    pub const F5: Key = Key::from_static(&["F5"]);
    pub const F6: Key = Key::from_static(&["F6"]);
    pub const F7: Key = Key::from_static(&["F7"]);
    pub const F8: Key = Key::from_static(&["F8"]);
    pub const F9: Key = Key::from_static(&["F9"]);
    pub const F10: Key = Key::from_static(&["F10"]);
    pub const F11: Key = Key::from_static(&["F11"]);
    pub const F12: Key = Key::from_static(&["F12"]);

    pub const SHIFT: Key = Key::from_static(&["Shift"]);
    pub const CONTROL: Key = Key::from_static(&["Control"]);
    pub const ALT: Key = Key::from_static(&["Alt"]);
    pub const ALT_GRAPH: Key = Key::from_static(&["AltGraph"]);
    pub const META: Key = Key::from_static(&["Meta"]);

    /// Key from a static list of names, the first being the primary one
    pub const fn from_static(names: &'static [&'static str]) -> Self {
        Self {
            names: KeyNames::Static(names),
        }
    }

    /// Key with a single name, e.g. `Key::of("a")`
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            names: KeyNames::Owned(vec![name.into()]),
        }
    }

    /// Key with a primary name and additional aliases
    pub fn with_aliases(
        name: impl Into<String>,
        aliases: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut names = vec![name.into()];
        names.extend(aliases.into_iter().map(Into::into));
        Self {
            names: KeyNames::Owned(names),
        }
    }

    /// All names of the key, primary first
    pub fn names(&self) -> Vec<&str> {
        match &self.names {
            KeyNames::Static(names) => names.to_vec(),
            KeyNames::Owned(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Primary name of the key
    pub fn primary(&self) -> &str {
        match &self.names {
            KeyNames::Static(names) => names.first().copied().unwrap_or_default(),
            KeyNames::Owned(names) => names.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// Whether the key has no usable name
    pub fn is_empty(&self) -> bool {
        self.names().iter().all(|n| n.is_empty())
    }

    /// Whether a raw key string reported by the browser is one of this key's names
    pub fn matches(&self, raw: &str) -> bool {
        self.names().iter().any(|name| names_equal(name, raw))
    }

    /// Whether two keys share at least one name
    pub fn matches_key(&self, other: &Key) -> bool {
        other.names().iter().any(|name| self.matches(name))
    }

    /// Whether this key is one of the modifier keys
    pub fn is_modifier(&self) -> bool {
        KeyModifier::from_key(self).is_some()
    }

    /// Client-side expression testing `event.key` against this key's names
    pub fn filter_expression(&self) -> String {
        let tests: Vec<String> = self
            .names()
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| {
                let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
                if name.chars().count() == 1 {
                    format!("event.key.toLowerCase() === '{}'", escaped.to_lowercase())
                } else {
                    format!("event.key === '{}'", escaped)
                }
            })
            .collect();
        format!("({})", tests.join(" || "))
    }

    fn normalized_names(&self) -> BTreeSet<String> {
        self.names().into_iter().map(normalize).collect()
    }
}

fn normalize(name: &str) -> String {
    if name.chars().count() == 1 {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

fn names_equal(a: &str, b: &str) -> bool {
    if a.chars().count() == 1 && b.chars().count() == 1 {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_names() == other.normalized_names()
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_names().hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.names()).finish()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary())
    }
}

impl From<KeyModifier> for Key {
    fn from(modifier: KeyModifier) -> Self {
        modifier.key()
    }
}

/// Modifier keys that can be part of a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyModifier {
    Shift,
    Control,
    Alt,
    AltGraph,
    Meta,
}

impl KeyModifier {
    /// All modifiers, in filter order
    pub const ALL: [KeyModifier; 5] = [
        KeyModifier::Shift,
        KeyModifier::Control,
        KeyModifier::Alt,
        KeyModifier::AltGraph,
        KeyModifier::Meta,
    ];

    /// The key for this modifier
    pub fn key(self) -> Key {
        match self {
            Self::Shift => Key::SHIFT,
            Self::Control => Key::CONTROL,
            Self::Alt => Key::ALT,
            Self::AltGraph => Key::ALT_GRAPH,
            Self::Meta => Key::META,
        }
    }

    /// Modifier for a key, if the key is one
    pub fn from_key(key: &Key) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key().matches_key(key))
    }

    /// Client-side expression that is true while the modifier is held
    pub fn event_flag(self) -> &'static str {
        match self {
            Self::Shift => "event.shiftKey",
            Self::Control => "event.ctrlKey",
            Self::Alt => "event.altKey",
            Self::AltGraph => "event.getModifierState('AltGraph')",
            Self::Meta => "event.metaKey",
        }
    }

    /// Client-side expression requiring exactly `modifiers` to be held
    pub fn filter_expression(modifiers: &BTreeSet<KeyModifier>) -> String {
        let tests: Vec<String> = Self::ALL
            .into_iter()
            .map(|m| {
                if modifiers.contains(&m) {
                    m.event_flag().to_string()
                } else {
                    format!("!{}", m.event_flag())
                }
            })
            .collect();
        format!("({})", tests.join(" && "))
    }
}

/// Location of a key on the keyboard, as reported by `event.location`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum KeyLocation {
    #[default]
    Standard,
    Left,
    Right,
    Numpad,
}

impl KeyLocation {
    /// Location for a DOM location code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Standard),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Numpad),
            _ => None,
        }
    }

    /// DOM location code
    pub fn code(self) -> i64 {
        match self {
            Self::Standard => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Numpad => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_matching() {
        assert!(Key::ESCAPE.matches("Escape"));
        assert!(Key::ESCAPE.matches("Esc"));
        assert!(!Key::ESCAPE.matches("escape"));
        assert!(Key::ARROW_UP.matches("Up"));
        assert!(Key::of("a").matches("A"));
        assert!(!Key::of("a").matches("b"));
    }

    #[test]
    fn test_key_equality_is_set_based() {
        assert_eq!(
            Key::with_aliases("Esc", ["Escape"]),
            Key::ESCAPE,
            "alias order must not matter"
        );
        assert_eq!(Key::of("A"), Key::of("a"));
        assert_ne!(Key::of("Esc"), Key::ESCAPE);
        assert!(Key::of("Esc").matches_key(&Key::ESCAPE));
    }

    #[test]
    fn test_modifier_detection() {
        assert!(Key::SHIFT.is_modifier());
        assert!(Key::of("Control").is_modifier());
        assert!(!Key::ENTER.is_modifier());
        assert_eq!(KeyModifier::from_key(&Key::META), Some(KeyModifier::Meta));
        assert_eq!(Key::from(KeyModifier::Alt), Key::ALT);
    }

    #[test]
    fn test_empty_key() {
        assert!(Key::of("").is_empty());
        assert!(!Key::SPACE.is_empty());
        assert_eq!(Key::SPACE.primary(), " ");
    }

    #[test]
    fn test_filter_expressions() {
        assert_eq!(
            Key::of("a").filter_expression(),
            "(event.key.toLowerCase() === 'a')"
        );
        assert_eq!(
            Key::ESCAPE.filter_expression(),
            "(event.key === 'Escape' || event.key === 'Esc')"
        );
        assert_eq!(
            Key::of("'").filter_expression(),
            "(event.key.toLowerCase() === '\\'')"
        );

        let modifiers = BTreeSet::from([KeyModifier::Control]);
        assert_eq!(
            KeyModifier::filter_expression(&modifiers),
            "(!event.shiftKey && event.ctrlKey && !event.altKey \
             && !event.getModifierState('AltGraph') && !event.metaKey)"
        );
    }

    #[test]
    fn test_location_codes() {
        assert_eq!(KeyLocation::from_code(3), Some(KeyLocation::Numpad));
        assert_eq!(KeyLocation::from_code(7), None);
        assert_eq!(KeyLocation::Right.code(), 2);
    }
}
