//! Tag-based component registry
//!
//! Applications register a provider function per custom element tag. The
//! registry builds components from those providers on demand; nothing is
//! instantiated reflectively.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::component::{AsComponent, Component, ComponentError};

/// Tags reserved by the HTML specification that look like custom elements
const RESERVED_TAGS: [&str; 8] = [
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

type Provider = Box<dyn Fn() -> Box<dyn Any>>;
type Unwrap = fn(&dyn Any) -> Option<Component>;

struct Entry {
    type_name: &'static str,
    provider: Provider,
    component_of: Unwrap,
}

/// Registry mapping custom element tags to component providers
#[derive(Default)]
pub struct ComponentRegistry {
    entries: HashMap<String, Entry>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self
            .entries
            .iter()
            .map(|(tag, entry)| format!("{} -> {}", tag, entry.type_name))
            .collect();
        tags.sort();
        f.debug_struct("ComponentRegistry")
            .field("entries", &tags)
            .finish()
    }
}

/// Lowercase, starts with a letter, contains at least one dash
fn custom_element_name() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z][a-z0-9._-]*-[a-z0-9._-]*$").ok())
        .as_ref()
}

/// Whether `tag` is a valid custom element name
pub fn is_valid_tag(tag: &str) -> bool {
    custom_element_name().is_some_and(|pattern| pattern.is_match(tag))
        && !RESERVED_TAGS.contains(&tag)
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the provider building components for `tag`
    pub fn register<T, F>(&mut self, tag: &str, provider: F) -> Result<(), ComponentError>
    where
        T: AsComponent + 'static,
        F: Fn() -> T + 'static,
    {
        if !is_valid_tag(tag) {
            return Err(ComponentError::InvalidTag(tag.to_string()));
        }
        if self.entries.contains_key(tag) {
            return Err(ComponentError::DuplicateTag(tag.to_string()));
        }

        log::debug!("Registering {} for tag '{}'", type_name::<T>(), tag);
        self.entries.insert(
            tag.to_string(),
            Entry {
                type_name: type_name::<T>(),
                provider: Box::new(move || Box::new(provider()) as Box<dyn Any>),
                component_of: |any| {
                    any.downcast_ref::<T>()
                        .map(|typed| typed.as_component().clone())
                },
            },
        );
        Ok(())
    }

    /// Whether a provider is registered for `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn entry(&self, tag: &str) -> Result<&Entry, ComponentError> {
        self.entries
            .get(tag)
            .ok_or_else(|| ComponentError::UnknownTag(tag.to_string()))
    }

    /// Build the component registered for `tag`
    pub fn create(&self, tag: &str) -> Result<Component, ComponentError> {
        let entry = self.entry(tag)?;
        let instance = (entry.provider)();
        (entry.component_of)(instance.as_ref()).ok_or(ComponentError::CapabilityMisuse {
            type_name: entry.type_name,
            required: "AsComponent",
            method: "create",
        })
    }

    /// Build the component registered for `tag` as its concrete type.
    ///
    /// Fails if the registered provider builds a different type.
    pub fn create_as<T: 'static>(&self, tag: &str) -> Result<T, ComponentError> {
        let entry = self.entry(tag)?;
        (entry.provider)()
            .downcast::<T>()
            .map(|typed| *typed)
            .map_err(|_| ComponentError::CapabilityMisuse {
                type_name: entry.type_name,
                required: type_name::<T>(),
                method: "create_as",
            })
    }
}
