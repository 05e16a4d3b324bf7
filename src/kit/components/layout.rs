// Layout components for Tether Kit

use crate::component::{AsComponent, Component, ComponentError};
use crate::kit::mixins::{AttachNotifier, ClickNotifier, DetachNotifier, HasEnabled, HasStyle};

/// Layout direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Horizontal layout
    Row,
    /// Vertical layout
    #[default]
    Column,
}

impl Direction {
    fn class_name(self) -> &'static str {
        match self {
            Self::Row => "layout-row",
            Self::Column => "layout-column",
        }
    }
}

/// Container laying out its children in a row or column.
///
/// Disabling a layout disables everything inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    component: Component,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Direction::default())
    }
}

impl Layout {
    /// Create an empty layout
    pub fn new(direction: Direction) -> Self {
        let layout = Self {
            component: Component::new("div"),
        };
        layout.set_direction(direction);
        layout
    }

    /// Horizontal layout
    pub fn row() -> Self {
        Self::new(Direction::Row)
    }

    /// Vertical layout
    pub fn column() -> Self {
        Self::new(Direction::Column)
    }

    /// Change the direction
    pub fn set_direction(&self, direction: Direction) {
        self.remove_class_name(Direction::Row.class_name());
        self.remove_class_name(Direction::Column.class_name());
        self.add_class_name(direction.class_name());
    }

    /// Current direction
    pub fn direction(&self) -> Direction {
        if self.has_class_name(Direction::Row.class_name()) {
            Direction::Row
        } else {
            Direction::Column
        }
    }

    /// Append components, in order
    pub fn add(&self, children: &[&dyn AsComponent]) -> Result<(), ComponentError> {
        for child in children {
            self.component.append(child.as_component())?;
        }
        Ok(())
    }

    /// Remove a direct child
    pub fn remove(&self, child: &dyn AsComponent) -> Result<(), ComponentError> {
        self.component.remove(child.as_component())
    }

    /// Number of direct children
    pub fn component_count(&self) -> usize {
        self.component.children().len()
    }
}

impl AsComponent for Layout {
    fn as_component(&self) -> &Component {
        &self.component
    }
}

impl AttachNotifier for Layout {}
impl DetachNotifier for Layout {}
impl ClickNotifier for Layout {}
impl HasEnabled for Layout {}
impl HasStyle for Layout {}
