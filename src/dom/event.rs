//! Browser-originated DOM events as received by the server

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::events::EventError;

/// A DOM occurrence reported by the client.
///
/// `event_data` maps each requested client-side expression (for example
/// `event.key`) to the value the client evaluated for it. Filter expressions
/// are evaluated the same way and their boolean result is stored under the
/// filter expression itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default, rename = "data")]
    event_data: Map<String, Value>,
}

impl DomEvent {
    /// Create an event without any data
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            event_data: Map::new(),
        }
    }

    /// Parse an event from its JSON payload, `{"type": ..., "data": {...}}`
    pub fn from_json(payload: &str) -> Result<Self, EventError> {
        let event: Self = serde_json::from_str(payload)?;
        if event.event_type.is_empty() {
            return Err(EventError::InvalidArgument(
                "DOM event type cannot be empty".to_string(),
            ));
        }
        Ok(event)
    }

    /// Add a data value for an expression
    pub fn with_data(mut self, expression: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event_data.insert(expression.into(), value.into());
        self
    }

    /// DOM event name, e.g. `keydown`
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// All evaluated expressions
    pub fn event_data(&self) -> &Map<String, Value> {
        &self.event_data
    }

    /// Whether the client reported the filter expression as matching
    pub fn filter_matches(&self, filter: &str) -> bool {
        matches!(self.event_data.get(filter), Some(Value::Bool(true)))
    }
}
