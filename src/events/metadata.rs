//! Event-type metadata and reconstruction of typed events from DOM events
//!
//! Each DOM-backed event type describes itself with an [`EventDescriptor`]:
//! the DOM event names it is synthesized from, the client expressions whose
//! values it needs, and optional filter/debounce configuration. When a DOM
//! event arrives, [`EventArgs::extract`] pulls and coerces the declared values
//! and the type's constructor builds the typed event from them. Missing or
//! mistyped values are errors, never silently dropped.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;
use crate::dom::{DebounceSettings, DomEvent};
use crate::events::EventError;

/// Target type of an event data expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Boolean,
    Integer,
    Double,
    String,
    Json,
}

/// One client-evaluated expression and the type it is coerced to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDataSpec {
    pub expression: &'static str,
    pub param: ParamType,
}

/// Declarative description of a DOM-backed event type
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    /// Name of the event type, used in error messages and logs
    pub type_name: &'static str,
    /// DOM event names the type is synthesized from
    pub dom_events: Vec<&'static str>,
    /// Event data expressions, in constructor order
    pub data: Vec<EventDataSpec>,
    /// Client-side filter expression
    pub filter: Option<&'static str>,
    /// Client-side debounce configuration
    pub debounce: Option<DebounceSettings>,
}

impl EventDescriptor {
    /// Describe an event type synthesized from `dom_event`
    pub fn new(type_name: &'static str, dom_event: &'static str) -> Self {
        Self {
            type_name,
            dom_events: vec![dom_event],
            data: Vec::new(),
            filter: None,
            debounce: None,
        }
    }

    /// Also synthesize the type from another DOM event name
    pub fn also_on(mut self, dom_event: &'static str) -> Self {
        if !self.dom_events.contains(&dom_event) {
            self.dom_events.push(dom_event);
        }
        self
    }

    /// Declare an event data expression
    pub fn data(mut self, expression: &'static str, param: ParamType) -> Self {
        self.data.push(EventDataSpec { expression, param });
        self
    }

    /// Set the client-side filter
    pub fn filter(mut self, filter: &'static str) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the client-side debounce configuration
    pub fn debounce(mut self, settings: DebounceSettings) -> Self {
        self.debounce = Some(settings);
        self
    }
}

/// Constructor building a typed event from coerced arguments
pub type EventConstructor<E> = fn(&Component, &EventArgs) -> Result<E, EventError>;

/// Binding between an event type and the DOM
pub struct DomBinding<E> {
    pub descriptor: EventDescriptor,
    pub construct: EventConstructor<E>,
}

impl<E> DomBinding<E> {
    /// Create a binding from a descriptor and a constructor
    pub fn new(descriptor: EventDescriptor, construct: EventConstructor<E>) -> Self {
        Self {
            descriptor,
            construct,
        }
    }
}

impl<E> fmt::Debug for DomBinding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomBinding")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// A coerced event data value
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Json(Value),
}

impl EventValue {
    /// Coerce a raw JSON value to the declared type
    fn coerce(raw: &Value, param: ParamType) -> Option<Self> {
        match param {
            ParamType::Boolean => raw.as_bool().map(Self::Boolean),
            ParamType::Integer => match raw {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                _ => None,
            }
            .map(Self::Integer),
            ParamType::Double => raw.as_f64().map(Self::Double),
            ParamType::String => raw.as_str().map(|s| Self::String(s.to_string())),
            ParamType::Json => Some(Self::Json(raw.clone())),
        }
    }

    fn param_type(&self) -> ParamType {
        match self {
            Self::Boolean(_) => ParamType::Boolean,
            Self::Integer(_) => ParamType::Integer,
            Self::Double(_) => ParamType::Double,
            Self::String(_) => ParamType::String,
            Self::Json(_) => ParamType::Json,
        }
    }
}

/// Coerced event data for one event type, keyed by expression
#[derive(Debug, Clone, PartialEq)]
pub struct EventArgs {
    type_name: &'static str,
    values: Vec<(&'static str, EventValue)>,
}

impl EventArgs {
    /// Extract and coerce every declared expression from a DOM event
    pub fn extract(descriptor: &EventDescriptor, event: &DomEvent) -> Result<Self, EventError> {
        let mut values = Vec::with_capacity(descriptor.data.len());
        for spec in &descriptor.data {
            let raw = event.event_data().get(spec.expression).ok_or_else(|| {
                EventError::MissingEventData {
                    event: descriptor.type_name,
                    expression: spec.expression.to_string(),
                }
            })?;
            let value = EventValue::coerce(raw, spec.param).ok_or_else(|| {
                EventError::InvalidEventData {
                    event: descriptor.type_name,
                    expression: spec.expression.to_string(),
                    expected: spec.param,
                    found: raw.to_string(),
                }
            })?;
            values.push((spec.expression, value));
        }

        Ok(Self {
            type_name: descriptor.type_name,
            values,
        })
    }

    fn get(&self, expression: &str, expected: ParamType) -> Result<&EventValue, EventError> {
        let value = self
            .values
            .iter()
            .find(|(e, _)| *e == expression)
            .map(|(_, v)| v)
            .ok_or_else(|| EventError::MissingEventData {
                event: self.type_name,
                expression: expression.to_string(),
            })?;

        if value.param_type() == expected {
            Ok(value)
        } else {
            Err(self.mismatch(expression, expected, value))
        }
    }

    fn mismatch(&self, expression: &str, expected: ParamType, found: &EventValue) -> EventError {
        EventError::InvalidEventData {
            event: self.type_name,
            expression: expression.to_string(),
            expected,
            found: format!("{:?}", found),
        }
    }

    /// Boolean value of an expression
    pub fn boolean(&self, expression: &str) -> Result<bool, EventError> {
        match self.get(expression, ParamType::Boolean)? {
            EventValue::Boolean(b) => Ok(*b),
            other => Err(self.mismatch(expression, ParamType::Boolean, other)),
        }
    }

    /// Integer value of an expression
    pub fn integer(&self, expression: &str) -> Result<i64, EventError> {
        match self.get(expression, ParamType::Integer)? {
            EventValue::Integer(i) => Ok(*i),
            other => Err(self.mismatch(expression, ParamType::Integer, other)),
        }
    }

    /// Floating point value of an expression
    pub fn double(&self, expression: &str) -> Result<f64, EventError> {
        match self.get(expression, ParamType::Double)? {
            EventValue::Double(d) => Ok(*d),
            other => Err(self.mismatch(expression, ParamType::Double, other)),
        }
    }

    /// String value of an expression
    pub fn string(&self, expression: &str) -> Result<String, EventError> {
        match self.get(expression, ParamType::String)? {
            EventValue::String(s) => Ok(s.clone()),
            other => Err(self.mismatch(expression, ParamType::String, other)),
        }
    }

    /// Raw JSON value of an expression
    pub fn json(&self, expression: &str) -> Result<&Value, EventError> {
        match self.get(expression, ParamType::Json)? {
            EventValue::Json(v) => Ok(v),
            other => Err(self.mismatch(expression, ParamType::Json, other)),
        }
    }

    /// Deserialize a JSON expression into a structured value
    pub fn decode<T: DeserializeOwned>(&self, expression: &str) -> Result<T, EventError> {
        let raw = self.json(expression)?;
        serde_json::from_value(raw.clone()).map_err(|e| EventError::InvalidEventData {
            event: self.type_name,
            expression: expression.to_string(),
            expected: ParamType::Json,
            found: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn descriptor() -> EventDescriptor {
        EventDescriptor::new("TestEvent", "custom")
            .data("event.flag", ParamType::Boolean)
            .data("event.count", ParamType::Integer)
            .data("event.ratio", ParamType::Double)
            .data("event.name", ParamType::String)
            .data("event.detail", ParamType::Json)
    }

    fn full_event() -> DomEvent {
        DomEvent::new("custom")
            .with_data("event.flag", true)
            .with_data("event.count", 3.0)
            .with_data("event.ratio", 1)
            .with_data("event.name", "x")
            .with_data("event.detail", serde_json::json!({ "x": 1, "y": 2 }))
    }

    #[test]
    fn test_extract_coerces_declared_types() {
        let args = EventArgs::extract(&descriptor(), &full_event()).unwrap();
        assert!(args.boolean("event.flag").unwrap());
        assert_eq!(args.integer("event.count").unwrap(), 3);
        assert_eq!(args.double("event.ratio").unwrap(), 1.0);
        assert_eq!(args.string("event.name").unwrap(), "x");

        #[derive(Deserialize, PartialEq, Debug)]
        struct Point {
            x: i32,
            y: i32,
        }
        assert_eq!(
            args.decode::<Point>("event.detail").unwrap(),
            Point { x: 1, y: 2 }
        );
    }

    #[test]
    fn test_missing_data_fails_fast() {
        let event = DomEvent::new("custom").with_data("event.flag", true);
        let err = EventArgs::extract(&descriptor(), &event).unwrap_err();
        match err {
            EventError::MissingEventData { event, expression } => {
                assert_eq!(event, "TestEvent");
                assert_eq!(expression, "event.count");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_fails_fast() {
        let event = full_event().with_data("event.count", 2.5);
        assert!(matches!(
            EventArgs::extract(&descriptor(), &event),
            Err(EventError::InvalidEventData {
                expected: ParamType::Integer,
                ..
            })
        ));

        let event = full_event().with_data("event.flag", "true");
        assert!(matches!(
            EventArgs::extract(&descriptor(), &event),
            Err(EventError::InvalidEventData {
                expected: ParamType::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_accessor_type_mismatch() {
        let args = EventArgs::extract(&descriptor(), &full_event()).unwrap();
        assert!(matches!(
            args.string("event.flag"),
            Err(EventError::InvalidEventData { .. })
        ));
        assert!(matches!(
            args.boolean("event.unknown"),
            Err(EventError::MissingEventData { .. })
        ));
        assert!(args.decode::<Vec<String>>("event.detail").is_err());
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = EventDescriptor::new("Focus", "focus")
            .also_on("focusin")
            .also_on("focus")
            .filter("event.isTrusted")
            .debounce(DebounceSettings::trailing(100));
        assert_eq!(descriptor.dom_events, vec!["focus", "focusin"]);
        assert_eq!(descriptor.filter, Some("event.isTrusted"));
        assert_eq!(descriptor.debounce, Some(DebounceSettings::trailing(100)));
    }
}
