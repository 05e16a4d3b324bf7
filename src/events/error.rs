//! Error types for event registration and reconstruction

use crate::events::ParamType;

/// Errors raised while registering listeners or rebuilding events from the client
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The DOM event did not carry a value for a declared expression
    #[error("The DOM event for {event} does not contain the expected event data: {expression}")]
    MissingEventData {
        event: &'static str,
        expression: String,
    },

    /// A value was present but could not be coerced to the declared type
    #[error("Event data {expression} for {event} should be {expected:?}, got {found}")]
    InvalidEventData {
        event: &'static str,
        expression: String,
        expected: ParamType,
        found: String,
    },

    /// An argument to a public entry point was empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The raw client payload was not valid JSON for a DOM event
    #[error("Malformed DOM event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
