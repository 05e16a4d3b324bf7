//! Debounce configuration for DOM listeners
//!
//! Timing is enforced by the client runtime. The server only keeps the
//! configuration so it can be sent along with the listener and compared for
//! deduplication.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::events::EventError;

/// Phases of a debounced burst of events that should be forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebouncePhase {
    /// The first event of a burst
    Leading,
    /// Periodic events while the burst is ongoing
    Intermediate,
    /// The last event once the burst has settled
    Trailing,
}

/// Debounce timeout and the phases to forward
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebounceSettings {
    timeout_ms: u32,
    phases: BTreeSet<DebouncePhase>,
}

impl DebounceSettings {
    /// Create settings for the given timeout and phases.
    ///
    /// At least one phase is required.
    pub fn new(
        timeout_ms: u32,
        phases: impl IntoIterator<Item = DebouncePhase>,
    ) -> Result<Self, EventError> {
        let phases: BTreeSet<_> = phases.into_iter().collect();
        if phases.is_empty() {
            return Err(EventError::InvalidArgument(
                "debounce settings need at least one phase".to_string(),
            ));
        }
        Ok(Self { timeout_ms, phases })
    }

    /// Forward only the last event of a burst
    pub fn trailing(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            phases: BTreeSet::from([DebouncePhase::Trailing]),
        }
    }

    /// Forward the first event right away and then at most once per timeout
    pub fn throttle(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            phases: BTreeSet::from([DebouncePhase::Leading, DebouncePhase::Intermediate]),
        }
    }

    /// Timeout in milliseconds
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Forwarded phases
    pub fn phases(&self) -> &BTreeSet<DebouncePhase> {
        &self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_phase_order() {
        let a = DebounceSettings::new(
            300,
            [DebouncePhase::Trailing, DebouncePhase::Leading],
        )
        .unwrap();
        let b = DebounceSettings::new(
            300,
            [DebouncePhase::Leading, DebouncePhase::Trailing],
        )
        .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, DebounceSettings::trailing(300));
        assert_ne!(DebounceSettings::trailing(300), DebounceSettings::trailing(200));
    }

    #[test]
    fn test_empty_phases_rejected() {
        let result = DebounceSettings::new(100, []);
        assert!(matches!(result, Err(EventError::InvalidArgument(_))));
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_value(DebounceSettings::throttle(50)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "timeout_ms": 50, "phases": ["leading", "intermediate"] })
        );
    }
}
