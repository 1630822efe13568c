//! Transition timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::Easing;

/// Timing configuration for animated panel moves.
///
/// Serialized form carries the duration in milliseconds:
/// `{"duration_ms": 500, "easing": "ease-in-out"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTiming {
    /// How long one animated move takes.
    #[serde(with = "duration_millis", rename = "duration_ms")]
    pub duration: Duration,
    /// Easing applied over the duration.
    pub easing: Easing,
}

impl TransitionTiming {
    /// Create a timing configuration.
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Set the duration, builder style.
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing, builder style.
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: Easing::EaseInOut,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let timing = TransitionTiming::default();
        assert_eq!(timing.duration, Duration::from_millis(500));
        assert_eq!(timing.easing, Easing::EaseInOut);
    }

    #[test]
    fn test_serde_round_trip() {
        let timing = TransitionTiming::new(Duration::from_millis(250), Easing::EaseOutCubic);
        let json = serde_json::to_string(&timing).unwrap();
        assert!(json.contains("\"duration_ms\":250"), "{json}");
        let back: TransitionTiming = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timing);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let timing: TransitionTiming = serde_json::from_str("{}").unwrap();
        assert_eq!(timing, TransitionTiming::default());

        let timing: TransitionTiming = serde_json::from_str("{\"duration_ms\": 100}").unwrap();
        assert_eq!(timing.duration, Duration::from_millis(100));
        assert_eq!(timing.easing, Easing::EaseInOut);
    }
}
