//! Declarative configuration for the two controllers.
//!
//! Host applications usually build these structs in code, but both can also
//! be parsed from embedded JSON (the host framework's markup layer hands the
//! raw string through). Malformed embedded configuration never propagates:
//! it degrades to the defaults, with a warning logged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{Easing, TransitionTiming};
use crate::direction::Direction;
use crate::host::PanelKind;
use crate::underlay::Underlay;

/// Configuration for a [`crate::stack::PanelStack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Where pushed panels enter from.
    pub push_from: Direction,
    /// Underlay coordination mode.
    pub underlay: Underlay,
    /// Timing for animated moves.
    pub timing: TransitionTiming,
    /// Selector for pre-existing children to adopt at attach time.
    /// `None` disables adoption.
    pub child_query: Option<String>,
    /// Host-defined default configuration merged into adopted children.
    pub child_defaults: serde_json::Value,
    /// Required capability kind for children; adds of panels tagged
    /// differently are vetoed. `None` accepts every panel.
    #[serde(skip)]
    pub default_kind: Option<PanelKind>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            push_from: Direction::Right,
            underlay: Underlay::None,
            timing: TransitionTiming::default(),
            child_query: None,
            child_defaults: serde_json::Value::Null,
            default_kind: None,
        }
    }
}

impl StackConfig {
    /// Parse embedded JSON configuration, degrading to defaults on error.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    target: "trellis::config",
                    %err,
                    "malformed stack configuration, using defaults"
                );
                Self::default()
            }
        }
    }
}

/// Configuration for a [`crate::snap::PageSnap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Selector for page elements. `None` means all direct children.
    pub selector: Option<String>,
    /// Duration of the animated snap issued when the index changes.
    #[serde(with = "snap_duration_millis", rename = "snap_duration_ms")]
    pub snap_duration: Duration,
    /// Easing for programmatic snap scrolls.
    pub easing: Easing,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            selector: None,
            snap_duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
        }
    }
}

impl SnapConfig {
    /// Parse embedded JSON configuration, degrading to defaults on error.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    target: "trellis::config",
                    %err,
                    "malformed snap configuration, using defaults"
                );
                Self::default()
            }
        }
    }
}

mod snap_duration_millis {
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
