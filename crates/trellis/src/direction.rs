//! Push directions for panel transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The eight compass directions a pushed panel can enter from.
///
/// Each direction maps to a unit vector describing where, relative to the
/// container, the panel sits before its entry animation. `Right` means the
/// panel starts one container-width to the right and slides left into place.
///
/// The serialized names are the short forms used in declarative
/// configuration: `right`, `left`, `top`, `bottom`, `tr`, `br`, `tl`, `bl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Enter from the right edge.
    #[default]
    Right,
    /// Enter from the left edge.
    Left,
    /// Enter from the top edge.
    Top,
    /// Enter from the bottom edge.
    Bottom,
    /// Enter from the top-right corner.
    #[serde(rename = "tr")]
    TopRight,
    /// Enter from the bottom-right corner.
    #[serde(rename = "br")]
    BottomRight,
    /// Enter from the top-left corner.
    #[serde(rename = "tl")]
    TopLeft,
    /// Enter from the bottom-left corner.
    #[serde(rename = "bl")]
    BottomLeft,
}

/// Error returned when parsing an unrecognized direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// All eight directions.
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::Left,
        Direction::Top,
        Direction::Bottom,
        Direction::TopRight,
        Direction::BottomRight,
        Direction::TopLeft,
        Direction::BottomLeft,
    ];

    /// The unit vector `(dx, dy)` for this direction.
    ///
    /// Components are in `{-1, 0, 1}` and at least one is nonzero.
    pub const fn unit_vector(self) -> (f32, f32) {
        match self {
            Direction::Right => (1.0, 0.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Top => (0.0, -1.0),
            Direction::Bottom => (0.0, 1.0),
            Direction::TopRight => (1.0, -1.0),
            Direction::BottomRight => (1.0, 1.0),
            Direction::TopLeft => (-1.0, -1.0),
            Direction::BottomLeft => (-1.0, 1.0),
        }
    }

    /// The short configuration name for this direction.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::TopRight => "tr",
            Direction::BottomRight => "br",
            Direction::TopLeft => "tl",
            Direction::BottomLeft => "bl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Parse a short direction name.
    ///
    /// Unrecognized names are rejected here, before any offset computation
    /// can observe them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            "top" => Ok(Direction::Top),
            "bottom" => Ok(Direction::Bottom),
            "tr" => Ok(Direction::TopRight),
            "br" => Ok(Direction::BottomRight),
            "tl" => Ok(Direction::TopLeft),
            "bl" => Ok(Direction::BottomLeft),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vectors_are_unit_components() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.unit_vector();
            assert!([-1.0, 0.0, 1.0].contains(&dx), "{direction}: dx = {dx}");
            assert!([-1.0, 0.0, 1.0].contains(&dy), "{direction}: dy = {dy}");
            assert!(dx != 0.0 || dy != 0.0, "{direction}: zero vector");
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(direction.name().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("up".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
        assert!("Right".parse::<Direction>().is_err());
    }

    #[test]
    fn test_serde_names_match_parse_names() {
        for direction in Direction::ALL {
            let json = serde_json::to_string(&direction).unwrap();
            assert_eq!(json, format!("\"{}\"", direction.name()));
            let back: Direction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, direction);
        }
    }
}
