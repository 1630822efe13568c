//! Underlay coordination modes for push/pop transitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How the panel beneath the top coordinates with a push/pop transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underlay {
    /// The underlay does not move.
    #[default]
    None,
    /// The underlay animates concurrently with the push/pop motion.
    With,
    /// Two-stage motion: the underlay animation finishes, the given delay
    /// elapses, then the deferred stage proceeds.
    After(Duration),
}

/// Error returned when parsing an unrecognized underlay mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized underlay mode: {0:?}")]
pub struct ParseUnderlayError(pub String);

impl Underlay {
    /// Whether this is [`Underlay::None`].
    pub const fn is_none(self) -> bool {
        matches!(self, Underlay::None)
    }

    /// The delay of an [`Underlay::After`] mode.
    pub const fn delay(self) -> Option<Duration> {
        match self {
            Underlay::After(delay) => Some(delay),
            _ => None,
        }
    }
}

impl fmt::Display for Underlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Underlay::None => f.write_str("none"),
            Underlay::With => f.write_str("with"),
            Underlay::After(delay) => write!(f, "{}", delay.as_millis()),
        }
    }
}

impl FromStr for Underlay {
    type Err = ParseUnderlayError;

    /// Parse an underlay mode from its configuration form.
    ///
    /// Accepts `"none"`, `"with"`, `"after"` (a minimal one-millisecond
    /// deferred stage), or a non-negative millisecond count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Underlay::None),
            "with" => Ok(Underlay::With),
            "after" => Ok(Underlay::After(Duration::from_millis(1))),
            other => other
                .parse::<u64>()
                .map(|ms| Underlay::After(Duration::from_millis(ms)))
                .map_err(|_| ParseUnderlayError(other.to_string())),
        }
    }
}

impl Serialize for Underlay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Underlay::None => serializer.serialize_str("none"),
            Underlay::With => serializer.serialize_str("with"),
            Underlay::After(delay) => serializer.serialize_u64(delay.as_millis() as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Underlay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UnderlayVisitor;

        impl Visitor<'_> for UnderlayVisitor {
            type Value = Underlay;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"none\", \"with\", \"after\", or a millisecond count")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Underlay, E> {
                v.parse().map_err(de::Error::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Underlay, E> {
                Ok(Underlay::After(Duration::from_millis(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Underlay, E> {
                u64::try_from(v)
                    .map(|ms| Underlay::After(Duration::from_millis(ms)))
                    .map_err(|_| de::Error::custom("underlay delay must be non-negative"))
            }
        }

        deserializer.deserialize_any(UnderlayVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!("none".parse(), Ok(Underlay::None));
        assert_eq!("with".parse(), Ok(Underlay::With));
        assert_eq!(
            "after".parse(),
            Ok(Underlay::After(Duration::from_millis(1)))
        );
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(
            "250".parse(),
            Ok(Underlay::After(Duration::from_millis(250)))
        );
        assert_eq!("0".parse(), Ok(Underlay::After(Duration::ZERO)));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("-5".parse::<Underlay>().is_err());
        assert!("soon".parse::<Underlay>().is_err());
        assert!("".parse::<Underlay>().is_err());
    }

    #[test]
    fn test_deserialize_string_or_number() {
        assert_eq!(
            serde_json::from_str::<Underlay>("\"with\"").unwrap(),
            Underlay::With
        );
        assert_eq!(
            serde_json::from_str::<Underlay>("120").unwrap(),
            Underlay::After(Duration::from_millis(120))
        );
        assert!(serde_json::from_str::<Underlay>("-1").is_err());
        assert!(serde_json::from_str::<Underlay>("\"later\"").is_err());
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Underlay::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&Underlay::After(Duration::from_millis(40))).unwrap(),
            "40"
        );
    }

    #[test]
    fn test_accessors() {
        assert!(Underlay::None.is_none());
        assert!(!Underlay::With.is_none());
        assert_eq!(Underlay::With.delay(), None);
        assert_eq!(
            Underlay::After(Duration::from_millis(9)).delay(),
            Some(Duration::from_millis(9))
        );
    }
}
