//! Serde helpers for human-readable durations in configuration.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

/// Serialize a Duration as a human-readable string and accept either a
/// number of seconds or a string such as `30s` / `1m30s` when deserializing
pub mod duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration_str = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&duration_str)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a duration as seconds (number) or human-readable string (e.g., '30s', '1m30s')",
                )
            }

            fn visit_u64<E>(self, seconds: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(seconds))
            }

            fn visit_i64<E>(self, seconds: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(seconds)
                    .map(Duration::from_secs)
                    .map_err(|_| de::Error::custom(format!("Negative duration: {seconds}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                humantime::parse_duration(value)
                    .map_err(|e| de::Error::custom(format!("Invalid duration '{value}': {e}")))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "super::duration")]
        timeout: Duration,
    }

    #[test]
    fn test_deserialize_string_and_number() {
        let from_str: Holder = toml::from_str(r#"timeout = "45s""#).unwrap();
        assert_eq!(from_str.timeout, Duration::from_secs(45));

        let from_num: Holder = toml::from_str("timeout = 60").unwrap();
        assert_eq!(from_num.timeout, Duration::from_secs(60));

        assert!(toml::from_str::<Holder>(r#"timeout = "soon""#).is_err());
    }

    #[test]
    fn test_serialize_human_readable() {
        let holder = Holder {
            timeout: Duration::from_secs(90),
        };
        let out = toml::to_string(&holder).unwrap();
        assert_eq!(out.trim(), r#"timeout = "1m 30s""#);
    }
}
