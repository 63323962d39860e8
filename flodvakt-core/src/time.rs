//! ## flodvakt-core::time
//! **Timestamp helpers**
//!
//! Flow timestamps are `Duration`s since the Unix epoch. On the wire they are
//! fractional seconds so scenario files stay readable.
//!
//! An `f64` carries 53 bits of mantissa, so present-day epoch timestamps
//! keep roughly microsecond precision through serialization. Nanosecond
//! parts do not round-trip exactly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Converts a wall-clock time into a flow timestamp.
///
/// Times before the epoch clamp to zero.
pub fn since_epoch(time: SystemTime) -> Duration {
    time.duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Serde adapter storing a `Duration` as `f64` seconds.
pub mod secs {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Stamped {
        #[serde(with = "secs")]
        at: Duration,
    }

    #[test]
    fn test_since_epoch_before_epoch_clamps() {
        let before = UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(since_epoch(before), Duration::ZERO);
        assert_eq!(
            since_epoch(UNIX_EPOCH + Duration::from_secs(7)),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn test_secs_accepts_integer_and_fraction() {
        let whole: Stamped = serde_yaml::from_str("at: 11").unwrap();
        assert_eq!(whole.at, Duration::from_secs(11));

        let frac: Stamped = serde_json::from_str(r#"{"at": 1.5}"#).unwrap();
        assert_eq!(frac.at, Duration::from_millis(1500));
    }

    #[test]
    fn test_secs_epoch_timestamp_keeps_microseconds() {
        let stamped = Stamped {
            at: Duration::new(1_700_000_000, 123_456_789),
        };
        let json = serde_json::to_string(&stamped).unwrap();
        let decoded: Stamped = serde_json::from_str(&json).unwrap();

        let drift = if decoded.at > stamped.at {
            decoded.at - stamped.at
        } else {
            stamped.at - decoded.at
        };
        assert!(drift < Duration::from_micros(1), "drift {drift:?}");
        assert_eq!(decoded.at.as_secs(), 1_700_000_000);
    }

    #[test]
    fn test_secs_rejects_negative() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"at": -1.0}"#);
        assert!(result.is_err());
    }
}
