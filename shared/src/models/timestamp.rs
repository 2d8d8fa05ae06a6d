//! Order timestamps
//!
//! `created_at` arrives either as an RFC 3339 instant, as a naive local
//! date-time (`2024-03-01 10:15:00`), as a bare date, or as epoch millis.
//! Naive values are wall-clock times of the business timezone and are only
//! pinned to an instant when a timezone is supplied.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Absolute instant
    Instant(DateTime<Utc>),
    /// Wall-clock time in the business timezone
    Local(NaiveDateTime),
}

impl Timestamp {
    /// The Unix epoch, used for orders without a creation date
    pub const EPOCH: Timestamp = Timestamp::Instant(DateTime::<Utc>::UNIX_EPOCH);

    /// Parse any of the accepted textual forms
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Instant(dt.with_timezone(&Utc)));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Self::Local(naive));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| Self::Local(date.and_time(chrono::NaiveTime::MIN)))
    }

    /// Build from epoch milliseconds
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Self::Instant)
    }

    /// Pin to the business timezone
    ///
    /// A local time that falls into a DST gap is read as UTC.
    pub fn in_tz(&self, tz: Tz) -> DateTime<Tz> {
        match self {
            Self::Instant(dt) => dt.with_timezone(&tz),
            Self::Local(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(naive)),
        }
    }

    /// Epoch milliseconds in the given timezone
    pub fn millis(&self, tz: Tz) -> i64 {
        self.in_tz(tz).timestamp_millis()
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Instant(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Self::Local(naive) => {
                serializer.serialize_str(&naive.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// Optional timestamp; unparseable values are treated like missing ones
pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Millis(ms)) => Timestamp::from_millis(ms),
        Some(RawTimestamp::Text(text)) => Timestamp::parse(&text),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("2024-03-01T09:30:00.000Z").unwrap();
        let paris = ts.in_tz(chrono_tz::Europe::Paris);
        assert_eq!(paris.hour(), 10);
    }

    #[test]
    fn test_parse_naive_is_local() {
        let ts = Timestamp::parse("2024-03-01 23:59:59").unwrap();
        let tunis = ts.in_tz(chrono_tz::Africa::Tunis);
        assert_eq!((tunis.day(), tunis.hour(), tunis.minute()), (1, 23, 59));
    }

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("2024-04-01").unwrap();
        let local = ts.in_tz(chrono_tz::UTC);
        assert_eq!((local.month(), local.day(), local.hour()), (4, 1, 0));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(Timestamp::parse("yesterday"), None);
        assert_eq!(Timestamp::parse(""), None);
    }

    #[test]
    fn test_epoch_constant() {
        assert_eq!(Timestamp::EPOCH.millis(chrono_tz::UTC), 0);
    }
}
