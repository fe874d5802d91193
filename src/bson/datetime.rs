//! Module containing functionality related to BSON datetimes.

use std::{fmt, time::SystemTime};

use chrono::{SecondsFormat, Utc};

/// A BSON datetime: a signed count of milliseconds since the Unix epoch in UTC.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime(i64);

impl DateTime {
    /// The earliest representable datetime.
    pub const MIN: Self = Self::from_millis(i64::MIN);

    /// The latest representable datetime.
    pub const MAX: Self = Self::from_millis(i64::MAX);

    /// Makes a new `DateTime` from the number of non-leap milliseconds since the Unix epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns a `DateTime` representing the current moment.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Converts a [`SystemTime`], saturating at the representable bounds.
    pub fn from_system_time(st: SystemTime) -> Self {
        match st.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => Self(i64::try_from(d.as_millis()).unwrap_or(i64::MAX)),
            Err(e) => Self(
                i64::try_from(e.duration().as_millis())
                    .map(|millis| -millis)
                    .unwrap_or(i64::MIN),
            ),
        }
    }

    /// Returns the number of non-leap milliseconds since the Unix epoch.
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    pub(crate) fn to_chrono(self) -> Option<chrono::DateTime<Utc>> {
        chrono::DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// Formats this datetime as an RFC 3339 string with millisecond precision, if it is within
    /// the range chrono can represent.
    pub fn try_to_rfc3339_string(self) -> Option<String> {
        self.to_chrono()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Parses an RFC 3339 string.
    pub fn parse_rfc3339_str(s: impl AsRef<str>) -> Option<Self> {
        chrono::DateTime::parse_from_rfc3339(s.as_ref())
            .ok()
            .map(|dt| Self(dt.timestamp_millis()))
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple("DateTime");
        match self.try_to_rfc3339_string() {
            Some(s) => tup.field(&s),
            None => tup.field(&self.0),
        };
        tup.finish()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_to_rfc3339_string() {
            Some(s) => f.write_str(&s),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<SystemTime> for DateTime {
    fn from(st: SystemTime) -> Self {
        Self::from_system_time(st)
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(dt: chrono::DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}
