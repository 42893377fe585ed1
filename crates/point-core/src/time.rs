//! Timestamps with a fixed write precision.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Unit a timestamp is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Precision {
    #[default]
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
}

impl Precision {
    /// Canonical short name (`ns`, `us`, `ms`, `s`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Nanosecond => "ns",
            Precision::Microsecond => "us",
            Precision::Millisecond => "ms",
            Precision::Second => "s",
        }
    }

    /// Number of nanoseconds in one unit of this precision.
    pub fn nanos_per_unit(&self) -> i64 {
        match self {
            Precision::Nanosecond => 1,
            Precision::Microsecond => 1_000,
            Precision::Millisecond => 1_000_000,
            Precision::Second => NANOS_PER_SECOND,
        }
    }

    /// Convert nanoseconds since the epoch into whole units of this precision.
    pub fn units_since_epoch(&self, nanos: i64) -> i64 {
        nanos.div_euclid(self.nanos_per_unit())
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "ns" => Ok(Precision::Nanosecond),
            "u" | "us" => Ok(Precision::Microsecond),
            "ms" => Ok(Precision::Millisecond),
            "s" => Ok(Precision::Second),
            _ => Err(CoreError::InvalidPrecision(s.to_string())),
        }
    }
}

impl TryFrom<String> for Precision {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Precision> for String {
    fn from(precision: Precision) -> Self {
        precision.as_str().to_string()
    }
}

/// A time value reported at a fixed precision.
///
/// The precision is set once at construction. The time value itself is an
/// atomic nanosecond count, so it can be replaced through a shared reference
/// while other tasks read the same point.
#[derive(Debug)]
pub struct Timestamp {
    precision: Precision,
    unix_nanos: AtomicI64,
}

impl Timestamp {
    /// Create a timestamp holding the Unix epoch.
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            unix_nanos: AtomicI64::new(0),
        }
    }

    /// Create a timestamp holding the given time.
    pub fn at(precision: Precision, time: DateTime<Utc>) -> Self {
        Self {
            precision,
            unix_nanos: AtomicI64::new(to_unix_nanos(time)),
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Replace the time value. The precision is unchanged.
    pub fn set_time(&self, time: DateTime<Utc>) {
        self.unix_nanos.store(to_unix_nanos(time), Ordering::Relaxed);
    }

    /// Current time value.
    pub fn time(&self) -> DateTime<Utc> {
        let nanos = self.unix_nanos();
        DateTime::from_timestamp(
            nanos.div_euclid(NANOS_PER_SECOND),
            nanos.rem_euclid(NANOS_PER_SECOND) as u32,
        )
        .unwrap_or_default()
    }

    /// Nanoseconds since the Unix epoch.
    pub fn unix_nanos(&self) -> i64 {
        self.unix_nanos.load(Ordering::Relaxed)
    }

    /// Time value in whole units of the precision, e.g. milliseconds since
    /// the epoch for [`Precision::Millisecond`].
    pub fn value(&self) -> i64 {
        self.precision.units_since_epoch(self.unix_nanos())
    }
}

impl Clone for Timestamp {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            unix_nanos: AtomicI64::new(self.unix_nanos()),
        }
    }
}

/// Times outside the i64 nanosecond range saturate.
fn to_unix_nanos(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt().unwrap_or(if time.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
