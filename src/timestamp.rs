//! Tick-count timestamps.
//!
//! On the wire a timestamp is a decimal count of 100-nanosecond ticks since
//! 0001-01-01T00:00:00. The integer is carried through unchanged, so a decode of an encoded
//! timestamp is bit-for-bit equal to the input.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RowcodeError};

/// Ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Nanoseconds in one tick.
const NANOS_PER_TICK: i64 = 100;

/// The largest representable tick count (9999-12-31T23:59:59.9999999).
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Tick count of 1970-01-01T00:00:00.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// A point in time stored as a fixed-resolution tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Timestamp(i64);

impl Timestamp {
    /// 0001-01-01T00:00:00.
    pub const MIN: Self = Self(0);
    /// 9999-12-31T23:59:59.9999999.
    pub const MAX: Self = Self(MAX_TICKS);
    /// 1970-01-01T00:00:00.
    pub const UNIX_EPOCH: Self = Self(UNIX_EPOCH_TICKS);

    /// Builds a timestamp from a raw tick count.
    ///
    /// Fails with a conversion error when `ticks` is outside `0..=MAX_TICKS`.
    pub fn from_ticks(ticks: i64) -> Result<Self> {
        if (0..=MAX_TICKS).contains(&ticks) {
            Ok(Self(ticks))
        } else {
            Err(RowcodeError::Conversion(format!(
                "tick count {ticks} is outside 0..={MAX_TICKS}"
            )))
        }
    }

    /// The raw tick count written on the wire.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Whole seconds since the Unix epoch.
    pub fn from_unix_seconds(seconds: i64) -> Result<Self> {
        seconds
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
            .ok_or_else(|| {
                RowcodeError::Conversion(format!("{seconds} seconds overflows the tick range"))
            })
            .and_then(Self::from_ticks)
    }

    /// Seconds since the Unix epoch, rounded to the nearest second (ties to even).
    pub fn to_unix_seconds(self) -> i64 {
        let delta = self.0 - UNIX_EPOCH_TICKS;
        let seconds = delta.div_euclid(TICKS_PER_SECOND);
        let remainder = delta.rem_euclid(TICKS_PER_SECOND);
        let half = TICKS_PER_SECOND / 2;
        if remainder > half || (remainder == half && seconds % 2 != 0) {
            seconds + 1
        } else {
            seconds
        }
    }

    /// Converts a [`SystemTime`], truncating to tick resolution.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let ticks = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => duration_ticks(after).and_then(|t| UNIX_EPOCH_TICKS.checked_add(t)),
            Err(before) => {
                duration_ticks(before.duration()).and_then(|t| UNIX_EPOCH_TICKS.checked_sub(t))
            }
        };
        ticks
            .ok_or_else(|| RowcodeError::Conversion("system time overflows the tick range".into()))
            .and_then(Self::from_ticks)
    }

    /// Converts to a [`SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        let delta = self.0 - UNIX_EPOCH_TICKS;
        let magnitude = ticks_duration(delta.unsigned_abs());
        if delta >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }

    /// The current wall-clock time.
    pub fn now() -> Result<Self> {
        Self::from_system_time(SystemTime::now())
    }
}

fn duration_ticks(duration: Duration) -> Option<i64> {
    i64::try_from(duration.as_nanos() / NANOS_PER_TICK as u128).ok()
}

fn ticks_duration(ticks: u64) -> Duration {
    let per_second = TICKS_PER_SECOND as u64;
    Duration::new(
        ticks / per_second,
        ((ticks % per_second) * NANOS_PER_TICK as u64) as u32,
    )
}

impl TryFrom<i64> for Timestamp {
    type Error = RowcodeError;

    fn try_from(ticks: i64) -> Result<Self> {
        Self::from_ticks(ticks)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = RowcodeError;

    fn from_str(s: &str) -> Result<Self> {
        let ticks = s
            .parse::<i64>()
            .map_err(|e| RowcodeError::Conversion(format!("invalid tick count `{s}`: {e}")))?;
        Self::from_ticks(ticks)
    }
}
