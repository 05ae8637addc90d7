use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Integer-nanosecond sensor timestamp.
///
/// Recordings store time as floating-point seconds. Converting once to an
/// integer nanosecond count keeps bucket arithmetic exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp {
    nanos: i64,
}

impl Timestamp {
    /// Create a `Timestamp` from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Create a `Timestamp` from seconds (as `f64`), rounded to the nearest
    /// nanosecond. Values beyond the `i64` range saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_secs(secs: f64) -> Self {
        Self {
            nanos: (secs * 1_000_000_000.0).round() as i64,
        }
    }

    /// Raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> i64 {
        self.nanos
    }

    /// Elapsed seconds as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Start of the `period`-wide bucket that contains this timestamp.
    ///
    /// Buckets are anchored at the epoch, so negative timestamps floor
    /// towards negative infinity. `None` when the bucket start falls outside
    /// the `i64` range.
    #[must_use]
    pub const fn floor_to(&self, period: Period) -> Option<Self> {
        let p = period.nanos_i64();
        match self.nanos.div_euclid(p).checked_mul(p) {
            Some(nanos) => Some(Self { nanos }),
            None => None,
        }
    }

    /// Nanoseconds from `earlier` to `self`, `None` on overflow.
    #[must_use]
    pub const fn checked_since(&self, earlier: Self) -> Option<i64> {
        self.nanos.checked_sub(earlier.nanos)
    }
}

impl Add<Period> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Period) -> Self {
        Self {
            nanos: self.nanos + rhs.nanos_i64(),
        }
    }
}

impl Sub for Timestamp {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.nanos - rhs.nanos
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Fixed resampling period. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    nanos: u64,
}

impl Period {
    /// Create a period from whole milliseconds.
    pub fn from_millis(ms: u64) -> Result<Self, ConfigError> {
        if ms == 0 {
            return Err(ConfigError::InvalidPeriod(ms));
        }
        Ok(Self {
            nanos: ms * 1_000_000,
        })
    }

    /// Raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    #[allow(clippy::cast_possible_wrap)]
    const fn nanos_i64(&self) -> i64 {
        self.nanos as i64
    }
}

impl Default for Period {
    /// The 10 ms grid the recordings are resampled onto.
    fn default() -> Self {
        Self { nanos: 10_000_000 }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.nanos / 1_000_000)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
