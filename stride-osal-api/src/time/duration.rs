//! This module implements a [`Duration`] with microsecond precision.

use core::fmt;
use core::num::TryFromIntError;

/// Duration represents a span of time.
///
/// Negative durations are not supported.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    micros: u64,
}

impl Duration {
    /// The largest value that can be represented by the `Duration` type.
    pub const MAX: Duration = Duration { micros: u64::MAX };

    /// A duration of zero time.
    ///
    /// # Examples
    ///
    /// ```
    /// use stride_osal_api::time::Duration;
    ///
    /// assert_eq!(Duration::ZERO, Duration::from_micros(0));
    /// ```
    pub const ZERO: Duration = Duration { micros: 0 };

    const MICROS_PER_SECOND: u64 = 1_000_000;
    const MICROS_PER_MILLI: u64 = 1_000;

    /// Creates a duration from the specified number of seconds, saturating at [`Duration::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stride_osal_api::time::Duration;
    ///
    /// assert_eq!(Duration::from_secs(1), Duration::from_millis(1000));
    /// assert_eq!(Duration::from_secs(u64::MAX), Duration::MAX);
    /// ```
    pub const fn from_secs(secs: u64) -> Duration {
        Duration {
            micros: secs.saturating_mul(Self::MICROS_PER_SECOND),
        }
    }

    /// Creates a duration from the specified number of milliseconds, saturating at [`Duration::MAX`].
    pub const fn from_millis(millis: u64) -> Duration {
        Duration {
            micros: millis.saturating_mul(Self::MICROS_PER_MILLI),
        }
    }

    /// Creates a duration from the specified number of microseconds.
    pub const fn from_micros(micros: u64) -> Duration {
        Duration { micros }
    }

    /// Returns the total amount of whole seconds, rounded down.
    ///
    /// # Examples
    ///
    /// ```
    /// use stride_osal_api::time::Duration;
    ///
    /// assert_eq!(Duration::from_millis(1980).as_secs(), 1);
    /// ```
    pub const fn as_secs(&self) -> u64 {
        self.micros / Self::MICROS_PER_SECOND
    }

    /// Returns the total amount of milliseconds, rounded down.
    pub const fn as_millis(&self) -> u64 {
        self.micros / Self::MICROS_PER_MILLI
    }

    /// Returns the total amount of microseconds.
    pub const fn as_micros(&self) -> u64 {
        self.micros
    }
}

impl fmt::Debug for Duration {
    /// # Examples
    ///
    /// ```
    /// use stride_osal_api::time::Duration;
    ///
    /// assert_eq!(format!("{:?}", Duration::from_millis(1980)), "1s.980000us");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}s.{}us",
            self.as_secs(),
            self.as_micros() % Self::MICROS_PER_SECOND
        )
    }
}

impl TryFrom<core::time::Duration> for Duration {
    type Error = TryFromIntError;

    fn try_from(value: core::time::Duration) -> Result<Self, Self::Error> {
        value.as_micros().try_into().map(Self::from_micros)
    }
}

impl From<Duration> for core::time::Duration {
    fn from(value: Duration) -> Self {
        Self::from_micros(value.as_micros())
    }
}
