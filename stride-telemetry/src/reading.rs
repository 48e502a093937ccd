use core::fmt;

use stride_osal_api::time::Duration;

/// Whole seconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch, also the timestamp of a default [`Reading`].
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from seconds since the epoch.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Creates a timestamp from a duration since the epoch, dropping the sub-second part.
    ///
    /// ```
    /// use stride_osal_api::time::Duration;
    /// use stride_telemetry::Timestamp;
    ///
    /// let timestamp = Timestamp::from_duration_since_epoch(Duration::from_millis(1_999));
    /// assert_eq!(timestamp.as_secs(), 1);
    /// ```
    pub fn from_duration_since_epoch(since_epoch: Duration) -> Self {
        Self(i64::try_from(since_epoch.as_secs()).unwrap_or(i64::MAX))
    }

    /// Returns the seconds since the epoch.
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// The latest known measurement for a tag.
///
/// Values are kept as text so each tag can use whatever format its sensor produces ("72", "5:12", "11.4").
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Reading {
    timestamp: Timestamp,
    value: String,
}

impl Reading {
    /// Creates a reading.
    pub fn new(timestamp: Timestamp, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// When the measurement was taken.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The measurement as text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` for the placeholder reading (epoch timestamp, empty value).
    pub fn is_default(&self) -> bool {
        self.timestamp == Timestamp::EPOCH && self.value.is_empty()
    }
}
