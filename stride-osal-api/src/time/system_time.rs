//! Wall-clock time.

use crate::time::Duration;

/// Provides a measurement of the system (wall-clock) time.
pub trait SystemTime {
    /// Calculates the [`Duration`] elapsed since the Unix epoch.
    ///
    /// ## Errors
    ///
    /// - [`SystemTimeError::Unsynchronized`] when the platform has no valid wall-clock time yet (e.g. before the
    ///   first time sync on a board without a battery-backed RTC).
    fn duration_since_epoch() -> Result<Duration, SystemTimeError>;
}

/// An error that may happen while working with system time.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SystemTimeError {
    /// Occurs when an attempt is made to get system time, but it was not synchronized earlier.
    Unsynchronized,
}

impl core::error::Error for SystemTimeError {}

impl core::fmt::Display for SystemTimeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SystemTimeError::Unsynchronized => write!(f, "system time is not synchronized"),
        }
    }
}
