//! This module implements an [`Instant`] with microsecond precision.

use core::fmt;
use core::num::NonZeroU64;

use super::Duration;

/// A point on the platform's monotonic clock.
///
/// Only meaningful relative to other instants from the same [`TimeAbstraction`](super::TimeAbstraction).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    micros: NonZeroU64,
}

impl Instant {
    /// The largest value that can be represented by the [`Instant`] type.
    pub const MAX: Instant = Instant {
        micros: NonZeroU64::MAX,
    };

    /// The smallest value that can be represented by the [`Instant`] type.
    pub const MIN: Instant = Instant {
        micros: NonZeroU64::MIN,
    };

    /// Returns the [`Duration`] between this [`Instant`] and `earlier`, or `None` if `earlier` is later than this.
    ///
    /// # Examples
    ///
    /// ```
    /// use stride_osal_api::time::{Duration, Instant};
    ///
    /// let later = Instant::MIN.checked_add(Duration::from_secs(2)).unwrap();
    /// assert_eq!(later.duration_since(Instant::MIN), Some(Duration::from_secs(2)));
    /// assert_eq!(Instant::MIN.duration_since(later), None);
    /// ```
    pub const fn duration_since(&self, earlier: Instant) -> Option<Duration> {
        if self.micros.get() < earlier.micros.get() {
            return None;
        }

        Some(Duration::from_micros(
            self.micros.get() - earlier.micros.get(),
        ))
    }

    /// Adds one [`Duration`] to self, returning a new [`Instant`] or None in the event of an overflow.
    pub fn checked_add(self, rhs: Duration) -> Option<Instant> {
        self.micros
            .checked_add(rhs.as_micros())
            .map(|micros| Instant { micros })
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(
            &Duration::from_micros(self.micros.get() - Self::MIN.micros.get()),
            f,
        )
    }
}
