//! Abstractions for time-based operations.
//!
//! [`TimeAbstraction`] is the monotonic clock plus the cooperative delay the telemetry loop suspends on between
//! iterations. [`SystemTime`] is the wall clock used to stamp readings. Both are implemented per platform; the
//! telemetry crates only ever name the traits.
//!
//! This module has its own [`Instant`] and [`Duration`] types to stay independent of `std`.

#![allow(async_fn_in_trait, reason = "auto-bounds are not necessary here")]

mod duration;
mod instant;
mod system_time;

pub use self::duration::Duration;
pub use self::instant::Instant;
pub use self::system_time::{SystemTime, SystemTimeError};
use crate::Error;

/// `TimeAbstraction` is used to perform time-related operations in a platform-agnostic manner.
pub trait TimeAbstraction {
    /// Retrieves the current monotonic time.
    fn now() -> Instant;

    /// Returns a future that resolves successfully at the specified `deadline` (or earlier with an error).
    async fn sleep_until(deadline: Instant) -> Result<(), Error>;

    /// Returns a future that resolves successfully after the specified `duration` (or earlier with an error).
    ///
    /// If the `duration` overflows `Instant`, the method sleeps until [`Instant::MAX`].
    async fn sleep(duration: Duration) -> Result<(), Error> {
        Self::sleep_until(Self::now().checked_add(duration).unwrap_or(Instant::MAX)).await
    }
}
