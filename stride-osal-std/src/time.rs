//! Time abstractions backed by `std::time` and [`tokio::time`].

pub use stride_osal_api::time::{
    Duration, Instant, SystemTime, SystemTimeError, TimeAbstraction,
};
use stride_osal_api::Error;

/// Implements the [`TimeAbstraction`] and [`SystemTime`] traits for standard Rust.
///
/// Sleeping relies on the Tokio runtime driving the current task, so the runtime must have time enabled.
#[derive(Debug)]
pub struct Time;

impl TimeAbstraction for Time {
    fn now() -> Instant {
        use std::sync::LazyLock;
        static EPOCH: LazyLock<std::time::Instant> = LazyLock::new(std::time::Instant::now);
        let elapsed = Duration::try_from(EPOCH.elapsed()).unwrap_or(Duration::MAX);
        Instant::MIN.checked_add(elapsed).unwrap_or(Instant::MAX)
    }

    async fn sleep(duration: Duration) -> Result<(), Error> {
        tokio::time::sleep(duration.into()).await;
        Ok(())
    }

    async fn sleep_until(deadline: Instant) -> Result<(), Error> {
        Self::sleep(
            deadline
                .duration_since(Self::now())
                .unwrap_or(Duration::ZERO),
        )
        .await
    }
}

impl SystemTime for Time {
    fn duration_since_epoch() -> Result<Duration, SystemTimeError> {
        // A host clock set before 1970 is as good as no clock at all.
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_err(|_| SystemTimeError::Unsynchronized)?;
        Duration::try_from(since_epoch).map_err(|_| SystemTimeError::Unsynchronized)
    }
}

#[cfg(test)]
mod tests {
    use core::pin::pin;

    use futures::future::FutureExt;
    use stride_osal_api::time::{Duration, SystemTime, TimeAbstraction};

    use crate::time::Time;

    #[test]
    fn system_time_is_after_2020() {
        let since_epoch = Time::duration_since_epoch().unwrap();
        // 2020-01-01T00:00:00Z
        assert!(since_epoch.as_secs() > 1_577_836_800);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_smoke_test() {
        let mut sleep = pin!(Time::sleep(Duration::from_secs(1)));

        assert!(sleep.as_mut().now_or_never().is_none());

        tokio::time::advance(std::time::Duration::from_millis(600)).await;

        assert!(sleep.as_mut().now_or_never().is_none());

        tokio::time::advance(std::time::Duration::from_millis(500)).await;

        assert!(matches!(sleep.as_mut().now_or_never(), Some(Ok(()))));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_until_smoke_test() {
        let mut sleep = pin!(Time::sleep_until(
            Time::now().checked_add(Duration::from_secs(5)).unwrap()
        ));

        assert!(sleep.as_mut().now_or_never().is_none());

        tokio::time::advance(std::time::Duration::from_secs(6)).await;

        assert!(matches!(sleep.as_mut().now_or_never(), Some(Ok(()))));
    }
}
