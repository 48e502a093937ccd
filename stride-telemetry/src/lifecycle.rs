//! The telemetry task's state machine.
//!
//! ```text
//! Uninitialized ──start──▶ RetryingSetup ──setup ok──▶ Running ─┐
//!                           │      ▲                      ▲      │ collect, sleep
//!                           └──────┘ setup failed, sleep  └──────┘
//! ```
//!
//! Setup is retried without limit at a fixed interval; sensor drivers on the device are expected to come up
//! eventually. Once running, the task collects and then sleeps for a fixed interval, forever.

#![allow(async_fn_in_trait, reason = "sensors run on a single execution context")]

use core::fmt;
use core::future::Future;
use core::marker::PhantomData;
use core::pin::{Pin, pin};
use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{Either, select};
use stride_osal_api::time::{Duration, TimeAbstraction};

use crate::TaggedValueStore;

/// A type that can never be constructed.
///
/// Returned by [`TaskLifecycle::run`], which only ends when the process does.
// TODO(https://github.com/rust-lang/rust/issues/35121)
/// This type will be replaced with the never type [`!`] once it is stabilized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Never {}

impl fmt::Display for Never {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// Sensors are not ready yet; setup will be retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("sensor setup not ready: {reason}")]
pub struct SetupNotReady {
    reason: Cow<'static, str>,
}

impl SetupNotReady {
    /// Creates the error with a short description of what is missing.
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// What was not ready.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The per-sensor collaborators driven by a [`TaskLifecycle`].
pub trait Sensors {
    /// Brings the sensors up. Called until it succeeds.
    async fn setup(&mut self) -> Result<(), SetupNotReady>;

    /// Reads the sensors and writes the results into `store`.
    ///
    /// Failures of individual sensors are handled here; the lifecycle keeps its cadence regardless.
    async fn collect(&mut self, store: &TaggedValueStore);
}

/// Timing of a [`TaskLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Delay between failed setup attempts.
    pub setup_retry: Duration,
    /// Delay after each collection.
    pub collect_interval: Duration,
}

impl LifecycleConfig {
    /// One second between setup attempts and between collections.
    pub const fn new() -> Self {
        Self {
            setup_retry: Duration::from_secs(1),
            collect_interval: Duration::from_secs(1),
        }
    }

    /// Sets the delay between failed setup attempts.
    pub const fn with_setup_retry(self, setup_retry: Duration) -> Self {
        Self {
            setup_retry,
            ..self
        }
    }

    /// Sets the delay after each collection.
    pub const fn with_collect_interval(self, collect_interval: Duration) -> Self {
        Self {
            collect_interval,
            ..self
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a [`TaskLifecycle`] currently is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not started yet.
    #[default]
    Uninitialized,
    /// Setup has been attempted `attempts` times without success.
    RetryingSetup {
        /// Failed setup attempts so far.
        attempts: u32,
    },
    /// Setup succeeded; `iterations` collections have completed.
    Running {
        /// Completed collections.
        iterations: u64,
    },
}

/// A cloneable view of a [`TaskLifecycle`]'s state, readable from other execution contexts.
#[derive(Debug, Clone, Default)]
pub struct LifecycleStatus {
    state: Arc<Mutex<LifecycleState>>,
}

impl LifecycleStatus {
    /// The current state.
    pub fn get(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, state: LifecycleState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Owns a [`TaggedValueStore`] and drives [`Sensors`] through setup and periodic collection.
///
/// `T` supplies the delays.
pub struct TaskLifecycle<T, S> {
    sensors: S,
    store: Arc<TaggedValueStore>,
    config: LifecycleConfig,
    status: LifecycleStatus,
    _time: PhantomData<fn() -> T>,
}

impl<T, S> fmt::Debug for TaskLifecycle<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskLifecycle")
            .field("store", &self.store.name())
            .field("config", &self.config)
            .field("state", &self.status.get())
            .finish_non_exhaustive()
    }
}

impl<T, S> TaskLifecycle<T, S>
where
    T: TimeAbstraction,
    S: Sensors,
{
    /// Creates a lifecycle with the default one second intervals.
    pub fn new(sensors: S, store: TaggedValueStore) -> Self {
        Self {
            sensors,
            store: Arc::new(store),
            config: LifecycleConfig::default(),
            status: LifecycleStatus::default(),
            _time: PhantomData,
        }
    }

    /// Replaces the timing configuration.
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// A read handle to the store, for encoding snapshots while the task runs.
    pub fn store(&self) -> Arc<TaggedValueStore> {
        self.store.clone()
    }

    /// A handle to observe the lifecycle state.
    pub fn status(&self) -> LifecycleStatus {
        self.status.clone()
    }

    /// Runs setup and collection forever.
    pub async fn run(self) -> Never {
        self.run_until(core::future::pending::<Never>()).await
    }

    /// Runs like [`run`](Self::run) until `stop` resolves.
    ///
    /// `stop` is checked before each setup attempt and collection, and raced against every sleep, so the task
    /// returns at the next suspension point.
    pub async fn run_until<F: Future>(mut self, stop: F) -> F::Output {
        let mut stop = pin!(stop);

        let mut attempts = 0;
        self.status.set(LifecycleState::RetryingSetup { attempts });

        loop {
            if let Some(output) = stop.as_mut().now_or_never() {
                return output;
            }

            match self.sensors.setup().await {
                Ok(()) => break,
                Err(error) => {
                    attempts = attempts.saturating_add(1);
                    tracing::warn!(attempts, %error, "telemetry setup failed, retrying");
                    self.status.set(LifecycleState::RetryingSetup { attempts });
                }
            }

            if let Some(output) = Self::pause(self.config.setup_retry, stop.as_mut()).await {
                return output;
            }
        }

        tracing::info!(
            failed_attempts = attempts,
            store = self.store.name(),
            "telemetry setup complete, collecting"
        );

        let mut iterations = 0;
        self.status.set(LifecycleState::Running { iterations });

        loop {
            if let Some(output) = stop.as_mut().now_or_never() {
                return output;
            }

            self.sensors.collect(&self.store).await;
            iterations += 1;
            self.status.set(LifecycleState::Running { iterations });
            tracing::trace!(iterations, "telemetry collected");

            if let Some(output) = Self::pause(self.config.collect_interval, stop.as_mut()).await {
                return output;
            }
        }
    }

    /// Sleeps for `duration`, returning early with the output of `stop` if it resolves first.
    async fn pause<F: Future>(duration: Duration, stop: Pin<&mut F>) -> Option<F::Output> {
        match select(pin!(T::sleep(duration)), stop).await {
            Either::Left((result, _)) => {
                if let Err(error) = result {
                    tracing::warn!(%error, "telemetry task sleep failed");
                }
                None
            }
            Either::Right((output, _)) => Some(output),
        }
    }
}
