//! Creation of the telemetry task's execution context.

use core::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;
use stride_osal_api::Error;
use stride_osal_api::task::{SpawnAbstraction, TaskConfig};
use stride_osal_api::time::TimeAbstraction;
use tracing::Instrument;

use crate::{LifecycleStatus, Sensors, TaggedValueStore, TaskLifecycle};

/// Why [`TelemetryTask::init`] did not start the task.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    /// The task was already started by an earlier call.
    #[error("telemetry task is already initialized")]
    AlreadyInitialized,

    /// The platform had no memory or task slot for the execution context.
    #[error("no resources left to create the telemetry task")]
    ResourceExhausted(#[source] Error),

    /// The platform refused to create the execution context for another reason.
    #[error("failed to create the telemetry task")]
    Spawn(#[source] Error),
}

impl From<Error> for InitError {
    fn from(error: Error) -> Self {
        match error {
            Error::OutOfMemory => InitError::ResourceExhausted(error),
            _ => InitError::Spawn(error),
        }
    }
}

/// Requests the telemetry task to stop at its next suspension point.
#[derive(Debug)]
pub struct StopHandle {
    sender: oneshot::Sender<()>,
}

impl StopHandle {
    /// Signals the task to stop.
    pub fn stop(self) {
        // The task has already finished if the receiver is gone.
        let _ = self.sender.send(());
    }
}

type Pending<T, S> = (TaskLifecycle<T, S>, oneshot::Receiver<()>);

/// Bootstraps exactly one execution context running a [`TaskLifecycle`].
///
/// The lifecycle is handed to the execution context when it is created; until then, and after a failed creation,
/// it stays here so [`init`](Self::init) can be retried.
pub struct TelemetryTask<T, S> {
    config: TaskConfig,
    pending: Arc<Mutex<Option<Pending<T, S>>>>,
    initialized: bool,
    store: Arc<TaggedValueStore>,
    status: LifecycleStatus,
    stop: Option<StopHandle>,
}

impl<T, S> fmt::Debug for TelemetryTask<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryTask")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .field("state", &self.status.get())
            .finish_non_exhaustive()
    }
}

impl<T, S> TelemetryTask<T, S>
where
    T: TimeAbstraction + 'static,
    S: Sensors + Send + 'static,
{
    /// Name of the task when none is configured.
    pub const DEFAULT_NAME: &'static str = "MAIN";

    /// Prepares `lifecycle` to run on a context described by `config`.
    pub fn new(lifecycle: TaskLifecycle<T, S>, config: TaskConfig) -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            config,
            store: lifecycle.store(),
            status: lifecycle.status(),
            pending: Arc::new(Mutex::new(Some((lifecycle, receiver)))),
            initialized: false,
            stop: Some(StopHandle { sender }),
        }
    }

    /// Prepares `lifecycle` with the default [`TaskConfig`] named [`DEFAULT_NAME`](Self::DEFAULT_NAME).
    pub fn with_defaults(lifecycle: TaskLifecycle<T, S>) -> Self {
        Self::new(lifecycle, TaskConfig::new(Self::DEFAULT_NAME))
    }

    /// Creates the execution context and starts the lifecycle on it.
    ///
    /// # Errors
    ///
    /// - [`InitError::AlreadyInitialized`] on every call after a successful one; nothing is created.
    /// - [`InitError::ResourceExhausted`] / [`InitError::Spawn`] if the platform could not create the context.
    ///   The task stays uninitialized and the call may be retried.
    pub fn init<P: SpawnAbstraction>(&mut self, spawner: &P) -> Result<P::Handle, InitError> {
        if self.initialized {
            return Err(InitError::AlreadyInitialized);
        }

        let pending = self.pending.clone();
        let name = self.config.name;
        let handle = spawner
            .spawn(&self.config, move || {
                let taken = pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                async move {
                    let Some((lifecycle, stop)) = taken else {
                        return;
                    };
                    lifecycle
                        .run_until(stop_requested(stop))
                        .instrument(tracing::info_span!("telemetry_task", name))
                        .await;
                    tracing::info!(name, "telemetry task stopped");
                }
            })
            .inspect_err(|error| {
                tracing::error!(name, %error, "failed to create telemetry task");
            })?;

        self.initialized = true;
        tracing::info!(
            name,
            stack_size = self.config.stack_size,
            priority = self.config.priority,
            "telemetry task created"
        );
        Ok(handle)
    }

    /// Whether [`init`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// A read handle to the task's store.
    pub fn store(&self) -> Arc<TaggedValueStore> {
        self.store.clone()
    }

    /// A handle to observe the task's lifecycle state.
    pub fn status(&self) -> LifecycleStatus {
        self.status.clone()
    }

    /// Takes the handle used to stop the task. Returns `None` once taken.
    ///
    /// A task whose stop handle is dropped without being used runs forever.
    pub fn stop_handle(&mut self) -> Option<StopHandle> {
        self.stop.take()
    }
}

/// Resolves once [`StopHandle::stop`] is called; a dropped handle never resolves.
async fn stop_requested(stop: oneshot::Receiver<()>) {
    if stop.await.is_err() {
        core::future::pending::<()>().await;
    }
}
