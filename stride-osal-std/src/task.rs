//! Execution contexts backed by dedicated OS threads.

use std::future::Future;

pub use stride_osal_api::task::{SpawnAbstraction, TaskConfig};
use stride_osal_api::{Error, Result};

use crate::IntoOsalError;

/// Implements [`SpawnAbstraction`] by starting a named OS thread with the configured stack size.
///
/// Each thread owns a current-thread Tokio runtime with the time driver enabled, so futures using
/// [`Time`](crate::time::Time) work on it. Thread priorities are not portable and [`TaskConfig::priority`] is
/// ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spawner;

impl SpawnAbstraction for Spawner {
    type Handle = std::thread::JoinHandle<()>;

    fn spawn<F, Fut>(&self, config: &TaskConfig, entry: F) -> Result<Self::Handle>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        if config.stack_size == 0 {
            return Err(Error::InvalidArgument);
        }

        // Built here rather than on the new thread so failures reach the caller.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(IntoOsalError::into_osal_error)?;

        std::thread::Builder::new()
            .name(config.name.to_owned())
            .stack_size(config.stack_size)
            .spawn(move || runtime.block_on(entry()))
            .map_err(IntoOsalError::into_osal_error)
    }
}
