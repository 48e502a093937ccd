//! Abstractions for creating dedicated execution contexts.
//!
//! A platform hands out long-running contexts (an RTOS task, an OS thread) that each drive a single future to
//! completion. The context is sized up front: its stack is fixed at creation and never grows.

use core::future::Future;

use crate::Result;

/// Parameters for creating an execution context through [`SpawnAbstraction::spawn`].
///
/// # Examples
///
/// ```
/// use stride_osal_api::task::TaskConfig;
///
/// let config = TaskConfig::new("SENSORS").with_stack_size(16 * 1024).with_priority(3);
/// assert_eq!(config.name, "SENSORS");
/// assert_eq!(config.stack_size, 16 * 1024);
/// assert_eq!(config.priority, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    /// Human readable name, shown by the platform's task list / thread name.
    pub name: &'static str,
    /// Stack size in bytes.
    pub stack_size: usize,
    /// Scheduling priority, higher is more urgent. Platforms without priorities ignore it.
    pub priority: u8,
}

impl TaskConfig {
    /// Stack size used when none is given.
    pub const DEFAULT_STACK_SIZE: usize = 256 * 1024;

    /// Priority used when none is given.
    pub const DEFAULT_PRIORITY: u8 = 5;

    /// Creates a config with the default stack size and priority.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            stack_size: Self::DEFAULT_STACK_SIZE,
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    /// Sets the stack size in bytes.
    pub const fn with_stack_size(self, stack_size: usize) -> Self {
        Self { stack_size, ..self }
    }

    /// Sets the scheduling priority.
    pub const fn with_priority(self, priority: u8) -> Self {
        Self { priority, ..self }
    }
}

/// `SpawnAbstraction` creates execution contexts in a platform-agnostic manner.
pub trait SpawnAbstraction {
    /// A handle to the created context.
    type Handle;

    /// Creates a new execution context described by `config` and drives the future returned by `entry` on it.
    ///
    /// `entry` is called on the new context, so the future itself does not need to be `Send`.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfMemory`](crate::Error::OutOfMemory) when the platform has no memory or task slot left.
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) when the platform rejects `config`.
    fn spawn<F, Fut>(&self, config: &TaskConfig, entry: F) -> Result<Self::Handle>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static;
}
