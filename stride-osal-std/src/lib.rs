//! Std operating system abstraction layer for Stride.
//!
//! This provides the primitives the telemetry task needs on a hosted target, using the std library and [`tokio`].

#![forbid(unsafe_code)]

pub mod task;
pub mod time;

pub use stride_osal_api::{Error, Result};

/// Helper trait to convert errors into osal errors.
///
/// We cannot implement `From` as that would be part of the public API.
pub(crate) trait IntoOsalError<E>
where
    E: core::error::Error,
{
    /// Converts the error into an OSAL error.
    fn into_osal_error(self) -> E;
}

impl IntoOsalError<Error> for std::io::Error {
    fn into_osal_error(self) -> Error {
        match self.kind() {
            // Thread creation reports `EAGAIN` when the process hits its thread limit.
            std::io::ErrorKind::OutOfMemory | std::io::ErrorKind::WouldBlock => Error::OutOfMemory,
            std::io::ErrorKind::InvalidInput => Error::InvalidArgument,
            _ => Error::Unknown,
        }
    }
}
