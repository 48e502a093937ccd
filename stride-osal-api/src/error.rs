/// A result with the [`Error`] error.
pub type Result<T> = core::result::Result<T, Error>;

/// An error that may happen while talking to the underlying operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The platform ran out of memory or task slots during the action.
    OutOfMemory,
    /// The platform rejected the request, e.g. an unsupported stack size.
    InvalidArgument,
    /// Could not apply the operation due to unknown error.
    Unknown,
}

impl core::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::Unknown => write!(f, "unknown error"),
        }
    }
}
