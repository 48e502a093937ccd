//! The Stride operating system abstraction layer API.
//!
//! Platform crates (`stride-osal-std`, board support crates) implement the traits in [`time`] and [`task`] so the
//! telemetry task never has to know which scheduler or clock it is running on.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

mod error;
pub mod task;
pub mod time;

pub use error::{Error, Result};
