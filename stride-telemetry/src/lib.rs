//! Telemetry collection for Stride wearables.
//!
//! A single periodic task owns a [`TaggedValueStore`] holding the latest [`Reading`] per [`Tag`]. The task first
//! retries its sensor setup until it succeeds, then collects readings at a fixed cadence
//! (see [`lifecycle`]). Other parts of the firmware snapshot the store to JSON with [`codec::encode`] for
//! transmission or storage, and rebuild it with [`codec::decode`].
//!
//! ```
//! use stride_telemetry::{Tag, TaggedValueStore, Timestamp, codec};
//!
//! let store = TaggedValueStore::with_name("NAME");
//! store.insert_at(Tag::Heartrate, Timestamp::from_secs(1000), "72");
//!
//! let document = codec::encode(&store);
//! assert_eq!(document["NAME"]["heartrate"]["val"], "72");
//!
//! let decoded = codec::decode("NAME", &document);
//! assert_eq!(decoded.len(), Tag::COUNT);
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod lifecycle;
mod reading;
mod store;
mod tag;
pub mod task;

pub use self::lifecycle::{
    LifecycleConfig, LifecycleState, LifecycleStatus, Never, Sensors, SetupNotReady, TaskLifecycle,
};
pub use self::reading::{Reading, Timestamp};
pub use self::store::{Snapshot, TaggedValueStore};
pub use self::tag::{Tag, UnknownTag};
pub use self::task::{InitError, StopHandle, TelemetryTask};
