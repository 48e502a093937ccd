use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::{Mutex, MutexGuard, PoisonError};

use stride_osal_api::time::SystemTime;

use crate::{Reading, Tag, Timestamp};

/// Latest reading per [`Tag`], under a store name that becomes the root key of serialized documents.
///
/// Writers and readers may live on different execution contexts: updates replace a tag's whole reading under a lock,
/// so [`snapshot`](Self::snapshot) and [`get`](Self::get) never see a timestamp from one update paired with the
/// value of another.
#[derive(Debug)]
pub struct TaggedValueStore {
    name: String,
    readings: Mutex<HashMap<Tag, Reading>>,
}

impl TaggedValueStore {
    /// Name used until one is set.
    pub const DEFAULT_NAME: &'static str = "UNKNOWN";

    /// Creates an empty store named [`DEFAULT_NAME`](Self::DEFAULT_NAME).
    pub fn new() -> Self {
        Self::with_name(Self::DEFAULT_NAME)
    }

    /// Creates an empty store with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readings: Mutex::new(HashMap::with_capacity(Tag::COUNT)),
        }
    }

    /// The store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `value` for `tag`, stamped with the current wall-clock time of `C`.
    ///
    /// Replaces any previous reading for `tag`. A clock that has not been synchronized yet stamps the reading with
    /// [`Timestamp::EPOCH`].
    pub fn insert<C: SystemTime>(&self, tag: Tag, value: impl Into<String>) {
        let timestamp = match C::duration_since_epoch() {
            Ok(since_epoch) => Timestamp::from_duration_since_epoch(since_epoch),
            Err(error) => {
                tracing::warn!(%tag, %error, "no wall-clock time, stamping reading with the epoch");
                Timestamp::EPOCH
            }
        };
        self.replace(tag, Reading::new(timestamp, value));
    }

    /// Stores `value` for `tag` with an explicit timestamp, replacing any previous reading.
    pub fn insert_at(&self, tag: Tag, timestamp: Timestamp, value: impl Into<String>) {
        self.replace(tag, Reading::new(timestamp, value));
    }

    pub(crate) fn replace(&self, tag: Tag, reading: Reading) {
        self.lock().insert(tag, reading);
    }

    /// Returns a copy of the reading for `tag`, if any.
    pub fn get(&self, tag: Tag) -> Option<Reading> {
        self.lock().get(&tag).cloned()
    }

    /// Returns `true` if there is a reading for `tag`.
    pub fn contains(&self, tag: Tag) -> bool {
        self.lock().contains_key(&tag)
    }

    /// Number of tags with a reading.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no tag has a reading.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies all current readings.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            readings: self.lock().clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Tag, Reading>> {
        // Every update is a single map insert, so a panicking holder cannot leave a torn reading behind.
        self.readings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaggedValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TaggedValueStore {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            readings: Mutex::new(self.lock().clone()),
        }
    }
}

/// An immutable copy of a store's readings. Iteration order is unspecified.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Snapshot {
    readings: HashMap<Tag, Reading>,
}

impl Snapshot {
    /// The reading for `tag`, if any.
    pub fn get(&self, tag: Tag) -> Option<&Reading> {
        self.readings.get(&tag)
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns `true` if there are no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterates over `(tag, reading)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Reading)> {
        self.readings.iter().map(|(tag, reading)| (*tag, reading))
    }
}

impl IntoIterator for Snapshot {
    type Item = (Tag, Reading);
    type IntoIter = hash_map::IntoIter<Tag, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.into_iter()
    }
}
