//! Per-partition exclusive critical sections.
//!
//! Every write operation holds its partition's lock across the full
//! load-mutate-rewrite window, so two in-process writers on the same
//! partition serialize instead of overwriting each other's rewrite. Different
//! partitions never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Map from partition key to its exclusive lock.
#[derive(Debug, Default)]
pub(crate) struct PartitionLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PartitionLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The lock handle for `key`, created on first use.
    ///
    /// The handle outlives the map guard, so callers lock it without holding
    /// the registry mutex.
    pub(crate) fn handle(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Locks a partition handle.
///
/// A poisoned lock guards no data of its own (the partition state lives on
/// disk), so poison is cleared rather than propagated.
pub(crate) fn hold(handle: &Arc<Mutex<()>>) -> MutexGuard<'_, ()> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
