//! Batch-insert options and partition grouping.

use std::collections::HashMap;

use crate::record::Record;

/// Per-record semantics applied by [`PartitionFileStore::add_batch`].
///
/// [`PartitionFileStore::add_batch`]: crate::store::PartitionFileStore::add_batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Insert-or-replace per record. Never fails on key collisions.
    #[default]
    Upsert,
    /// Strict insert. The whole batch is rejected up front if any incoming
    /// row key already exists, or collides with another record in the batch.
    InsertOnly,
}

/// Options controlling a batch insert.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Per-record semantics. Defaults to [`BatchMode::Upsert`].
    pub mode: BatchMode,
}

impl BatchOptions {
    /// Options requesting strict-insert semantics.
    #[must_use]
    pub const fn insert_only() -> Self {
        Self {
            mode: BatchMode::InsertOnly,
        }
    }
}

/// Groups batch records by partition key, preserving first-seen partition
/// order and input order within each group.
pub(crate) fn group_by_partition<R: Record>(records: &[R]) -> Vec<(&str, Vec<&R>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&R>> = HashMap::new();

    for record in records {
        let key = record.partition_key();
        if !groups.contains_key(key) {
            order.push(key);
        }
        groups.entry(key).or_default().push(record);
    }

    order
        .into_iter()
        .map(|key| {
            let group = groups.remove(key).unwrap_or_default();
            (key, group)
        })
        .collect()
}
