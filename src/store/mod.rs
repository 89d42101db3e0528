//! Partition-file store.
//!
//! [`PartitionFileStore`] persists one JSON file per partition key under a
//! fixed root directory. Every operation re-reads the affected file from
//! disk; no state is cached between calls, so the store is stateless except
//! for the directory contents.
//!
//! Write operations follow a load-mutate-rewrite cycle and hold a
//! per-partition lock for the whole window. Reads are lock-free snapshots.

mod batch;
mod locks;
mod partition;

pub use batch::{BatchMode, BatchOptions};

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::record::{normalize_row_key, row_key_eq, Record, RecordId};

use locks::PartitionLocks;

/// A store mapping `(partition key, row key)` to records of type `R`,
/// materialized as one JSON array file per partition key.
///
/// Construction fixes the root directory for the store's lifetime and
/// creates it (recursively) if absent.
#[derive(Debug)]
pub struct PartitionFileStore<R: Record> {
    root: PathBuf,
    locks: PartitionLocks,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> PartitionFileStore<R> {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// `Io` if the directory cannot be created or accessed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::Io {
            path: root.clone(),
            source: e,
        })?;

        debug!(root = %root.display(), "opened partition file store");
        Ok(Self {
            root,
            locks: PartitionLocks::new(),
            _marker: PhantomData,
        })
    }

    /// The root directory holding the partition files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads every record from every partition file under the root.
    ///
    /// The scan is non-recursive and only considers files with the partition
    /// naming suffix. Order across partitions is unspecified.
    ///
    /// # Errors
    /// `Malformed` aborts the whole scan on the first unparseable file;
    /// `Io` on filesystem failure.
    pub fn get_all(&self) -> StoreResult<Vec<R>> {
        let mut all = Vec::new();
        for path in partition::scan_partitions(&self.root)? {
            let mut records: Vec<R> = partition::read_partition(&path)?;
            all.append(&mut records);
        }
        Ok(all)
    }

    /// Loads one partition. A missing file is an empty partition, not an
    /// error.
    ///
    /// # Errors
    /// `InvalidPartitionKey`, `Io`, or `Malformed`.
    pub fn get_partition(&self, partition_key: &str) -> StoreResult<Vec<R>> {
        partition::validate_partition_key(partition_key)?;
        partition::read_partition(&partition::partition_path(&self.root, partition_key))
    }

    /// Looks up a single record by identity. Row-key comparison is
    /// case-insensitive.
    ///
    /// # Errors
    /// `NotFound` if no record matches, including when the partition file
    /// does not exist.
    pub fn get(&self, partition_key: &str, row_key: &str) -> StoreResult<R> {
        self.get_partition(partition_key)?
            .into_iter()
            .find(|r| row_key_eq(r.row_key(), row_key))
            .ok_or_else(|| StoreError::not_found(partition_key, row_key))
    }

    /// Returns true if a record with this identity exists.
    ///
    /// # Errors
    /// `InvalidPartitionKey`, `Io`, or `Malformed`.
    pub fn exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool> {
        Ok(self
            .get_partition(partition_key)?
            .iter()
            .any(|r| row_key_eq(r.row_key(), row_key)))
    }

    /// Number of records in one partition.
    ///
    /// # Errors
    /// `InvalidPartitionKey`, `Io`, or `Malformed`.
    pub fn count(&self, partition_key: &str) -> StoreResult<usize> {
        Ok(self.get_partition(partition_key)?.len())
    }

    /// The partition keys currently present on disk, decoded from file
    /// names. Order is unspecified.
    ///
    /// # Errors
    /// `Io` on filesystem failure.
    pub fn partition_keys(&self) -> StoreResult<Vec<String>> {
        Ok(partition::scan_partitions(&self.root)?
            .iter()
            .filter_map(|p| partition::partition_key_of(p))
            .collect())
    }

    /// Inserts a new record.
    ///
    /// # Errors
    /// `AlreadyExists` (carrying the offending identity) if the row key is
    /// already taken in the target partition.
    pub fn add(&self, record: &R) -> StoreResult<()> {
        let key = record.partition_key();
        partition::validate_partition_key(key)?;
        let lock = self.locks.handle(key);
        let _guard = locks::hold(&lock);

        let path = partition::partition_path(&self.root, key);
        let mut records: Vec<R> = partition::read_partition(&path)?;

        if records.iter().any(|r| row_key_eq(r.row_key(), record.row_key())) {
            return Err(StoreError::already_exists(RecordId::of(record)));
        }

        records.push(record.clone());
        partition::write_partition(&path, &records)
    }

    /// Inserts a record, or replaces the existing one in place (preserving
    /// its position in the partition file). Never fails on key collisions.
    ///
    /// # Errors
    /// `InvalidPartitionKey`, `Io`, or `Malformed`.
    pub fn add_or_update(&self, record: &R) -> StoreResult<()> {
        let key = record.partition_key();
        partition::validate_partition_key(key)?;
        let lock = self.locks.handle(key);
        let _guard = locks::hold(&lock);

        let path = partition::partition_path(&self.root, key);
        let mut records: Vec<R> = partition::read_partition(&path)?;

        match records
            .iter()
            .position(|r| row_key_eq(r.row_key(), record.row_key()))
        {
            Some(pos) => records[pos] = record.clone(),
            None => records.push(record.clone()),
        }

        partition::write_partition(&path, &records)
    }

    /// Replaces an existing record in place.
    ///
    /// # Errors
    /// `NotFound` if no record with this row key exists in the target
    /// partition.
    pub fn update(&self, record: &R) -> StoreResult<()> {
        let key = record.partition_key();
        partition::validate_partition_key(key)?;
        let lock = self.locks.handle(key);
        let _guard = locks::hold(&lock);

        let path = partition::partition_path(&self.root, key);
        let mut records: Vec<R> = partition::read_partition(&path)?;

        let pos = records
            .iter()
            .position(|r| row_key_eq(r.row_key(), record.row_key()))
            .ok_or_else(|| StoreError::not_found(key, record.row_key()))?;

        records[pos] = record.clone();
        partition::write_partition(&path, &records)
    }

    /// Applies one insert per record, sequentially, in input order.
    ///
    /// With [`BatchMode::Upsert`] (the default) each record gets
    /// [`add_or_update`] semantics. The batch is not transactional: a failure
    /// partway through leaves prior records already committed to disk.
    ///
    /// With [`BatchMode::InsertOnly`] a pre-check loads each affected
    /// partition once and rejects the entire batch before anything is
    /// written if any incoming row key already exists on disk or collides
    /// with another record in the batch. A concurrent insert racing the
    /// window between pre-check and apply can still fail an individual
    /// record; that window is not guarded.
    ///
    /// # Errors
    /// `AlreadyExists` listing every colliding identity when the
    /// insert-only pre-check fails.
    ///
    /// [`add_or_update`]: Self::add_or_update
    pub fn add_batch(&self, records: &[R], options: BatchOptions) -> StoreResult<()> {
        match options.mode {
            BatchMode::Upsert => {
                for record in records {
                    self.add_or_update(record)?;
                }
                Ok(())
            }
            BatchMode::InsertOnly => {
                self.precheck_insert_only(records)?;
                for record in records {
                    self.add(record)?;
                }
                Ok(())
            }
        }
    }

    /// Removes a record by identity, returning it.
    ///
    /// The partition file is rewritten without the record, or deleted
    /// entirely when the partition becomes empty.
    ///
    /// # Errors
    /// `NotFound` if no record matches.
    pub fn delete(&self, partition_key: &str, row_key: &str) -> StoreResult<R> {
        partition::validate_partition_key(partition_key)?;
        let lock = self.locks.handle(partition_key);
        let _guard = locks::hold(&lock);

        let path = partition::partition_path(&self.root, partition_key);
        let mut records: Vec<R> = partition::read_partition(&path)?;

        let pos = records
            .iter()
            .position(|r| row_key_eq(r.row_key(), row_key))
            .ok_or_else(|| StoreError::not_found(partition_key, row_key))?;

        let removed = records.remove(pos);
        partition::write_partition(&path, &records)?;
        Ok(removed)
    }

    /// Removes the record with the same identity as `record`, returning the
    /// stored copy.
    ///
    /// # Errors
    /// `NotFound` if no record matches.
    pub fn delete_record(&self, record: &R) -> StoreResult<R> {
        self.delete(record.partition_key(), record.row_key())
    }

    /// Deletes a whole partition file. A missing file is a no-op, not an
    /// error.
    ///
    /// # Errors
    /// `InvalidPartitionKey` or `Io`.
    pub fn delete_partition(&self, partition_key: &str) -> StoreResult<()> {
        partition::validate_partition_key(partition_key)?;
        let lock = self.locks.handle(partition_key);
        let _guard = locks::hold(&lock);

        partition::remove_partition(&partition::partition_path(&self.root, partition_key))
    }

    /// Insert-only collision pre-check: loads each affected partition once
    /// and collects every identity that already exists on disk or repeats
    /// within the batch.
    fn precheck_insert_only(&self, records: &[R]) -> StoreResult<()> {
        let mut collisions: Vec<RecordId> = Vec::new();

        for (key, group) in batch::group_by_partition(records) {
            partition::validate_partition_key(key)?;
            let existing: Vec<R> =
                partition::read_partition(&partition::partition_path(&self.root, key))?;

            let mut seen: std::collections::HashSet<String> = existing
                .iter()
                .map(|r| normalize_row_key(r.row_key()))
                .collect();

            for record in group {
                if !seen.insert(normalize_row_key(record.row_key())) {
                    collisions.push(RecordId::of(record));
                }
            }
        }

        if collisions.is_empty() {
            Ok(())
        } else {
            warn!(collisions = collisions.len(), "rejected insert-only batch");
            Err(StoreError::AlreadyExists { ids: collisions })
        }
    }
}
