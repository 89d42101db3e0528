//! Error types for jsonshard.
//!
//! All errors are strongly typed using thiserror. Key-related failures carry
//! structured [`RecordId`] payloads rather than flat messages, so callers can
//! pattern-match and enumerate exactly which identities collided or were
//! missing.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::RecordId;

fn fmt_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record (or its partition file) does not exist, on an
    /// operation that requires existence.
    #[error("record not found: {id}")]
    NotFound {
        /// The missing identity.
        id: RecordId,
    },

    /// A record with the same identity already exists, on an operation that
    /// requires absence. Batch pre-checks list every colliding identity.
    #[error("record(s) already exist: {}", fmt_ids(.ids))]
    AlreadyExists {
        /// Every colliding identity, in input order.
        ids: Vec<RecordId>,
    },

    /// The partition key cannot be used as a file name under the root.
    #[error("invalid partition key: {key:?}")]
    InvalidPartitionKey {
        /// The rejected key.
        key: String,
    },

    /// A filesystem operation failed. Propagates uncaught to the caller; no
    /// retry, no fallback.
    #[error("I/O failure on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A partition file could not be converted to or from a JSON array of
    /// records. On reads this means malformed JSON on disk.
    #[error("malformed partition file {path}: {source}")]
    Malformed {
        /// The offending file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// A `NotFound` for a single identity.
    #[must_use]
    pub fn not_found(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self::NotFound {
            id: RecordId::new(partition_key, row_key),
        }
    }

    /// An `AlreadyExists` for a single identity.
    #[must_use]
    pub fn already_exists(id: RecordId) -> Self {
        Self::AlreadyExists { ids: vec![id] }
    }

    /// Returns true if this is a missing-record failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a key-collision failure.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// The identities this error carries, if it is a key-related failure.
    ///
    /// `NotFound` yields one identity; `AlreadyExists` yields every
    /// collision. I/O and parse failures yield an empty slice.
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        match self {
            Self::NotFound { id } => std::slice::from_ref(id),
            Self::AlreadyExists { ids } => ids,
            _ => &[],
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
