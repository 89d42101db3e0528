//! Record contract and identity management.
//!
//! A [`Record`] is any caller-supplied type that can name the partition it
//! lives in and its row within that partition. The store never inspects other
//! fields; they round-trip verbatim through JSON.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Contract for domain records stored in a [`PartitionFileStore`].
///
/// The partition key selects the file a record lives in; the row key
/// identifies the record within that file. Row keys are compared
/// case-insensitively, so `"R1"` and `"r1"` name the same record.
///
/// [`PartitionFileStore`]: crate::store::PartitionFileStore
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The shard selector; all records sharing it live in one file.
    fn partition_key(&self) -> &str;

    /// The unique-within-partition identifier.
    fn row_key(&self) -> &str;
}

/// Lowercase fold used for row-key comparison.
///
/// Full Unicode lowercase rather than ASCII-only, so non-ASCII row keys
/// compare case-insensitively too.
pub(crate) fn normalize_row_key(key: &str) -> String {
    key.to_lowercase()
}

/// Returns true when two row keys name the same record.
pub(crate) fn row_key_eq(a: &str, b: &str) -> bool {
    normalize_row_key(a) == normalize_row_key(b)
}

/// Structured `(partition key, row key)` identity of a record.
///
/// Errors carry these instead of flat messages so callers can enumerate
/// exactly which keys collided or were missing.
///
/// Equality and hashing fold the row key to lowercase, matching the store's
/// row-key comparison; the partition key is compared verbatim.
///
/// # Examples
///
/// ```
/// use jsonshard::RecordId;
///
/// let a = RecordId::new("P1", "R1");
/// let b = RecordId::new("P1", "r1");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordId {
    /// The partition key.
    pub partition_key: String,
    /// The row key, preserved in its original casing.
    pub row_key: String,
}

impl RecordId {
    /// Creates an identity from its two keys.
    #[must_use]
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// The identity of a single record.
    #[must_use]
    pub fn of<R: Record>(record: &R) -> Self {
        Self::new(record.partition_key(), record.row_key())
    }

    /// The identities of a batch of records, in input order.
    ///
    /// Used to build error payloads listing every colliding identity.
    #[must_use]
    pub fn of_all<R: Record>(records: &[R]) -> Vec<Self> {
        records.iter().map(Self::of).collect()
    }

    /// Returns true if this identity names the given row key.
    #[must_use]
    pub fn matches_row(&self, row_key: &str) -> bool {
        row_key_eq(&self.row_key, row_key)
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.partition_key == other.partition_key
            && row_key_eq(&self.row_key, &other.row_key)
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.partition_key.hash(state);
        normalize_row_key(&self.row_key).hash(state);
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}
