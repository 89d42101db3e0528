//! # jsonshard - Partitioned JSON file storage for keyed domain records
//!
//! jsonshard persists collections of domain records as JSON files on disk,
//! partitioned by a partition key, with one file per partition. Every record
//! carries a partition key (selecting the file it lives in) and a row key
//! (unique within its partition, compared case-insensitively).
//!
//! ## Core Concepts
//!
//! - **Record**: the caller-supplied domain type; any serde-able type that
//!   exposes a partition key and a row key
//! - **Partition file**: a JSON array of records sharing one partition key,
//!   stored at `<root>/<partitionKey>_Repository.json`
//! - **RecordId**: the structured `(partition key, row key)` identity carried
//!   by `NotFound`/`AlreadyExists` errors
//!
//! Every write loads the whole partition file, mutates the in-memory list,
//! and rewrites the file. A per-partition lock is held across that window, so
//! concurrent writers in one process never lose updates. Cross-process
//! coordination is out of scope.
//!
//! ## Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use jsonshard::{PartitionFileStore, Record};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Ticket {
//!     partition_key: String,
//!     row_key: String,
//!     summary: String,
//! }
//!
//! impl Record for Ticket {
//!     fn partition_key(&self) -> &str {
//!         &self.partition_key
//!     }
//!     fn row_key(&self) -> &str {
//!         &self.row_key
//!     }
//! }
//!
//! let dir = tempfile::tempdir()?;
//! let store: PartitionFileStore<Ticket> = PartitionFileStore::open(dir.path())?;
//!
//! store.add(&Ticket {
//!     partition_key: "backlog".to_string(),
//!     row_key: "T-1".to_string(),
//!     summary: "fix the build".to_string(),
//! })?;
//!
//! let ticket = store.get("backlog", "t-1")?;
//! assert_eq!(ticket.summary, "fix the build");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod record;
pub mod store;

// Re-export primary types at crate root for convenience
pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordId};
pub use store::{BatchMode, BatchOptions, PartitionFileStore};
