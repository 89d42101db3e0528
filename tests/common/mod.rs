//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use jsonshard::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A realistic domain record: partition + row keys plus arbitrary fields
/// that must round-trip verbatim through the partition files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub partition_key: String,
    pub row_key: String,
    pub summary: String,
    pub opened_at: DateTime<Utc>,
    pub reporter: Uuid,
}

impl Record for Ticket {
    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}

pub fn ticket(partition: &str, row: &str, summary: &str) -> Ticket {
    Ticket {
        partition_key: partition.to_string(),
        row_key: row.to_string(),
        summary: summary.to_string(),
        opened_at: Utc::now(),
        reporter: Uuid::new_v4(),
    }
}

/// Path of the partition file the store is expected to maintain for `key`.
pub fn partition_file(root: &std::path::Path, key: &str) -> std::path::PathBuf {
    root.join(format!("{key}_Repository.json"))
}
