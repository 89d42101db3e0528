//! Partition-file naming and whole-file codec.
//!
//! One partition key maps to one file, `<partitionKey>_Repository.json`,
//! directly under the store root. Contents are a plain JSON array of record
//! objects. No envelope, no checksum, no version tag. Files are read and
//! rewritten whole; a partition that becomes empty has its file deleted
//! rather than left as `[]`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// Suffix identifying partition files in the root directory.
pub(crate) const FILE_SUFFIX: &str = "_Repository.json";

/// Rejects partition keys that cannot safely become file names.
///
/// Keys are spliced verbatim into paths under the root, so empty keys, path
/// separators, and traversal components would break the flat-layout contract.
pub(crate) fn validate_partition_key(key: &str) -> StoreResult<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');
    if invalid {
        return Err(StoreError::InvalidPartitionKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Path of the partition file for `key` under `root`.
pub(crate) fn partition_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}{FILE_SUFFIX}"))
}

/// Decodes the partition key from a file name, if it is a partition file.
pub(crate) fn partition_key_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let key = name.strip_suffix(FILE_SUFFIX)?;
    if key.is_empty() {
        return None;
    }
    Some(key.to_string())
}

/// Loads an entire partition file.
///
/// A missing file is an empty partition, not an error. Malformed JSON fails
/// with the offending path attached.
pub(crate) fn read_partition<R: Record>(path: &Path) -> StoreResult<Vec<R>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Rewrites an entire partition file.
///
/// An empty record list deletes the file instead of writing `[]`.
pub(crate) fn write_partition<R: Record>(path: &Path, records: &[R]) -> StoreResult<()> {
    if records.is_empty() {
        return remove_partition(path);
    }

    let bytes = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, bytes).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), records = records.len(), "rewrote partition file");
    Ok(())
}

/// Deletes a partition file. Missing file is a no-op.
pub(crate) fn remove_partition(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "deleted partition file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Non-recursive scan of the root for partition files.
///
/// Returns paths in directory order; entries that are not partition files
/// (wrong suffix, subdirectories) are ignored.
pub(crate) fn scan_partitions(root: &Path) -> StoreResult<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| StoreError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && partition_key_of(&path).is_some() {
            paths.push(path);
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        partition_key: String,
        row_key: String,
        value: String,
    }

    impl Record for Item {
        fn partition_key(&self) -> &str {
            &self.partition_key
        }
        fn row_key(&self) -> &str {
            &self.row_key
        }
    }

    fn item(row: &str, value: &str) -> Item {
        Item {
            partition_key: "P1".to_string(),
            row_key: row.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_partition_path_naming() {
        let path = partition_path(Path::new("/data"), "P1");
        assert_eq!(path, Path::new("/data/P1_Repository.json"));
    }

    #[test]
    fn test_partition_key_roundtrip() {
        let path = partition_path(Path::new("/data"), "orders");
        assert_eq!(partition_key_of(&path).as_deref(), Some("orders"));
    }

    #[test]
    fn test_partition_key_of_ignores_other_files() {
        assert!(partition_key_of(Path::new("/data/notes.json")).is_none());
        assert!(partition_key_of(Path::new("/data/_Repository.json")).is_none());
    }

    #[test]
    fn test_validate_rejects_unsafe_keys() {
        assert!(validate_partition_key("P1").is_ok());
        assert!(validate_partition_key("").is_err());
        assert!(validate_partition_key(".").is_err());
        assert!(validate_partition_key("..").is_err());
        assert!(validate_partition_key("a/b").is_err());
        assert!(validate_partition_key("a\\b").is_err());
    }

    #[test]
    fn test_read_missing_file_is_empty_partition() {
        let dir = tempdir().unwrap();
        let path = partition_path(dir.path(), "P1");
        let records: Vec<Item> = read_partition(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = partition_path(dir.path(), "P1");
        let records = vec![item("R1", "a"), item("R2", "b")];

        write_partition(&path, &records).unwrap();
        let back: Vec<Item> = read_partition(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_write_empty_deletes_file() {
        let dir = tempdir().unwrap();
        let path = partition_path(dir.path(), "P1");

        write_partition(&path, &[item("R1", "a")]).unwrap();
        assert!(path.exists());

        write_partition::<Item>(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_read_malformed_file_fails_with_path() {
        let dir = tempdir().unwrap();
        let path = partition_path(dir.path(), "P1");
        fs::write(&path, b"{ not json").unwrap();

        let err = read_partition::<Item>(&path).unwrap_err();
        match err {
            StoreError::Malformed { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_only_matches_partition_files() {
        let dir = tempdir().unwrap();
        write_partition(&partition_path(dir.path(), "P1"), &[item("R1", "a")]).unwrap();
        write_partition(&partition_path(dir.path(), "P2"), &[item("R1", "b")]).unwrap();
        fs::write(dir.path().join("readme.txt"), b"not a partition").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut keys: Vec<String> = scan_partitions(dir.path())
            .unwrap()
            .iter()
            .filter_map(|p| partition_key_of(p))
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["P1".to_string(), "P2".to_string()]);
    }
}
