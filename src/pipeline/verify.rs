//! Structural validation of record files.
//!
//! A process killed during an append can leave a record file without its
//! closing bracket. Such a file must not be trusted, so it is reported here
//! instead of being silently read.

use crate::error::Result;
use crate::models::{Category, PersistedRecord};
use crate::storage::JsonArrayStore;

/// State of one category's record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Complete JSON array with this many records
    Valid(usize),
    /// No file yet
    Missing,
    /// File does not parse as a complete array of records
    Invalid(String),
}

impl FileStatus {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FileStatus::Invalid(_))
    }
}

/// Check whether raw bytes form a complete record array.
///
/// A zero-length file holds no records yet; the next append starts the array.
pub fn check_bytes(bytes: &[u8]) -> FileStatus {
    if bytes.is_empty() {
        return FileStatus::Valid(0);
    }
    match serde_json::from_slice::<Vec<PersistedRecord>>(bytes) {
        Ok(records) => FileStatus::Valid(records.len()),
        Err(e) => FileStatus::Invalid(e.to_string()),
    }
}

/// Check every category's record file.
pub async fn verify(
    store: &JsonArrayStore,
    categories: &[Category],
) -> Result<Vec<(String, FileStatus)>> {
    let mut report = Vec::with_capacity(categories.len());
    for category in categories {
        let status = match store.read_bytes(category).await? {
            Some(bytes) => check_bytes(&bytes),
            None => FileStatus::Missing,
        };
        if let FileStatus::Invalid(reason) = &status {
            log::error!(
                "{} is not a complete record array: {}",
                store.path(category).display(),
                reason
            );
        }
        report.push((category.name.clone(), status));
    }
    Ok(report)
}
