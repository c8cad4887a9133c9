//! Local filesystem record store.
//!
//! Each category is a single JSON array file. Appends splice the new record
//! in front of the closing `]` instead of rewriting the whole array, so the
//! cost of a write does not grow with the number of records already stored.
//!
//! A crash in the middle of the splice can leave the file without its closing
//! bracket. Such a file fails to parse; see `pipeline::verify`.

use std::io::SeekFrom;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::{AppError, Result};
use crate::models::{Category, PersistedRecord};
use crate::storage::RecordStore;

/// JSON-array-per-category record store.
#[derive(Debug, Clone)]
pub struct JsonArrayStore {
    root_dir: PathBuf,
}

impl JsonArrayStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path of a category's record file.
    pub fn path(&self, category: &Category) -> PathBuf {
        self.root_dir.join(category.file_name())
    }

    /// Create an empty array file for the category if none exists.
    pub async fn initialize(&self, category: &Category) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        let path = self.path(category);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }
        tokio::fs::write(&path, b"[]").await?;
        Ok(())
    }

    /// Read raw file bytes, returning None if the file doesn't exist.
    pub async fn read_bytes(&self, category: &Category) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(category)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Parse every record stored for the category.
    ///
    /// A missing or zero-length file is an empty sequence; an unparseable one
    /// is an error.
    pub async fn records(&self, category: &Category) -> Result<Vec<PersistedRecord>> {
        match self.read_bytes(category).await? {
            Some(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::corrupt(&self.path(category), e)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordStore for JsonArrayStore {
    async fn append(&self, category: &Category, record: &PersistedRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        let path = self.path(category);
        let serialized = serde_json::to_vec(record)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;
        let len = file.metadata().await?.len();

        let mut chunk = Vec::with_capacity(serialized.len() + 2);
        if len == 0 {
            chunk.push(b'[');
        } else {
            file.seek(SeekFrom::Start(len - 1)).await?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last).await?;
            if last[0] != b']' {
                return Err(AppError::corrupt(&path, "file does not end with ']'"));
            }
            // "[]" holds no elements yet
            if len > 2 {
                chunk.push(b',');
            }
            file.seek(SeekFrom::Start(len - 1)).await?;
        }
        chunk.extend_from_slice(&serialized);
        chunk.push(b']');

        file.write_all(&chunk).await?;
        file.flush().await?;
        Ok(())
    }

    async fn count(&self, category: &Category) -> Result<usize> {
        Ok(self.records(category).await?.len())
    }
}
