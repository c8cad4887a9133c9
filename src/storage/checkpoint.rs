//! Per-category page checkpoint.
//!
//! The checkpoint maps each category name to the next page to process and is
//! stored as a flat JSON object, e.g. `{"paladin": 3, "warrior": 250}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Category;

/// Next page to process, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(pub BTreeMap<String, u32>);

impl Checkpoint {
    /// Next page for a category; 0 when it has never been walked.
    pub fn page(&self, category: &Category) -> u32 {
        self.0.get(&category.name).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// File-backed checkpoint store.
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    checkpoint: Checkpoint,
}

impl CheckpointStore {
    /// Open the store, loading the checkpoint file if it exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let checkpoint = Self::read(&path).await?;
        Ok(Self { path, checkpoint })
    }

    async fn read(path: &Path) -> Result<Checkpoint> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Checkpoint::default()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Current mapping; empty on a fresh start.
    pub fn load(&self) -> &Checkpoint {
        &self.checkpoint
    }

    /// Next page for a category.
    pub fn page(&self, category: &Category) -> u32 {
        self.checkpoint.page(category)
    }

    /// Record the next page for a category and rewrite the whole file.
    pub async fn save(&mut self, category: &Category, page: u32) -> Result<()> {
        self.checkpoint.0.insert(category.name.clone(), page);
        self.write().await
    }

    /// Write to a temp file, then rename over the checkpoint.
    async fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(&self.checkpoint)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
