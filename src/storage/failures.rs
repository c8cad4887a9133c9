//! Advisory log of failed requests.
//!
//! Lines are appended and never read back by the collector.

use std::path::PathBuf;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::FailureLogEntry;

/// Append-only failure log file.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append an entry. Write failures are logged and otherwise ignored.
    pub async fn record(&self, entry: &FailureLogEntry) {
        if let Err(e) = self.append_line(entry).await {
            log::warn!(
                "Could not write failure log {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Append an entry for an error, if it describes a failed request.
    pub async fn record_error(&self, error: &AppError) {
        if let Some(entry) = entry_for(error) {
            self.record(&entry).await;
        }
    }

    async fn append_line(&self, entry: &FailureLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{entry}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Failure log entry describing an error, if it has a request URL.
pub fn entry_for(error: &AppError) -> Option<FailureLogEntry> {
    match error {
        AppError::Fetch { url, status } => Some(FailureLogEntry {
            url: url.clone(),
            status: status.clone(),
        }),
        AppError::Http(e) => Some(FailureLogEntry {
            url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            status: e
                .status()
                .map(|s| s.as_u16().to_string())
                .unwrap_or_else(|| "Exception".to_string()),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_entries_are_appended() {
        let tmp = TempDir::new().unwrap();
        let log = FailureLog::new(tmp.path().join("failed_requests.log"));

        log.record_error(&AppError::fetch("https://a.test/1", 404))
            .await;
        log.record_error(&AppError::fetch("https://a.test/2", "Exception"))
            .await;
        log.record_error(&AppError::config("not a request")).await;

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            [
                "Failed request to https://a.test/1 with status code 404",
                "Failed request to https://a.test/2 with status code Exception",
            ]
        );
    }
}
