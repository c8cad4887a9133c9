//! Storage for collected records and run state.
//!
//! ## Directory Structure
//!
//! ```text
//! rio_data/
//! ├── progress.json             # Next page per category
//! ├── failed_requests.log       # Advisory failure log
//! ├── death-knight_data.json    # JSON array of records, append-only
//! ├── paladin_data.json
//! └── warrior_data.json
//! ```

pub mod checkpoint;
pub mod failures;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, PersistedRecord};

// Re-export for convenience
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use failures::FailureLog;
pub use local::JsonArrayStore;

/// Append-only structured store of records, one sequence per category.
///
/// After every successful `append` the category's sequence must be readable
/// as a complete, valid sequence.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one record to the category's sequence.
    async fn append(&self, category: &Category, record: &PersistedRecord) -> Result<()>;

    /// Number of records currently stored for the category.
    async fn count(&self, category: &Category) -> Result<usize>;
}
