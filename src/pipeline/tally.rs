//! Per-category summary of collected records.

use crate::error::Result;
use crate::models::Category;
use crate::storage::JsonArrayStore;

/// Record counts for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    pub category: String,
    pub total: usize,
    pub equipped: usize,
}

impl CategoryTally {
    pub fn without_item(&self) -> usize {
        self.total - self.equipped
    }

    /// Share of records with the item, in percent.
    pub fn equipped_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.equipped as f64 * 100.0 / self.total as f64
        }
    }
}

/// Count records with and without the item for every category.
///
/// Fails if any record file is not a complete array.
pub async fn tally(store: &JsonArrayStore, categories: &[Category]) -> Result<Vec<CategoryTally>> {
    let mut tallies = Vec::with_capacity(categories.len());
    for category in categories {
        let records = store.records(category).await?;
        tallies.push(CategoryTally {
            category: category.name.clone(),
            total: records.len(),
            equipped: records.iter().filter(|r| r.equipped).count(),
        });
    }
    Ok(tallies)
}
