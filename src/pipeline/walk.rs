//! Page walker for a single category.
//!
//! Pages are processed strictly in increasing order starting from the
//! category's checkpoint. For every page:
//!
//! 1. admit through the shared limiter and fetch the ranking page
//! 2. for each character in page order: admit, probe, append a record
//! 3. persist `page + 1` as the category's checkpoint
//!
//! A failed ranking page is logged and the checkpoint still advances past
//! it, so characters on that page are skipped for good. A failed equipment
//! lookup skips only that character; no record is written for it.

use crate::error::Result;
use crate::models::{Category, PersistedRecord, RankedEntity};
use crate::pipeline::RateLimiter;
use crate::services::{EquipmentProber, RankingSource};
use crate::storage::{CheckpointStore, FailureLog, RecordStore};
use crate::utils::log as console;

/// Counters for one category walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Pages attempted, including failed ones
    pub pages: u32,
    pub page_failures: u32,
    /// Characters seen on successful pages
    pub entities: u64,
    /// Records appended
    pub recorded: u64,
    /// Appended records with the item equipped
    pub equipped: u64,
    pub lookup_failures: u64,
}

impl WalkStats {
    pub fn merge(&mut self, other: &WalkStats) {
        self.pages += other.pages;
        self.page_failures += other.page_failures;
        self.entities += other.entities;
        self.recorded += other.recorded;
        self.equipped += other.equipped;
        self.lookup_failures += other.lookup_failures;
    }
}

/// Drives pagination for one category.
pub struct CategoryWalker<'a> {
    rankings: &'a dyn RankingSource,
    prober: &'a dyn EquipmentProber,
    store: &'a dyn RecordStore,
    failures: &'a FailureLog,
    max_page: u32,
}

impl<'a> CategoryWalker<'a> {
    pub fn new(
        rankings: &'a dyn RankingSource,
        prober: &'a dyn EquipmentProber,
        store: &'a dyn RecordStore,
        failures: &'a FailureLog,
        max_page: u32,
    ) -> Self {
        Self {
            rankings,
            prober,
            store,
            failures,
            max_page,
        }
    }

    /// Walk the category from its checkpoint up to `max_page`.
    ///
    /// `seen` is the run-wide character counter shown on the progress line.
    pub async fn walk(
        &self,
        category: &Category,
        limiter: &mut RateLimiter,
        checkpoints: &mut CheckpointStore,
        seen: &mut u64,
    ) -> Result<WalkStats> {
        let mut stats = WalkStats::default();
        let start_page = checkpoints.page(category);

        if start_page >= self.max_page {
            console::sub_item(&format!("{category}: already complete"));
            return Ok(stats);
        }
        log::info!("{}: resuming at page {}", category, start_page);

        for page in start_page..self.max_page {
            stats.pages += 1;
            limiter.admit().await;

            match self.rankings.fetch_page(category, page).await {
                Ok(entities) => {
                    for entity in &entities {
                        stats.entities += 1;
                        *seen += 1;
                        limiter.admit().await;
                        self.process_entity(category, entity, page, limiter, *seen, &mut stats)
                            .await?;
                    }
                }
                Err(e) => {
                    stats.page_failures += 1;
                    log::warn!("{}: skipping page {}: {}", category, page, e);
                    self.failures.record_error(&e).await;
                }
            }

            checkpoints.save(category, page + 1).await?;
        }

        Ok(stats)
    }

    async fn process_entity(
        &self,
        category: &Category,
        entity: &RankedEntity,
        page: u32,
        limiter: &RateLimiter,
        seen: u64,
        stats: &mut WalkStats,
    ) -> Result<()> {
        let result = match self.prober.probe(entity).await {
            Ok(result) => result,
            Err(e) => {
                stats.lookup_failures += 1;
                log::debug!("Lookup failed for {}-{}: {}", entity.name, entity.realm, e);
                self.failures.record_error(&e).await;
                return Ok(());
            }
        };

        let record = PersistedRecord::new(entity, result);
        self.store.append(category, &record).await?;
        stats.recorded += 1;
        if record.equipped {
            stats.equipped += 1;
        }

        let realm = if entity.realm_name.is_empty() {
            &entity.realm
        } else {
            &entity.realm_name
        };
        console::progress(&format!(
            "Processed: {}, Page: {}, Req/Min: {:.2}, Latest: {} on {}",
            seen,
            page,
            limiter.requests_per_minute(),
            entity.name,
            realm
        ));
        Ok(())
    }
}
