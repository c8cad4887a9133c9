// src/pipeline/collect.rs

//! Collection run orchestration.

use std::collections::HashMap;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{Config, ProberKind};
use crate::pipeline::{CategoryWalker, RateLimiter, WalkStats};
use crate::services::{EquipmentProber, RankingSource};
use crate::storage::{CheckpointStore, FailureLog, RecordStore};
use crate::utils::log as console;

/// Summary of a collection run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Per-category counters, in walk order
    pub categories: Vec<(String, WalkStats)>,
    /// Characters seen, including records already on disk at start
    pub entities_seen: u64,
    /// Requests admitted by the rate limiter
    pub requests: u64,
}

impl RunStats {
    pub fn totals(&self) -> WalkStats {
        let mut total = WalkStats::default();
        for (_, stats) in &self.categories {
            total.merge(stats);
        }
        total
    }
}

/// Walks every configured category in declaration order.
pub struct Collector {
    config: Config,
    rankings: Box<dyn RankingSource>,
    probers: HashMap<ProberKind, Box<dyn EquipmentProber>>,
    store: Box<dyn RecordStore>,
    failures: FailureLog,
}

impl Collector {
    pub fn new(
        config: Config,
        rankings: Box<dyn RankingSource>,
        store: Box<dyn RecordStore>,
    ) -> Self {
        let failures = FailureLog::new(config.paths.failure_log_path());
        Self {
            config,
            rankings,
            probers: HashMap::new(),
            store,
            failures,
        }
    }

    /// Register the prober used for categories of the given kind.
    pub fn with_prober(mut self, kind: ProberKind, prober: Box<dyn EquipmentProber>) -> Self {
        self.probers.insert(kind, prober);
        self
    }

    /// Prober kinds the configured categories need.
    pub fn required_probers(config: &Config) -> Vec<ProberKind> {
        let mut kinds: Vec<ProberKind> = Vec::new();
        for category in &config.categories {
            let kind = config.prober_for(category);
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Run to completion: every category is drained before the next begins.
    pub async fn run(&self) -> Result<RunStats> {
        let started = Instant::now();
        console::header("Collection starting");

        for kind in Self::required_probers(&self.config) {
            if !self.probers.contains_key(&kind) {
                return Err(AppError::config(format!("No {kind} prober configured")));
            }
        }

        let mut checkpoints = CheckpointStore::open(self.config.paths.checkpoint_path()).await?;
        if checkpoints.load().is_empty() {
            log::info!("No checkpoint found, starting every category from page 0");
        }
        let mut limiter = RateLimiter::new(
            self.config.rate_limit.max_requests,
            self.config.rate_limit.window(),
        );

        let mut stats = RunStats::default();
        for category in &self.config.categories {
            stats.entities_seen += self.store.count(category).await? as u64;
        }
        log::info!(
            "Total characters already processed: {}",
            stats.entities_seen
        );

        for category in &self.config.categories {
            let kind = self.config.prober_for(category);
            let prober = self
                .probers
                .get(&kind)
                .ok_or_else(|| AppError::config(format!("No {kind} prober configured")))?;

            console::sub_item(&format!(
                "{}: pages {}..{} via {}",
                category,
                checkpoints.page(category),
                self.config.collect.max_page,
                kind
            ));

            let walker = CategoryWalker::new(
                self.rankings.as_ref(),
                prober.as_ref(),
                self.store.as_ref(),
                &self.failures,
                self.config.collect.max_page,
            );
            let walked = walker
                .walk(
                    category,
                    &mut limiter,
                    &mut checkpoints,
                    &mut stats.entities_seen,
                )
                .await?;

            console::success(&format!(
                "{}: {} pages, {} records ({} with item), {} failed lookups",
                category.name,
                walked.pages,
                walked.recorded,
                walked.equipped,
                walked.lookup_failures
            ));
            stats.categories.push((category.name.clone(), walked));
        }

        stats.requests = limiter.total();
        let totals = stats.totals();
        console::summary(
            "Collection complete",
            &[
                ("Characters seen", stats.entities_seen.to_string()),
                ("Records written", totals.recorded.to_string()),
                ("With item", totals.equipped.to_string()),
                ("Failed pages", totals.page_failures.to_string()),
                ("Failed lookups", totals.lookup_failures.to_string()),
                ("Requests", stats.requests.to_string()),
                ("Req/Min", format!("{:.2}", limiter.requests_per_minute())),
                ("Elapsed", format!("{:.1?}", started.elapsed())),
            ],
        );

        Ok(stats)
    }
}
