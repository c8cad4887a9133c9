// src/models/mod.rs

//! Domain models for the collector.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod category;
mod config;
mod record;

// Re-export all public types
pub use category::{Category, ProberKind};
pub use config::{
    BlizzardConfig, CollectConfig, Config, CrawlerConfig, EndpointConfig, PathsConfig,
    RateLimitConfig,
};
pub use record::{EnrichmentResult, FailureLogEntry, PersistedRecord, RankedEntity};
