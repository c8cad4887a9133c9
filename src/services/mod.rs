//! Service layer for the collector.
//!
//! This module contains the remote collaborators:
//! - Ranking pages (`RankingSource`, `RaiderIoRankings`)
//! - Equipment lookups (`EquipmentProber`, `RaiderIoProber`, `BlizzardProber`)
//! - Blizzard credential exchange (`auth`)

pub mod auth;
mod prober;
mod rankings;

pub use prober::{
    BlizzardProber, EquipmentProber, RaiderIoProber, blizzard_equipped_matches,
    rio_mainhand_matches,
};
pub use rankings::{RaiderIoRankings, RankingSource};
