// src/services/prober.rs

//! Equipment probers.
//!
//! A prober performs one detail lookup for a ranked character and decides
//! whether the target item is equipped. Two detail sources are supported and
//! their payloads differ in shape:
//!
//! - Raider.IO profile (`fields=gear`): `gear.items.mainhand.item_id`
//! - Blizzard equipment: `equipped_items[].item.id`
//!
//! An absent field means "not equipped". A failed lookup is an `Err` and is
//! never reported as "not equipped".

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::models::{Config, EnrichmentResult, RankedEntity};
use crate::utils::{fill_template, http, with_query};

/// Equipment lookup for a single character.
#[async_trait]
pub trait EquipmentProber: Send + Sync {
    /// Look up the character and test for the target item.
    async fn probe(&self, entity: &RankedEntity) -> Result<EnrichmentResult>;
}

/// Whether a Raider.IO gear payload has `target` in the main hand.
pub fn rio_mainhand_matches(payload: &Value, target: u64) -> bool {
    payload
        .pointer("/gear/items/mainhand/item_id")
        .and_then(Value::as_u64)
        == Some(target)
}

/// Whether a Blizzard equipment payload lists `target` among equipped items.
pub fn blizzard_equipped_matches(payload: &Value, target: u64) -> bool {
    payload
        .get("equipped_items")
        .and_then(Value::as_array)
        .is_some_and(|items| {
            items
                .iter()
                .any(|item| item.pointer("/item/id").and_then(Value::as_u64) == Some(target))
        })
}

fn observe(equipped: bool) -> EnrichmentResult {
    EnrichmentResult::observed(equipped, Utc::now().timestamp())
}

/// Raider.IO character profile prober.
pub struct RaiderIoProber {
    client: Client,
    profile_url: String,
    target_item_id: u64,
}

impl RaiderIoProber {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            profile_url: config.endpoints.profile_url.clone(),
            target_item_id: config.collect.target_item_id,
        }
    }

    fn url(&self, entity: &RankedEntity) -> Result<Url> {
        with_query(
            &self.profile_url,
            &[
                ("region", entity.region.as_str()),
                ("realm", entity.realm.as_str()),
                ("name", entity.name.as_str()),
                ("fields", "gear"),
            ],
        )
    }
}

#[async_trait]
impl EquipmentProber for RaiderIoProber {
    async fn probe(&self, entity: &RankedEntity) -> Result<EnrichmentResult> {
        let url = self.url(entity)?;
        let payload: Value = http::get_json(&self.client, &url, None).await?;
        Ok(observe(rio_mainhand_matches(&payload, self.target_item_id)))
    }
}

/// Blizzard profile equipment prober.
pub struct BlizzardProber {
    client: Client,
    equipment_url: String,
    locale: String,
    access_token: String,
    target_item_id: u64,
}

impl BlizzardProber {
    /// Create a prober using an already acquired access token.
    pub fn new(client: Client, config: &Config, access_token: String) -> Self {
        Self {
            client,
            equipment_url: config.endpoints.equipment_url.clone(),
            locale: config.blizzard.locale.clone(),
            access_token,
            target_item_id: config.collect.target_item_id,
        }
    }

    fn url(&self, entity: &RankedEntity) -> Result<Url> {
        let base = fill_template(
            &self.equipment_url,
            &[
                ("region", entity.region.as_str()),
                ("realm", entity.realm.as_str()),
                ("name", entity.name.as_str()),
            ],
        );
        let namespace = format!("profile-{}", entity.region);
        with_query(
            &base,
            &[
                ("namespace", namespace.as_str()),
                ("locale", self.locale.as_str()),
            ],
        )
    }
}

#[async_trait]
impl EquipmentProber for BlizzardProber {
    async fn probe(&self, entity: &RankedEntity) -> Result<EnrichmentResult> {
        let url = self.url(entity)?;
        let payload: Value =
            http::get_json(&self.client, &url, Some(self.access_token.as_str())).await?;
        Ok(observe(blizzard_equipped_matches(
            &payload,
            self.target_item_id,
        )))
    }
}
