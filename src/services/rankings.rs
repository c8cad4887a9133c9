// src/services/rankings.rs

//! Paginated character ranking source.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Category, Config, RankedEntity};
use crate::utils::{http, with_query};

/// Source of ranked characters, one page at a time.
#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Fetch one ranking page for a category, in ranking order.
    async fn fetch_page(&self, category: &Category, page: u32) -> Result<Vec<RankedEntity>>;
}

/// Raider.IO Mythic+ character rankings.
pub struct RaiderIoRankings {
    client: Client,
    base_url: String,
    region: String,
    season: String,
}

impl RaiderIoRankings {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.rankings_url.clone(),
            region: config.collect.region.clone(),
            season: config.collect.season.clone(),
        }
    }
}

#[async_trait]
impl RankingSource for RaiderIoRankings {
    async fn fetch_page(&self, category: &Category, page: u32) -> Result<Vec<RankedEntity>> {
        let page = page.to_string();
        let url = with_query(
            &self.base_url,
            &[
                ("region", self.region.as_str()),
                ("season", self.season.as_str()),
                ("class", category.name.as_str()),
                ("role", category.role.as_str()),
                ("page", page.as_str()),
            ],
        )?;
        let body: RankingsResponse = http::get_json(&self.client, &url, None).await?;
        Ok(body.into_entities(category))
    }
}

#[derive(Debug, Deserialize)]
struct RankingsResponse {
    rankings: Rankings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Rankings {
    #[serde(default)]
    ranked_characters: Vec<RankedRow>,
}

#[derive(Debug, Deserialize)]
struct RankedRow {
    character: CharacterRow,
}

#[derive(Debug, Deserialize)]
struct CharacterRow {
    id: u64,
    name: String,
    region: Slugged,
    realm: Slugged,
}

#[derive(Debug, Deserialize)]
struct Slugged {
    slug: String,
    #[serde(default)]
    name: String,
}

impl RankingsResponse {
    fn into_entities(self, category: &Category) -> Vec<RankedEntity> {
        self.rankings
            .ranked_characters
            .into_iter()
            .map(|row| RankedEntity {
                id: row.character.id,
                name: row.character.name,
                region: row.character.region.slug,
                realm: row.character.realm.slug,
                realm_name: row.character.realm.name,
                category: category.name.clone(),
            })
            .collect()
    }
}
