//! End-to-end collection runs against in-memory sources.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use census::error::{AppError, Result};
use census::models::{Category, Config, EnrichmentResult, ProberKind, RankedEntity};
use census::pipeline::{Collector, FileStatus, check_bytes};
use census::services::{EquipmentProber, RankingSource, rio_mainhand_matches};
use census::storage::{CheckpointStore, JsonArrayStore, RecordStore};
use serde_json::{Value, json};
use tempfile::TempDir;

const TARGET: u64 = 206448;

/// Ranking pages keyed by (category, page); requests are recorded.
#[derive(Default)]
struct FakeRankings {
    pages: HashMap<(String, u32), Vec<RankedEntity>>,
    requested: Arc<Mutex<Vec<(String, u32)>>>,
}

impl FakeRankings {
    fn page(mut self, category: &str, page: u32, names: &[&str]) -> Self {
        let entities = names
            .iter()
            .enumerate()
            .map(|(i, name)| RankedEntity {
                id: u64::from(page) * 1000 + i as u64 + 1,
                name: name.to_string(),
                region: "eu".to_string(),
                realm: "silvermoon".to_string(),
                realm_name: "Silvermoon".to_string(),
                category: category.to_string(),
            })
            .collect();
        self.pages.insert((category.to_string(), page), entities);
        self
    }
}

#[async_trait]
impl RankingSource for FakeRankings {
    async fn fetch_page(&self, category: &Category, page: u32) -> Result<Vec<RankedEntity>> {
        self.requested
            .lock()
            .unwrap()
            .push((category.name.clone(), page));
        self.pages
            .get(&(category.name.clone(), page))
            .cloned()
            .ok_or_else(|| AppError::fetch(format!("https://rank.test/{page}"), 500))
    }
}

/// Serves Raider.IO-shaped gear payloads by character name.
struct FakeGearProber {
    payloads: HashMap<String, Value>,
}

#[async_trait]
impl EquipmentProber for FakeGearProber {
    async fn probe(&self, entity: &RankedEntity) -> Result<EnrichmentResult> {
        let payload = self
            .payloads
            .get(&entity.name)
            .ok_or_else(|| AppError::fetch(format!("https://gear.test/{}", entity.name), 404))?;
        Ok(EnrichmentResult::observed(
            rio_mainhand_matches(payload, TARGET),
            chrono::Utc::now().timestamp(),
        ))
    }
}

fn mainhand(item_id: u64) -> Value {
    json!({"gear": {"items": {"mainhand": {"item_id": item_id}}}})
}

fn test_config(tmp: &TempDir, categories: Vec<Category>, max_page: u32) -> Config {
    let mut config = Config::default();
    config.paths.data_dir = tmp.path().to_string_lossy().into_owned();
    config.rate_limit.max_requests = 100_000;
    config.rate_limit.window_secs = 1;
    config.collect.max_page = max_page;
    config.categories = categories;
    config
}

fn gear_prober() -> Box<FakeGearProber> {
    Box::new(FakeGearProber {
        payloads: HashMap::from([
            ("Fyrwielder".to_string(), mainhand(TARGET)),
            ("Otheraxe".to_string(), mainhand(207788)),
            ("Plainsword".to_string(), json!({"gear": {"items": {}}})),
        ]),
    })
}

#[tokio::test]
async fn warrior_page_zero_scenario() {
    let tmp = TempDir::new().unwrap();
    let warrior = Category::new("warrior", "all");
    let config = test_config(&tmp, vec![warrior.clone()], 1);

    let rankings = FakeRankings::default().page("warrior", 0, &["Fyrwielder", "Otheraxe"]);
    let collector = Collector::new(
        config.clone(),
        Box::new(rankings),
        Box::new(JsonArrayStore::new(tmp.path())),
    )
    .with_prober(ProberKind::RaiderIo, gear_prober());

    let stats = collector.run().await.unwrap();
    assert_eq!(stats.entities_seen, 2);

    let records = JsonArrayStore::new(tmp.path())
        .records(&warrior)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Fyrwielder");
    assert!(records[0].equipped);
    assert!(records[0].timestamp > 0);
    assert_eq!(records[1].name, "Otheraxe");
    assert!(!records[1].equipped);
    assert_eq!(records[1].timestamp, 0);

    let checkpoints = CheckpointStore::open(config.paths.checkpoint_path())
        .await
        .unwrap();
    assert_eq!(checkpoints.page(&warrior), 1);
}

#[tokio::test]
async fn restart_resumes_without_refetching_done_pages() {
    let tmp = TempDir::new().unwrap();
    let warrior = Category::new("warrior", "all");
    let paladin = Category::new("paladin", "dps");
    let config = test_config(&tmp, vec![warrior.clone(), paladin.clone()], 3);

    // Previous run finished warrior pages 0..2 and left one record behind.
    let store = JsonArrayStore::new(tmp.path());
    let mut checkpoints = CheckpointStore::open(config.paths.checkpoint_path())
        .await
        .unwrap();
    checkpoints.save(&warrior, 2).await.unwrap();
    store
        .append(
            &warrior,
            &census::models::PersistedRecord {
                id: 1,
                name: "Earlier".to_string(),
                region: "eu".to_string(),
                realm: "silvermoon".to_string(),
                category: "warrior".to_string(),
                equipped: false,
                timestamp: 0,
            },
        )
        .await
        .unwrap();

    let rankings = FakeRankings::default()
        .page("warrior", 2, &["Plainsword"])
        .page("paladin", 0, &["Fyrwielder"])
        .page("paladin", 1, &["Missing"])
        .page("paladin", 2, &[]);
    let requested = Arc::clone(&rankings.requested);

    let collector = Collector::new(config.clone(), Box::new(rankings), Box::new(store.clone()))
        .with_prober(ProberKind::RaiderIo, gear_prober());
    let stats = collector.run().await.unwrap();

    assert_eq!(
        *requested.lock().unwrap(),
        vec![
            ("warrior".to_string(), 2),
            ("paladin".to_string(), 0),
            ("paladin".to_string(), 1),
            ("paladin".to_string(), 2),
        ]
    );
    // One record on disk at start plus three characters seen this run
    assert_eq!(stats.entities_seen, 4);
    assert_eq!(stats.totals().lookup_failures, 1);

    assert_eq!(store.count(&warrior).await.unwrap(), 2);
    let paladin_records = store.records(&paladin).await.unwrap();
    assert_eq!(paladin_records.len(), 1);
    assert!(paladin_records[0].equipped);

    let checkpoints = CheckpointStore::open(config.paths.checkpoint_path())
        .await
        .unwrap();
    assert_eq!(checkpoints.page(&warrior), 3);
    assert_eq!(checkpoints.page(&paladin), 3);
}

#[tokio::test]
async fn zero_length_record_file_does_not_block_resume() {
    let tmp = TempDir::new().unwrap();
    let warrior = Category::new("warrior", "all");
    let config = test_config(&tmp, vec![warrior.clone()], 1);

    let store = JsonArrayStore::new(tmp.path());
    tokio::fs::write(store.path(&warrior), b"").await.unwrap();

    let rankings = FakeRankings::default().page("warrior", 0, &["Fyrwielder"]);
    let collector = Collector::new(config, Box::new(rankings), Box::new(store.clone()))
        .with_prober(ProberKind::RaiderIo, gear_prober());
    let stats = collector.run().await.unwrap();

    assert_eq!(stats.entities_seen, 1);
    let records = store.records(&warrior).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Fyrwielder");
}

#[tokio::test]
async fn missing_prober_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(
        &tmp,
        vec![Category::new("warrior", "all").with_prober(ProberKind::Blizzard)],
        1,
    );
    let collector = Collector::new(
        config,
        Box::new(FakeRankings::default()),
        Box::new(JsonArrayStore::new(tmp.path())),
    )
    .with_prober(ProberKind::RaiderIo, gear_prober());

    assert!(matches!(
        collector.run().await.unwrap_err(),
        AppError::Config(_)
    ));
}

#[tokio::test]
async fn appended_files_parse_for_various_sizes() {
    for n in [0usize, 1, 2, 100] {
        let tmp = TempDir::new().unwrap();
        let store = JsonArrayStore::new(tmp.path());
        let category = Category::new("warrior", "all");
        store.initialize(&category).await.unwrap();

        for id in 0..n {
            let record = census::models::PersistedRecord {
                id: id as u64,
                name: format!("c{id}"),
                region: "us".to_string(),
                realm: "stormrage".to_string(),
                category: "warrior".to_string(),
                equipped: false,
                timestamp: 0,
            };
            store.append(&category, &record).await.unwrap();
        }

        let bytes = store.read_bytes(&category).await.unwrap().unwrap();
        assert_eq!(check_bytes(&bytes), FileStatus::Valid(n));
        let ids: Vec<u64> = store
            .records(&category)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, (0..n as u64).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn truncated_file_is_detected_at_every_offset() {
    let tmp = TempDir::new().unwrap();
    let store = JsonArrayStore::new(tmp.path());
    let category = Category::new("death-knight", "all");

    for id in 0..3u64 {
        let record = census::models::PersistedRecord {
            id,
            name: format!("Rune{id}"),
            region: "kr".to_string(),
            realm: "azshara".to_string(),
            category: "death-knight".to_string(),
            equipped: id == 1,
            timestamp: if id == 1 { 1_700_000_000 } else { 0 },
        };
        store.append(&category, &record).await.unwrap();
    }

    let bytes = store.read_bytes(&category).await.unwrap().unwrap();
    assert_eq!(check_bytes(&bytes), FileStatus::Valid(3));
    // A zero-length file is a category whose first append never landed
    for cut in 1..bytes.len() {
        assert!(
            check_bytes(&bytes[..cut]).is_invalid(),
            "prefix of {cut} bytes parsed as valid"
        );
    }
}
