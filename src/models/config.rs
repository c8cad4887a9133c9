//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Category, ProberKind};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Shared request budget
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Collection behavior
    #[serde(default)]
    pub collect: CollectConfig,

    /// Remote endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Blizzard client credentials
    #[serde(default)]
    pub blizzard: BlizzardConfig,

    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Categories, walked in declaration order
    #[serde(default = "defaults::categories")]
    pub categories: Vec<Category>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(AppError::validation("rate_limit.max_requests must be > 0"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(AppError::validation("rate_limit.window_secs must be > 0"));
        }
        if self.collect.max_page == 0 {
            return Err(AppError::validation("collect.max_page must be > 0"));
        }
        if self.categories.is_empty() {
            return Err(AppError::validation("No categories defined"));
        }
        for (i, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() || category.role.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "categories[{i}] needs both a name and a role"
                )));
            }
            if self.categories[..i].iter().any(|c| c.name == category.name) {
                return Err(AppError::validation(format!(
                    "Duplicate category '{}'",
                    category.name
                )));
            }
        }
        Ok(())
    }

    /// Prober used for a category, falling back to the configured default.
    pub fn prober_for(&self, category: &Category) -> ProberKind {
        category.prober.unwrap_or(self.collect.default_prober)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            collect: CollectConfig::default(),
            endpoints: EndpointConfig::default(),
            blizzard: BlizzardConfig::default(),
            paths: PathsConfig::default(),
            categories: defaults::categories(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Request ceiling shared by ranking and detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window, both request kinds combined
    #[serde(default = "defaults::max_requests")]
    pub max_requests: u32,

    /// Window length in seconds
    #[serde(default = "defaults::window_secs")]
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: defaults::max_requests(),
            window_secs: defaults::window_secs(),
        }
    }
}

/// Collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Pages `0..max_page` are walked for every category
    #[serde(default = "defaults::max_page")]
    pub max_page: u32,

    /// Item id tested for in the main-hand slot
    #[serde(default = "defaults::target_item_id")]
    pub target_item_id: u64,

    /// Ranking region filter
    #[serde(default = "defaults::ranking_region")]
    pub region: String,

    /// Ranking season slug
    #[serde(default = "defaults::season")]
    pub season: String,

    /// Prober used when a category does not name one
    #[serde(default)]
    pub default_prober: ProberKind,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_page: defaults::max_page(),
            target_item_id: defaults::target_item_id(),
            region: defaults::ranking_region(),
            season: defaults::season(),
            default_prober: ProberKind::default(),
        }
    }
}

/// Remote endpoint locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Paginated character ranking
    #[serde(default = "defaults::rankings_url")]
    pub rankings_url: String,

    /// Raider.IO character profile
    #[serde(default = "defaults::profile_url")]
    pub profile_url: String,

    /// Blizzard equipment endpoint; `{region}`, `{realm}`, `{name}` are substituted
    #[serde(default = "defaults::equipment_url")]
    pub equipment_url: String,

    /// Blizzard OAuth token endpoint
    #[serde(default = "defaults::token_url")]
    pub token_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            rankings_url: defaults::rankings_url(),
            profile_url: defaults::profile_url(),
            equipment_url: defaults::equipment_url(),
            token_url: defaults::token_url(),
        }
    }
}

/// Names of the environment variables holding Blizzard client credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlizzardConfig {
    #[serde(default = "defaults::client_id_env")]
    pub client_id_env: String,

    #[serde(default = "defaults::client_secret_env")]
    pub client_secret_env: String,

    /// Locale sent with equipment lookups
    #[serde(default = "defaults::locale")]
    pub locale: String,
}

impl Default for BlizzardConfig {
    fn default() -> Self {
        Self {
            client_id_env: defaults::client_id_env(),
            client_secret_env: defaults::client_secret_env(),
            locale: defaults::locale(),
        }
    }
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding record files, checkpoint and failure log
    #[serde(default = "defaults::data_dir")]
    pub data_dir: String,

    #[serde(default = "defaults::checkpoint_file")]
    pub checkpoint_file: String,

    #[serde(default = "defaults::failure_log")]
    pub failure_log: String,
}

impl PathsConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.data_dir().join(&self.checkpoint_file)
    }

    pub fn failure_log_path(&self) -> PathBuf {
        self.data_dir().join(&self.failure_log)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            checkpoint_file: defaults::checkpoint_file(),
            failure_log: defaults::failure_log(),
        }
    }
}

mod defaults {
    use super::Category;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; census/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Rate limit defaults
    pub fn max_requests() -> u32 {
        300
    }
    pub fn window_secs() -> u64 {
        60
    }

    // Collection defaults
    pub fn max_page() -> u32 {
        250
    }
    pub fn target_item_id() -> u64 {
        206448
    }
    pub fn ranking_region() -> String {
        "world".into()
    }
    pub fn season() -> String {
        "season-df-3".into()
    }

    // Endpoint defaults
    pub fn rankings_url() -> String {
        "https://raider.io/api/mythic-plus/rankings/characters".into()
    }
    pub fn profile_url() -> String {
        "https://raider.io/api/v1/characters/profile".into()
    }
    pub fn equipment_url() -> String {
        "https://{region}.api.blizzard.com/profile/wow/character/{realm}/{name}/equipment".into()
    }
    pub fn token_url() -> String {
        "https://us.battle.net/oauth/token".into()
    }

    // Credential defaults
    pub fn client_id_env() -> String {
        "CLIENT_ID".into()
    }
    pub fn client_secret_env() -> String {
        "CLIENT_SECRET".into()
    }
    pub fn locale() -> String {
        "en_US".into()
    }

    // Path defaults
    pub fn data_dir() -> String {
        "rio_data".into()
    }
    pub fn checkpoint_file() -> String {
        "progress.json".into()
    }
    pub fn failure_log() -> String {
        "failed_requests.log".into()
    }

    // Category defaults
    pub fn categories() -> Vec<Category> {
        vec![
            Category::new("death-knight", "all"),
            Category::new("paladin", "dps"),
            Category::new("warrior", "all"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_ceiling() {
        let mut config = Config::default();
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = Config::default();
        config.rate_limit.window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_categories() {
        let mut config = Config::default();
        config.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_categories() {
        let mut config = Config::default();
        config.categories.push(Category::new("warrior", "dps"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_categories_keep_declaration_order() {
        let names: Vec<_> = Config::default()
            .categories
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, ["death-knight", "paladin", "warrior"]);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [rate_limit]
            max_requests = 120

            [[categories]]
            name = "warrior"
            role = "all"
            prober = "blizzard"
            "#,
        )
        .unwrap();

        assert_eq!(config.rate_limit.max_requests, 120);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.collect.target_item_id, 206448);
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.prober_for(&config.categories[0]), ProberKind::Blizzard);
    }

    #[test]
    fn prober_falls_back_to_default() {
        let config = Config::default();
        assert_eq!(
            config.prober_for(&config.categories[0]),
            ProberKind::RaiderIo
        );
    }
}
