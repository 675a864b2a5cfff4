//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Bangumi API endpoint.
pub const DEFAULT_BANGUMI_BASE_URL: &str = "https://api.bgm.tv";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bangumi API configuration.
    pub bangumi: BangumiConfig,
    /// Resolution behaviour flags.
    pub resolver: ResolverConfig,
    /// Files resolved in parallel when resolving a directory.
    pub concurrency: usize,
}

/// Bangumi API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BangumiConfig {
    /// API base URL.
    pub base_url: String,
    /// Personal access token.
    pub access_token: Option<String>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Page size for episode list requests.
    pub page_size: u32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Resolution behaviour flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Always take the episode number from the file name.
    pub always_replace_episode_number: bool,
    /// Accept an already attached episode ID without checks.
    pub trust_existed_bangumi_id: bool,
    /// Ask the token-based extractor for the episode number first.
    pub always_get_episode_by_anitomy_sharp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bangumi: BangumiConfig::default(),
            resolver: ResolverConfig::default(),
            concurrency: 4,
        }
    }
}

impl Default for BangumiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BANGUMI_BASE_URL.to_string(),
            access_token: std::env::var("BANGUMI_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            user_agent: format!("jpixy/bangumi_episode/{}", env!("CARGO_PKG_VERSION")),
            page_size: 100,
            timeout: 30,
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bangumi_episode")
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    if config.concurrency == 0 {
        return Err(crate::Error::Config("concurrency must be at least 1".to_string()));
    }
    if config.bangumi.page_size == 0 {
        return Err(crate::Error::Config(
            "bangumi.page_size must be at least 1".to_string(),
        ));
    }

    Ok(config)
}

/// Load configuration from the default location, falling back to defaults.
pub fn load_config() -> Config {
    let config_path = default_config_path();

    if config_path.exists() {
        match load_config_from(&config_path) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!(
                    "Ignoring config file {}: {}",
                    config_path.display(),
                    e
                );
            }
        }
    }

    Config::default()
}
