//! Configuration management for newsharvest
//!
//! Handles loading, saving, and validating configuration from TOML files.
//! Every knob has a serde default so a partial (or absent) config file still
//! yields a fully usable setup.

mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Primary SQLite database file
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,

    /// Directory for timestamped backup snapshots
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Crawling configuration
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Quality gate configuration
    #[serde(default)]
    pub quality: QualityConfig,

    /// News sources to seed and crawl, in session order
    #[serde(default = "SourceSeed::builtin")]
    pub sources: Vec<SourceSeed>,
}

/// Crawling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Global requests-per-second ceiling (safety net under the jitter delay)
    #[serde(default = "default_rate_limit_rps")]
    pub rate_limit_rps: u32,

    /// Whether to respect robots.txt
    #[serde(default = "default_respect_robots")]
    pub respect_robots_txt: bool,

    /// Minimum randomized delay between article fetches (milliseconds)
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Maximum randomized delay between article fetches (milliseconds)
    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,

    /// Minimum randomized pause between sources (seconds)
    #[serde(default = "default_source_pause_min_secs")]
    pub source_pause_min_secs: u64,

    /// Maximum randomized pause between sources (seconds)
    #[serde(default = "default_source_pause_max_secs")]
    pub source_pause_max_secs: u64,

    /// Target article count per source
    #[serde(default = "default_target_per_source")]
    pub target_per_source: usize,

    /// Discovery gathers `target * link_multiplier` candidate links
    #[serde(default = "default_link_multiplier")]
    pub link_multiplier: usize,

    /// Cap on secondary section-page fetches per source
    #[serde(default = "default_max_section_fetches")]
    pub max_section_fetches: usize,

    /// Articles per transaction
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Full-database snapshot every N committed batches
    #[serde(default = "default_backup_every_batches")]
    pub backup_every_batches: usize,
}

/// Quality gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Minimum word count for a persisted article
    #[serde(default = "default_min_word_count")]
    pub min_word_count: usize,
}

/// A news source seed row: identity plus the homepage the crawl starts from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSeed {
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub homepage: String,
    pub credibility_score: i64,
    #[serde(default = "SourceSeed::default_type")]
    pub source_type: String,
}

impl SourceSeed {
    fn default_type() -> String {
        "news".to_string()
    }

    /// The ten outlets the collector ships with, in session order
    pub fn builtin() -> Vec<SourceSeed> {
        let seeds = [
            (1, "CNN", "cnn.com", "https://www.cnn.com", 7),
            (2, "CBS News", "cbsnews.com", "https://www.cbsnews.com", 8),
            (3, "Fox News", "foxnews.com", "https://www.foxnews.com", 6),
            (4, "Reuters", "reuters.com", "https://www.reuters.com", 9),
            (5, "Associated Press", "apnews.com", "https://apnews.com", 9),
            (6, "BBC News", "bbc.com", "https://www.bbc.com/news", 8),
            (7, "The Guardian", "theguardian.com", "https://www.theguardian.com", 8),
            (8, "NPR", "npr.org", "https://www.npr.org", 8),
            (9, "ABC News", "abcnews.go.com", "https://abcnews.go.com", 7),
            (10, "NBC News", "nbcnews.com", "https://www.nbcnews.com", 7),
        ];

        seeds
            .iter()
            .map(|&(id, name, domain, homepage, credibility)| SourceSeed {
                id,
                name: name.to_string(),
                domain: domain.to_string(),
                homepage: homepage.to_string(),
                credibility_score: credibility,
                source_type: Self::default_type(),
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            backup_dir: default_backup_dir(),
            crawl: CrawlConfig::default(),
            quality: QualityConfig::default(),
            sources: SourceSeed::builtin(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            rate_limit_rps: default_rate_limit_rps(),
            respect_robots_txt: default_respect_robots(),
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
            source_pause_min_secs: default_source_pause_min_secs(),
            source_pause_max_secs: default_source_pause_max_secs(),
            target_per_source: default_target_per_source(),
            link_multiplier: default_link_multiplier(),
            max_section_fetches: default_max_section_fetches(),
            batch_size: default_batch_size(),
            backup_every_batches: default_backup_every_batches(),
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_word_count: default_min_word_count(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsharvest")
            .join("config.toml")
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the given path, falling back to defaults when the file
    /// does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            debug!("No config file at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
