//! Default values for configuration

use std::path::PathBuf;

/// Default database file location
pub fn default_db_file() -> PathBuf {
    data_dir().join("sentiment_research.db")
}

/// Default backup directory
pub fn default_backup_dir() -> PathBuf {
    data_dir().join("backups")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newsharvest")
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!("newsharvest/{} (research collector)", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    15
}

/// Default global rate limit (requests per second)
pub fn default_rate_limit_rps() -> u32 {
    2
}

/// Default: respect robots.txt
pub fn default_respect_robots() -> bool {
    true
}

/// Default minimum inter-request delay (milliseconds)
pub fn default_delay_min_ms() -> u64 {
    1000
}

/// Default maximum inter-request delay (milliseconds)
pub fn default_delay_max_ms() -> u64 {
    3000
}

/// Default minimum pause between sources (seconds)
pub fn default_source_pause_min_secs() -> u64 {
    5
}

/// Default maximum pause between sources (seconds)
pub fn default_source_pause_max_secs() -> u64 {
    20
}

/// Default target article count per source
pub fn default_target_per_source() -> usize {
    500
}

/// Default link over-fetch multiplier (discovery gathers target * multiplier
/// candidates to absorb extraction failures)
pub fn default_link_multiplier() -> usize {
    3
}

/// Default cap on secondary section-page fetches per source
pub fn default_max_section_fetches() -> usize {
    3
}

/// Default batch size (articles per transaction)
pub fn default_batch_size() -> usize {
    50
}

/// Default backup interval, in full batches
pub fn default_backup_every_batches() -> usize {
    5
}

/// Default quality gate: minimum word count for a persisted article
pub fn default_min_word_count() -> usize {
    100
}
