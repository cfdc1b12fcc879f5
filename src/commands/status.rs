//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::store::{NewsDb, SourceSummary};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub db_path: String,
    pub backup_dir: String,
    pub source_count: usize,
    pub article_count: i64,
    pub summaries: Vec<SourceSummary>,
}

/// Get database status and per-source statistics
pub async fn cmd_status(config: &Config, db: &NewsDb) -> Result<StatusInfo> {
    info!("Getting status");

    let sources = db.list_sources().await?;
    let article_count = db.article_count().await?;
    let summaries = db.source_summaries().await?;

    Ok(StatusInfo {
        db_path: config.db_file.display().to_string(),
        backup_dir: config.backup_dir.display().to_string(),
        source_count: sources.len(),
        article_count,
        summaries,
    })
}

pub fn print_status(status: &StatusInfo) {
    println!("Database:   {}", status.db_path);
    println!("Backups:    {}", status.backup_dir);
    println!("Sources:    {}", status.source_count);
    println!("Articles:   {}", status.article_count);

    if status.summaries.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<20} {:>8} {:>10} {:>8} {:>8}",
        "Source", "Articles", "Avg words", "Min", "Max"
    );
    println!("{:-<60}", "");
    for s in &status.summaries {
        println!(
            "{:<20} {:>8} {:>10.0} {:>8} {:>8}",
            s.name, s.article_count, s.avg_word_count, s.min_words, s.max_words
        );
    }
}
