//! Crawl command implementation

use crate::config::Config;
use crate::crawl::{Crawler, SessionReport};
use crate::error::Result;
use crate::store::SourceSummary;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What a collection session produced, plus read-only corpus statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub report: SessionReport,
    pub summaries: Vec<SourceSummary>,
}

/// Run a full collection session over the configured sources
pub async fn cmd_crawl(mut config: Config, target: Option<usize>) -> Result<CrawlOutcome> {
    if let Some(target) = target {
        config.crawl.target_per_source = target;
    }
    info!("Database: {}", config.db_file.display());

    let crawler = Crawler::new(config).await?;
    let report = crawler.run_session().await?;
    let summaries = crawler.db().source_summaries().await?;

    Ok(CrawlOutcome { report, summaries })
}

pub fn print_session_report(outcome: &CrawlOutcome) {
    println!("Collection session complete");
    println!("{:-<60}", "");
    for (name, progress) in &outcome.report.per_source {
        println!(
            "{:<20} saved {:>4}  (fetched {}, existing {}, rejected {})",
            name, progress.saved, progress.fetched, progress.skipped_existing, progress.rejected
        );
    }
    println!("{:-<60}", "");
    println!("Total new articles: {}", outcome.report.total_saved());

    if outcome.summaries.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<20} {:>8} {:>10} {:>8} {:>8}",
        "Source", "Articles", "Avg words", "Min", "Max"
    );
    println!("{:-<60}", "");
    for s in &outcome.summaries {
        println!(
            "{:<20} {:>8} {:>10.0} {:>8} {:>8}",
            s.name, s.article_count, s.avg_word_count, s.min_words, s.max_words
        );
    }
}
