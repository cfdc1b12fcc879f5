//! Crawl orchestration
//!
//! A session walks the configured sources in order. For each source it
//! discovers candidate links, then fetches and extracts articles one at a
//! time with a randomized politeness delay, committing in fixed-size batches
//! and snapshotting the whole database at regular intervals. Per-article
//! failures are logged and skipped; only infrastructure failures (database,
//! missing source row) abort a source.

use crate::config::{Config, SourceSeed};
use crate::discover::LinkDiscovery;
use crate::error::Result;
use crate::extract;
use crate::fetch::{jitter_sleep, Fetcher};
use crate::profiles::ProfileRegistry;
use crate::store::{backup_path, NewArticle, NewsDb};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Per-source crawl counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceProgress {
    /// Article fetches actually spent (existing URLs never cost one)
    pub fetched: usize,
    /// Articles committed this run
    pub saved: usize,
    /// Candidate URLs already stored from an earlier run
    pub skipped_existing: usize,
    /// Extractions rejected by the quality gate
    pub rejected: usize,
}

/// Whole-session outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    pub per_source: Vec<(String, SourceProgress)>,
}

impl SessionReport {
    pub fn total_saved(&self) -> usize {
        self.per_source.iter().map(|(_, p)| p.saved).sum()
    }
}

/// Crawl session orchestrator
pub struct Crawler {
    config: Config,
    db: NewsDb,
    fetcher: Fetcher,
    profiles: ProfileRegistry,
}

impl Crawler {
    /// Open the database, seed the source table, and prepare the fetcher
    pub async fn new(config: Config) -> Result<Self> {
        let db = NewsDb::connect(&config.db_file).await?;
        db.seed_sources(&config.sources).await?;
        let fetcher = Fetcher::new(&config.crawl)?;

        Ok(Self {
            config,
            db,
            fetcher,
            profiles: ProfileRegistry::builtin(),
        })
    }

    pub fn db(&self) -> &NewsDb {
        &self.db
    }

    /// Run a full collection session over every configured source
    pub async fn run_session(&self) -> Result<SessionReport> {
        info!(
            "Starting collection session: {} sources, target {} articles each",
            self.config.sources.len(),
            self.config.crawl.target_per_source
        );

        self.snapshot("_initial").await;

        let mut report = SessionReport::default();
        let source_count = self.config.sources.len();

        for (index, seed) in self.config.sources.iter().enumerate() {
            info!(
                "[{}/{}] Collecting from {} ({})",
                index + 1,
                source_count,
                seed.name,
                seed.homepage
            );

            match self.crawl_source(seed).await {
                Ok(progress) => {
                    info!(
                        "{}: saved {} articles ({} fetched, {} already stored, {} rejected)",
                        seed.name,
                        progress.saved,
                        progress.fetched,
                        progress.skipped_existing,
                        progress.rejected
                    );
                    report.per_source.push((seed.name.clone(), progress));
                }
                Err(e) => {
                    warn!("Source {} failed: {}", seed.name, e);
                    report
                        .per_source
                        .push((seed.name.clone(), SourceProgress::default()));
                }
            }

            self.snapshot(&format!("_{}", sanitize(&seed.name))).await;

            if index + 1 < source_count {
                let pause = &self.config.crawl;
                debug!("Pausing before next source");
                jitter_sleep(
                    pause.source_pause_min_secs * 1000,
                    pause.source_pause_max_secs * 1000,
                )
                .await;
            }
        }

        self.snapshot("_FINAL").await;

        let total = self.db.article_count().await?;
        info!(
            "Session complete: {} new articles, {} total in database",
            report.total_saved(),
            total
        );
        Ok(report)
    }

    /// Crawl one source up to its article target
    pub async fn crawl_source(&self, seed: &SourceSeed) -> Result<SourceProgress> {
        let crawl = &self.config.crawl;
        let source_id = self.db.source_id(&seed.name).await?;
        let profile = self.profiles.resolve(&seed.domain);

        let discovery = LinkDiscovery::new(&self.fetcher);
        let links = discovery
            .discover(
                &seed.homepage,
                profile,
                crawl.target_per_source * crawl.link_multiplier,
                crawl.target_per_source,
                crawl.max_section_fetches,
            )
            .await;

        let mut progress = SourceProgress::default();
        let mut batch = self.db.begin_batch().await?;
        let mut batches_committed = 0usize;

        for url in &links {
            if progress.saved >= crawl.target_per_source {
                break;
            }

            // Dedup check first so re-runs never spend a fetch on a stored URL
            if self.db.article_exists(url).await? {
                progress.skipped_existing += 1;
                continue;
            }

            progress.fetched += 1;
            let article = match extract::extract(&self.fetcher, url, profile).await {
                Some(a) => a,
                None => {
                    jitter_sleep(crawl.delay_min_ms, crawl.delay_max_ms).await;
                    continue;
                }
            };

            if article.content.is_empty()
                || article.word_count <= self.config.quality.min_word_count
            {
                debug!(
                    "Rejected {} ({} words, need more than {})",
                    url, article.word_count, self.config.quality.min_word_count
                );
                progress.rejected += 1;
                jitter_sleep(crawl.delay_min_ms, crawl.delay_max_ms).await;
                continue;
            }

            let inserted = batch
                .insert(&NewArticle {
                    source_id,
                    url: url.clone(),
                    title: article.title,
                    content: article.content,
                    word_count: article.word_count as i64,
                    publish_date: article.publish_date.map(|d| d.to_rfc3339()),
                })
                .await?;

            if inserted {
                progress.saved += 1;
                debug!("Saved: {} ({} total)", url, progress.saved);
            }

            if batch.pending() >= crawl.batch_size {
                batch.commit().await?;
                batches_committed += 1;
                info!(
                    "{}: committed batch {} ({} articles this source)",
                    seed.name, batches_committed, progress.saved
                );
                batch = self.db.begin_batch().await?;

                if batches_committed % crawl.backup_every_batches == 0 {
                    self.snapshot(&format!("_auto_{}", sanitize(&seed.name)))
                        .await;
                }
            }

            jitter_sleep(crawl.delay_min_ms, crawl.delay_max_ms).await;
        }

        // Commit whatever the last partial batch holds
        if batch.pending() > 0 {
            batch.commit().await?;
        }

        Ok(progress)
    }

    /// Snapshot the database into the backup directory. Backup problems are
    /// logged, never fatal to a running session.
    async fn snapshot(&self, suffix: &str) {
        let path = backup_path(&self.config.backup_dir, suffix);
        if let Err(e) = self.db.snapshot_to(&path).await {
            warn!("Backup failed ({}): {}", path.display(), e);
        }
    }
}

fn sanitize(name: &str) -> String {
    name.replace(' ', "_")
}
