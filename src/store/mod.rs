//! Article storage using SQLite
//!
//! This module owns the schema (sources, articles) and everything the crawl
//! orchestrator needs from it: idempotent source seeding, URL existence
//! checks, batched article inserts with explicit transaction boundaries,
//! and point-in-time snapshots into independent backup files. It also
//! carries the read interface the downstream sentiment-extraction stage
//! consumes.
//!
//! Articles are created exactly once per unique URL and never updated or
//! deleted by this subsystem.

mod schema;

pub use schema::*;

use crate::config::SourceSeed;
use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, FromRow, Sqlite, SqliteConnection, Transaction};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A seeded news source row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub credibility_score: i64,
    pub source_type: String,
    pub created_at: String,
}

/// A stored article row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub source_id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
    pub publish_date: Option<String>,
    pub scraped_at: String,
    pub word_count: i64,
}

/// A new article pending insertion
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub source_id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
    pub word_count: i64,
    pub publish_date: Option<String>,
}

/// An article joined with its source name, as returned by the read interface
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EntityArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub word_count: i64,
    pub url: String,
    pub source: String,
}

/// Filters for the entity read interface. Defaults mirror what the
/// sentiment-extraction stage asks for: mid-length articles with enough
/// body text to carry sentences.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    pub source_pattern: String,
    pub entity: String,
    pub min_word_count: i64,
    pub max_word_count: i64,
    pub min_content_len: i64,
    pub limit: i64,
}

impl ArticleQuery {
    pub fn new(source_pattern: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            source_pattern: source_pattern.into(),
            entity: entity.into(),
            min_word_count: 200,
            max_word_count: 1500,
            min_content_len: 300,
            limit: 50,
        }
    }
}

/// Per-source aggregate statistics (read-only)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SourceSummary {
    pub name: String,
    pub article_count: i64,
    pub avg_word_count: f64,
    pub min_words: i64,
    pub max_words: i64,
    pub total_words: i64,
}

/// Article database handle
#[derive(Clone)]
pub struct NewsDb {
    pool: SqlitePool,
}

impl NewsDb {
    /// Open (or create) the database at the given path and ensure the schema
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Initialize the database schema (idempotent)
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    // ===== Source Operations =====

    /// Seed source rows, ignoring any that already exist (keyed by id/domain)
    pub async fn seed_sources(&self, seeds: &[SourceSeed]) -> Result<()> {
        for seed in seeds {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO news_sources
                (id, name, domain, credibility_score, source_type)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(seed.id)
            .bind(&seed.name)
            .bind(&seed.domain)
            .bind(seed.credibility_score)
            .bind(&seed.source_type)
            .execute(&self.pool)
            .await?;
        }
        info!("Seeded {} sources", seeds.len());
        Ok(())
    }

    /// Resolve a source id by display name. Absence is a seeding bug, not a
    /// runtime transient, so it surfaces as an error.
    pub async fn source_id(&self, name: &str) -> Result<i64> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM news_sources WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        id.ok_or_else(|| Error::SourceNotFound(name.to_string()))
    }

    /// List all seeded sources
    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>("SELECT * FROM news_sources ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(sources)
    }

    // ===== Article Operations =====

    /// Check whether an article URL is already stored. The orchestrator
    /// calls this before spending a fetch.
    pub async fn article_exists(&self, url: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM scraped_articles WHERE url = ?")
                .bind(url)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Total stored article count
    pub async fn article_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scraped_articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Open a new batch transaction boundary
    pub async fn begin_batch(&self) -> Result<ArticleBatch> {
        let tx = self.pool.begin().await?;
        Ok(ArticleBatch { tx, pending: 0 })
    }

    // ===== Read Interface (consumed by the extraction stage) =====

    /// Articles from sources matching a name pattern that mention an entity
    /// in content or title, ordered by word count descending
    pub async fn fetch_articles(&self, query: &ArticleQuery) -> Result<Vec<EntityArticle>> {
        let source_pattern = format!("%{}%", query.source_pattern);
        let entity_pattern = format!("%{}%", query.entity.to_lowercase());

        let articles = sqlx::query_as::<_, EntityArticle>(
            r#"
            SELECT
                sa.id,
                sa.title,
                sa.content,
                sa.word_count,
                sa.url,
                ns.name AS source
            FROM scraped_articles sa
            JOIN news_sources ns ON sa.source_id = ns.id
            WHERE ns.name LIKE ? COLLATE NOCASE
            AND sa.word_count BETWEEN ? AND ?
            AND sa.content IS NOT NULL
            AND LENGTH(sa.content) > ?
            AND (LOWER(sa.content) LIKE ? OR LOWER(sa.title) LIKE ?)
            ORDER BY sa.word_count DESC
            LIMIT ?
            "#,
        )
        .bind(&source_pattern)
        .bind(query.min_word_count)
        .bind(query.max_word_count)
        .bind(query.min_content_len)
        .bind(&entity_pattern)
        .bind(&entity_pattern)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    /// Per-source aggregate statistics, busiest sources first. Read-only.
    pub async fn source_summaries(&self) -> Result<Vec<SourceSummary>> {
        let summaries = sqlx::query_as::<_, SourceSummary>(
            r#"
            SELECT
                ns.name,
                COUNT(*) AS article_count,
                AVG(sa.word_count) AS avg_word_count,
                MIN(sa.word_count) AS min_words,
                MAX(sa.word_count) AS max_words,
                SUM(sa.word_count) AS total_words
            FROM scraped_articles sa
            JOIN news_sources ns ON sa.source_id = ns.id
            GROUP BY ns.name
            ORDER BY article_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    // ===== Backup Snapshots =====

    /// Copy both tables into an independent SQLite file at `path`. Callers
    /// serialize snapshots with batch commit boundaries; rows inside an open
    /// transaction are not part of the snapshot.
    pub async fn snapshot_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let mut backup = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| Error::Backup(format!("cannot open {}: {}", path.display(), e)))?;

        sqlx::query(SCHEMA_SQL).execute(&mut backup).await?;

        let sources = self.list_sources().await?;
        for source in &sources {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO news_sources
                (id, name, domain, credibility_score, source_type, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(source.id)
            .bind(&source.name)
            .bind(&source.domain)
            .bind(source.credibility_score)
            .bind(&source.source_type)
            .bind(&source.created_at)
            .execute(&mut backup)
            .await?;
        }

        let articles = sqlx::query_as::<_, Article>("SELECT * FROM scraped_articles")
            .fetch_all(&self.pool)
            .await?;
        let article_count = articles.len();
        for article in &articles {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO scraped_articles
                (id, source_id, url, title, content, publish_date, scraped_at, word_count)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(article.id)
            .bind(article.source_id)
            .bind(&article.url)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.publish_date)
            .bind(&article.scraped_at)
            .bind(article.word_count)
            .execute(&mut backup)
            .await?;
        }

        backup.close().await.ok();
        info!(
            "Snapshot written: {} ({} sources, {} articles)",
            path.display(),
            sources.len(),
            article_count
        );
        Ok(())
    }
}

/// A batch of article inserts inside one transaction. Dropping the batch
/// without committing rolls it back; re-crawls recover the rows because
/// inserts are idempotent on URL.
pub struct ArticleBatch {
    tx: Transaction<'static, Sqlite>,
    pending: usize,
}

impl ArticleBatch {
    /// Insert an article. A duplicate URL is silently ignored and reported
    /// as `false`, never an error.
    pub async fn insert(&mut self, article: &NewArticle) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO scraped_articles
            (source_id, url, title, content, word_count, publish_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(article.source_id)
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.word_count)
        .bind(&article.publish_date)
        .execute(&mut *self.tx)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            self.pending += 1;
        }
        Ok(inserted)
    }

    /// Rows inserted since this batch was opened
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Commit the transaction boundary
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Build a timestamped backup file path under `backup_dir`, with an
/// optional contextual suffix such as `_initial`, a source name, or `_FINAL`
pub fn backup_path(backup_dir: &Path, suffix: &str) -> PathBuf {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    backup_dir.join(format!("news_backup_{}{}.sqlite", timestamp, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceSeed;
    use tempfile::TempDir;

    async fn setup_test_db() -> (NewsDb, TempDir) {
        let tmp = TempDir::new().unwrap();
        let db = NewsDb::connect(&tmp.path().join("test.db")).await.unwrap();
        db.seed_sources(&SourceSeed::builtin()).await.unwrap();
        (db, tmp)
    }

    fn sample_article(source_id: i64, url: &str, words: usize) -> NewArticle {
        NewArticle {
            source_id,
            url: url.to_string(),
            title: format!("Title for {}", url),
            content: vec!["word"; words].join(" "),
            word_count: words as i64,
            publish_date: None,
        }
    }

    #[tokio::test]
    async fn test_seed_sources_is_idempotent() {
        let (db, _tmp) = setup_test_db().await;
        db.seed_sources(&SourceSeed::builtin()).await.unwrap();
        assert_eq!(db.list_sources().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_source_id_lookup() {
        let (db, _tmp) = setup_test_db().await;
        assert_eq!(db.source_id("CNN").await.unwrap(), 1);

        let err = db.source_id("Daily Bugle").await.unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_url_insert_is_noop() {
        let (db, _tmp) = setup_test_db().await;

        let mut batch = db.begin_batch().await.unwrap();
        assert!(batch
            .insert(&sample_article(1, "https://cnn.com/politics/a", 150))
            .await
            .unwrap());
        assert!(!batch
            .insert(&sample_article(1, "https://cnn.com/politics/a", 150))
            .await
            .unwrap());
        assert_eq!(batch.pending(), 1);
        batch.commit().await.unwrap();

        assert_eq!(db.article_count().await.unwrap(), 1);
        assert!(db.article_exists("https://cnn.com/politics/a").await.unwrap());
    }

    #[tokio::test]
    async fn test_uncommitted_batch_is_rolled_back() {
        let (db, _tmp) = setup_test_db().await;

        {
            let mut batch = db.begin_batch().await.unwrap();
            batch
                .insert(&sample_article(1, "https://cnn.com/politics/lost", 150))
                .await
                .unwrap();
            // dropped without commit
        }

        assert_eq!(db.article_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_articles_filters_and_orders() {
        let (db, _tmp) = setup_test_db().await;

        let mut batch = db.begin_batch().await.unwrap();
        let mut long_mention = sample_article(1, "https://cnn.com/politics/long", 900);
        long_mention.content = format!("{} Obama spoke today.", long_mention.content);
        long_mention.word_count = 903;
        batch.insert(&long_mention).await.unwrap();

        let mut short_mention = sample_article(1, "https://cnn.com/politics/short", 300);
        short_mention.content = format!("{} Obama appeared briefly.", short_mention.content);
        short_mention.word_count = 303;
        batch.insert(&short_mention).await.unwrap();

        // mentions the entity but is too short for the word range
        let mut tiny = sample_article(1, "https://cnn.com/politics/tiny", 50);
        tiny.content = "Obama.".to_string();
        tiny.word_count = 1;
        batch.insert(&tiny).await.unwrap();

        // in range but never mentions the entity
        batch
            .insert(&sample_article(1, "https://cnn.com/politics/unrelated", 500))
            .await
            .unwrap();
        batch.commit().await.unwrap();

        let results = db
            .fetch_articles(&ArticleQuery::new("CNN", "obama"))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://cnn.com/politics/long");
        assert_eq!(results[1].url, "https://cnn.com/politics/short");
        assert_eq!(results[0].source, "CNN");
    }

    #[tokio::test]
    async fn test_source_summaries() {
        let (db, _tmp) = setup_test_db().await;

        let mut batch = db.begin_batch().await.unwrap();
        batch
            .insert(&sample_article(1, "https://cnn.com/politics/a", 200))
            .await
            .unwrap();
        batch
            .insert(&sample_article(1, "https://cnn.com/politics/b", 400))
            .await
            .unwrap();
        batch
            .insert(&sample_article(6, "https://bbc.com/news/c", 300))
            .await
            .unwrap();
        batch.commit().await.unwrap();

        let summaries = db.source_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "CNN");
        assert_eq!(summaries[0].article_count, 2);
        assert_eq!(summaries[0].min_words, 200);
        assert_eq!(summaries[0].max_words, 400);
        assert!((summaries[0].avg_word_count - 300.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_snapshot_copies_both_tables() {
        let (db, tmp) = setup_test_db().await;

        let mut batch = db.begin_batch().await.unwrap();
        batch
            .insert(&sample_article(1, "https://cnn.com/politics/a", 200))
            .await
            .unwrap();
        batch.commit().await.unwrap();

        let snapshot = tmp.path().join("backup.sqlite");
        db.snapshot_to(&snapshot).await.unwrap();

        let copy = NewsDb::connect(&snapshot).await.unwrap();
        assert_eq!(copy.list_sources().await.unwrap().len(), 10);
        assert_eq!(copy.article_count().await.unwrap(), 1);
        assert!(copy.article_exists("https://cnn.com/politics/a").await.unwrap());
    }

    #[test]
    fn test_backup_path_shape() {
        let path = backup_path(Path::new("/tmp/backups"), "_FINAL");
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("news_backup_"));
        assert!(name.ends_with("_FINAL.sqlite"));
    }
}
