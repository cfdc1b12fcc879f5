//! SQLite schema definition

/// SQL schema for the article database. The same DDL is applied to backup
/// snapshot files so every snapshot stands alone.
pub const SCHEMA_SQL: &str = r#"
-- Sources: the outlets articles are collected from, seeded once
CREATE TABLE IF NOT EXISTS news_sources (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    domain TEXT UNIQUE,
    credibility_score INTEGER,
    source_type TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Articles: one row per unique URL, never updated or deleted here
CREATE TABLE IF NOT EXISTS scraped_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER REFERENCES news_sources(id),
    url TEXT UNIQUE,
    title TEXT,
    content TEXT,
    publish_date TEXT,
    scraped_at TEXT NOT NULL DEFAULT (datetime('now')),
    word_count INTEGER
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_articles_source ON scraped_articles(source_id);
CREATE INDEX IF NOT EXISTS idx_articles_word_count ON scraped_articles(word_count);
"#;
