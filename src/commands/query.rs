//! Query command implementation

use crate::error::Result;
use crate::store::{ArticleQuery, EntityArticle, NewsDb};
use tracing::info;

/// Fetch stored articles mentioning an entity
pub async fn cmd_query(db: &NewsDb, query: &ArticleQuery) -> Result<Vec<EntityArticle>> {
    info!(
        "Querying articles: source ~ '{}', entity '{}'",
        query.source_pattern, query.entity
    );
    db.fetch_articles(query).await
}

pub fn print_articles(articles: &[EntityArticle]) {
    if articles.is_empty() {
        println!("No matching articles");
        return;
    }

    for article in articles {
        println!("[{}] {} ({} words)", article.source, article.title, article.word_count);
        println!("  {}", article.url);
        println!("  {}", preview(&article.content, 160));
        println!();
    }
    println!("{} article(s)", articles.len());
}

fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(200);
        let p = preview(&text, 160);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 163);
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short", 160), "short");
    }
}
