//! Article content extraction
//!
//! Title comes from an ordered selector chain; body text from the outlet's
//! container selectors with a first-N-paragraphs fallback for pages (or
//! outlets) where no container matches. Parsing is pure over the fetched
//! HTML so it can be tested without a network; [`extract`] wraps the fetch
//! and maps every failure to `None` for the skip-and-continue contract.

use crate::fetch::Fetcher;
use crate::profiles::SiteProfile;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// Paragraphs taken from the whole page when no body container matches
const FALLBACK_PARAGRAPH_LIMIT: usize = 15;

/// Extracted article content
#[derive(Debug, Clone)]
pub struct ArticleContent {
    pub title: String,
    pub content: String,
    pub word_count: usize,
    /// Always `None`: no outlet exposes a publish date we trust enough to
    /// parse, and inventing one from page metadata is worse than admitting
    /// the gap.
    pub publish_date: Option<DateTime<Utc>>,
}

/// Fetch a URL and extract its article content. Any fetch or parse problem
/// yields `None`; the caller skips the URL and moves on.
pub async fn extract(fetcher: &Fetcher, url: &str, profile: &SiteProfile) -> Option<ArticleContent> {
    match fetcher.fetch_text(url).await {
        Ok(html) => Some(extract_article(&html, profile)),
        Err(e) => {
            debug!("Extraction fetch failed for {}: {}", url, e);
            None
        }
    }
}

/// Extract title, body text, and word count from an HTML document
pub fn extract_article(html: &str, profile: &SiteProfile) -> ArticleContent {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let content = normalize_whitespace(&extract_body(&document, profile));
    let word_count = content.split_whitespace().count();

    ArticleContent {
        title,
        content,
        word_count,
        publish_date: None,
    }
}

/// First non-empty match from the title selector chain
fn extract_title(document: &Html) -> String {
    let title_selectors = ["h1", ".headline", ".entry-title", ".article-title", "title"];

    for selector_str in title_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(elem) = document.select(&selector).next() {
                let text = element_text(&elem);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    String::new()
}

/// Body text: profile container chain first, whole-page paragraphs last
fn extract_body(document: &Html, profile: &SiteProfile) -> String {
    let p_selector = Selector::parse("p").expect("static selector");

    for selector_str in &profile.container_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(container) = document.select(&selector).next() {
                let paragraphs: Vec<String> = container
                    .select(&p_selector)
                    .map(|p| element_text(&p))
                    .filter(|t| !t.is_empty())
                    .collect();
                if !paragraphs.is_empty() {
                    return paragraphs.join(" ");
                }
            }
        }
    }

    document
        .select(&p_selector)
        .take(FALLBACK_PARAGRAPH_LIMIT)
        .map(|p| element_text(&p))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_text(elem: &ElementRef) -> String {
    elem.text().collect::<String>().trim().to_string()
}

/// Collapse whitespace runs to single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    re.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::SiteProfile;

    fn body_profile() -> SiteProfile {
        SiteProfile {
            container_selectors: vec![
                "div.article__content".to_string(),
                r#"div[data-module="ArticleBody"]"#.to_string(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_from_primary_container() {
        let html = r#"
        <html><head><title>Page Title</title></head><body>
            <h1>Story Headline</h1>
            <p>Navigation junk outside the container.</p>
            <div class="article__content">
                <p>First paragraph of the story.</p>
                <p>   </p>
                <p>Second paragraph.</p>
            </div>
        </body></html>
        "#;

        let article = extract_article(html, &body_profile());
        assert_eq!(article.title, "Story Headline");
        assert_eq!(
            article.content,
            "First paragraph of the story. Second paragraph."
        );
        assert_eq!(article.word_count, 7);
        assert!(article.publish_date.is_none());
    }

    #[test]
    fn test_extract_from_fallback_container() {
        let html = r#"
        <html><body>
            <h1>Headline</h1>
            <div data-module="ArticleBody">
                <p>Body text from the fallback selector.</p>
            </div>
        </body></html>
        "#;

        let article = extract_article(html, &body_profile());
        assert!(article.content.contains("fallback selector"));
    }

    #[test]
    fn test_extract_falls_back_to_page_paragraphs() {
        let html = r#"
        <html><body>
            <p>One.</p><p>Two.</p><p>Three.</p>
        </body></html>
        "#;

        let article = extract_article(html, &body_profile());
        assert_eq!(article.content, "One. Two. Three.");
        assert_eq!(article.word_count, 3);
    }

    #[test]
    fn test_fallback_caps_paragraph_count() {
        let paragraphs: String = (0..30).map(|i| format!("<p>para{}</p>", i)).collect();
        let html = format!("<html><body>{}</body></html>", paragraphs);

        let article = extract_article(&html, &SiteProfile::default());
        assert_eq!(article.word_count, FALLBACK_PARAGRAPH_LIMIT);
    }

    #[test]
    fn test_title_selector_chain_order() {
        let html = r#"
        <html><head><title>Doc Title</title></head><body>
            <div class="headline">Class Headline</div>
        </body></html>
        "#;

        // no h1, so the headline class wins over the document title
        let article = extract_article(html, &SiteProfile::default());
        assert_eq!(article.title, "Class Headline");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }
}
