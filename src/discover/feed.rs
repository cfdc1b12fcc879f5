//! RSS feed handling for link discovery
//!
//! Feeds are parsed with plain string operations over the XML, enough for
//! the `<item><link>` shape every outlet feed shares. A malformed feed just
//! yields fewer (or zero) links; discovery falls back to HTML patterns.

use scraper::{Html, Selector};
use url::Url;

/// Find the first RSS feed reference on a page, resolved against the base URL
pub fn find_feed_url(document: &Html, base: &Url) -> Option<String> {
    let selector = Selector::parse(r#"link[type="application/rss+xml"]"#).ok()?;
    let href = document
        .select(&selector)
        .next()
        .and_then(|elem| elem.value().attr("href"))?;
    base.join(href).map(|u| u.to_string()).ok()
}

/// Extract up to `max_links` item URLs from feed XML, keeping only items
/// whose host matches the seed host (ignoring a leading `www.`)
pub fn parse_feed_items(xml: &str, seed_host: &str, max_links: usize) -> Vec<String> {
    let bare_host = seed_host.trim_start_matches("www.");
    let mut links = Vec::new();

    for item_block in xml.split("<item>").skip(1) {
        if links.len() >= max_links {
            break;
        }
        let block = match item_block.find("</item>") {
            Some(end) => &item_block[..end],
            None => item_block,
        };

        if let Some(link) = extract_tag(block, "link") {
            let host_matches = Url::parse(&link)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.") == bare_host))
                .unwrap_or(false);
            if host_matches && !links.contains(&link) {
                links.push(link);
            }
        }
    }

    links
}

/// Extract text content from an XML tag
fn extract_tag(content: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    content.find(&start_tag).and_then(|start| {
        let value_start = start + start_tag.len();
        content[value_start..]
            .find(&end_tag)
            .map(|end| content[value_start..value_start + end].trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tag() {
        let xml = "<link>https://example.com/story</link>";
        assert_eq!(
            extract_tag(xml, "link"),
            Some("https://example.com/story".to_string())
        );
    }

    #[test]
    fn test_parse_feed_items_filters_foreign_hosts() {
        let xml = r#"
        <rss><channel>
            <item><link>https://www.example.com/politics/one</link></item>
            <item><link>https://other.com/politics/two</link></item>
            <item><link>https://example.com/politics/three</link></item>
        </channel></rss>
        "#;

        let links = parse_feed_items(xml, "example.com", 10);
        assert_eq!(
            links,
            vec![
                "https://www.example.com/politics/one".to_string(),
                "https://example.com/politics/three".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_feed_items_respects_cap() {
        let xml: String = (0..20)
            .map(|i| format!("<item><link>https://example.com/s/{}</link></item>", i))
            .collect();
        let links = parse_feed_items(&xml, "www.example.com", 5);
        assert_eq!(links.len(), 5);
    }

    #[test]
    fn test_find_feed_url_resolves_relative() {
        let html = Html::parse_document(
            r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="/rss/index.xml">
            </head><body></body></html>"#,
        );
        let base = Url::parse("https://example.com/news").unwrap();
        assert_eq!(
            find_feed_url(&html, &base),
            Some("https://example.com/rss/index.xml".to_string())
        );
    }

    #[test]
    fn test_find_feed_url_absent() {
        let html = Html::parse_document("<html><head></head><body></body></html>");
        let base = Url::parse("https://example.com").unwrap();
        assert_eq!(find_feed_url(&html, &base), None);
    }
}
