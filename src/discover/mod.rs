//! Candidate article URL discovery
//!
//! Discovery runs an explicit ordered strategy list against the seed page:
//! the outlet's RSS feed first (short-circuits when it yields anything),
//! then profile-filtered anchors from the seed page's HTML. When the result
//! is still under the per-source quota floor, a bounded number of section
//! pages is probed with the same acceptance rule. Every network or parse
//! error inside discovery is logged and treated as zero links from that
//! request; discovery itself never fails.

mod feed;

pub use feed::*;

use crate::fetch::Fetcher;
use crate::profiles::SiteProfile;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Anchors considered per section page during expansion
const SECTION_ANCHOR_LIMIT: usize = 50;

/// Ordered discovery strategies; each may produce a link set, and the first
/// non-empty result from a short-circuiting strategy wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Feed,
    HtmlPatterns,
}

/// Link discovery over a shared fetcher
pub struct LinkDiscovery<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> LinkDiscovery<'a> {
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self { fetcher }
    }

    /// Discover up to `max_links` candidate article URLs for a seed page.
    /// `quota_floor` triggers section expansion (bounded by `max_sections`
    /// fetches) when the primary strategies come up short. Returns an
    /// ordered, deduplicated list.
    pub async fn discover(
        &self,
        seed_url: &str,
        profile: &SiteProfile,
        max_links: usize,
        quota_floor: usize,
        max_sections: usize,
    ) -> Vec<String> {
        let seed = match Url::parse(seed_url) {
            Ok(u) => u,
            Err(e) => {
                warn!("Invalid seed URL {}: {}", seed_url, e);
                return Vec::new();
            }
        };

        let seed_html = match self.fetcher.fetch_text(seed_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch seed page {}: {}", seed_url, e);
                return Vec::new();
            }
        };

        let mut links = Vec::new();
        for strategy in [Strategy::Feed, Strategy::HtmlPatterns] {
            links = self
                .run_strategy(strategy, &seed_html, &seed, profile, max_links)
                .await;
            if !links.is_empty() {
                debug!("{:?} strategy found {} links", strategy, links.len());
                break;
            }
        }

        if links.len() < quota_floor && !profile.section_paths.is_empty() {
            info!(
                "Only {} links for {} (floor {}), probing section pages",
                links.len(),
                seed.host_str().unwrap_or(seed_url),
                quota_floor
            );
            self.expand_sections(&mut links, &seed, profile, max_links, max_sections)
                .await;
        }

        links.truncate(max_links);
        info!("Discovered {} candidate links from {}", links.len(), seed_url);
        links
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        seed_html: &str,
        seed: &Url,
        profile: &SiteProfile,
        max_links: usize,
    ) -> Vec<String> {
        match strategy {
            Strategy::Feed => self.feed_links(seed_html, seed, max_links).await,
            Strategy::HtmlPatterns => anchor_links(seed_html, seed, profile, max_links),
        }
    }

    /// Feed strategy: locate the RSS reference on the seed page and pull
    /// item links from the feed
    async fn feed_links(&self, seed_html: &str, seed: &Url, max_links: usize) -> Vec<String> {
        let feed_url = {
            let document = Html::parse_document(seed_html);
            match find_feed_url(&document, seed) {
                Some(u) => u,
                None => return Vec::new(),
            }
        };

        match self.fetcher.fetch_text(&feed_url).await {
            Ok(xml) => {
                let host = seed.host_str().unwrap_or_default();
                let links = parse_feed_items(&xml, host, max_links);
                if !links.is_empty() {
                    info!("Found {} articles via RSS feed {}", links.len(), feed_url);
                }
                links
            }
            Err(e) => {
                warn!(
                    "RSS fetch failed for {}, falling back to HTML parsing: {}",
                    feed_url, e
                );
                Vec::new()
            }
        }
    }

    /// Probe up to the configured number of section pages, appending unseen
    /// URLs that pass the same acceptance rule
    async fn expand_sections(
        &self,
        links: &mut Vec<String>,
        seed: &Url,
        profile: &SiteProfile,
        max_links: usize,
        max_sections: usize,
    ) {
        let mut seen: HashSet<String> = links.iter().cloned().collect();

        for section in profile.section_paths.iter().take(max_sections) {
            if links.len() >= max_links {
                break;
            }
            let section_url = match seed.join(section) {
                Ok(u) => u.to_string(),
                Err(_) => continue,
            };
            debug!("Checking section: {}", section_url);

            match self.fetcher.fetch_text(&section_url).await {
                Ok(html) => {
                    for link in anchor_links(&html, seed, profile, SECTION_ANCHOR_LIMIT) {
                        if links.len() >= max_links {
                            break;
                        }
                        if seen.insert(link.clone()) {
                            links.push(link);
                        }
                    }
                }
                Err(e) => {
                    warn!("Error checking section {}: {}", section_url, e);
                }
            }

            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// HTML pattern strategy: anchors on the page whose raw href the profile
/// accepts, resolved against the seed and restricted to the seed's domain
fn anchor_links(html: &str, seed: &Url, profile: &SiteProfile, max_links: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");
    let domain = seed.host_str().unwrap_or_default();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for elem in document.select(&selector) {
        if links.len() >= max_links {
            break;
        }
        let href = match elem.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        if !profile.accepts(href) {
            continue;
        }
        if let Some(full_url) = normalize_href(href, seed, domain) {
            if seen.insert(full_url.clone()) {
                links.push(full_url);
            }
        }
    }

    links
}

/// Resolve a relative href against the seed and reject URLs outside the
/// seed's domain (leading `www.` ignored)
fn normalize_href(href: &str, seed: &Url, domain: &str) -> Option<String> {
    let resolved = if href.starts_with('/') {
        seed.join(href).ok()?.to_string()
    } else {
        href.to_string()
    };

    let bare_domain = domain.trim_start_matches("www.");
    if resolved.contains(bare_domain) {
        Some(resolved)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::fetch::Fetcher;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_profile() -> SiteProfile {
        SiteProfile {
            path_contains: vec!["/politics/".to_string()],
            exclude_patterns: vec!["video".to_string()],
            min_path_depth: 2,
            section_paths: vec!["/politics".to_string()],
            ..Default::default()
        }
    }

    fn test_fetcher() -> Fetcher {
        let mut config = CrawlConfig::default();
        config.respect_robots_txt = false;
        config.rate_limit_rps = 1000;
        config.timeout_secs = 5;
        Fetcher::new(&config).unwrap()
    }

    #[test]
    fn test_anchor_links_applies_profile_and_domain() {
        let seed = Url::parse("https://example.com").unwrap();
        let html = r#"
        <html><body>
            <a href="/politics/2025/story-one">one</a>
            <a href="/politics/video/clip">excluded</a>
            <a href="/sports/2025/game">wrong section</a>
            <a href="https://elsewhere.com/politics/2025/foreign">foreign</a>
            <a href="/politics/2025/story-one">duplicate</a>
        </body></html>
        "#;

        let links = anchor_links(html, &seed, &test_profile(), 100);
        assert_eq!(links, vec!["https://example.com/politics/2025/story-one"]);
    }

    #[test]
    fn test_normalize_href_ignores_www_prefix() {
        let seed = Url::parse("https://www.example.com").unwrap();
        assert!(normalize_href("/politics/a/b", &seed, "www.example.com").is_some());
        assert!(normalize_href("https://example.com/politics/a", &seed, "www.example.com").is_some());
        assert!(normalize_href("https://other.com/politics/a", &seed, "www.example.com").is_none());
    }

    #[tokio::test]
    async fn test_feed_short_circuits_html_parsing() {
        let server = MockServer::start().await;
        let uri = server.uri();

        let seed_html = format!(
            r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="{uri}/feed.xml">
            </head><body>
            <a href="/politics/2025/from-html">html link</a>
            </body></html>"#
        );
        let feed_xml = format!(
            "<rss><channel>\
             <item><link>{uri}/politics/2025/from-feed</link></item>\
             </channel></rss>"
        );

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(seed_html))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml))
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let discovery = LinkDiscovery::new(&fetcher);
        let links = discovery.discover(&uri, &test_profile(), 10, 0, 3).await;

        assert_eq!(links.len(), 1);
        assert!(links[0].ends_with("/politics/2025/from-feed"));
    }

    #[tokio::test]
    async fn test_broken_feed_falls_back_to_anchors() {
        let server = MockServer::start().await;
        let uri = server.uri();

        let seed_html = format!(
            r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="{uri}/feed.xml">
            </head><body>
            <a href="/politics/2025/from-html">html link</a>
            </body></html>"#
        );

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(seed_html))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let discovery = LinkDiscovery::new(&fetcher);
        let links = discovery.discover(&uri, &test_profile(), 10, 0, 3).await;

        assert_eq!(links.len(), 1);
        assert!(links[0].ends_with("/politics/2025/from-html"));
    }

    #[tokio::test]
    async fn test_section_expansion_below_quota_floor() {
        let server = MockServer::start().await;
        let uri = server.uri();

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/politics/2025/seed-story">s</a></body></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/politics"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                <a href="/politics/2025/seed-story">dup</a>
                <a href="/politics/2025/section-story">new</a>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let discovery = LinkDiscovery::new(&fetcher);
        let links = discovery.discover(&uri, &test_profile(), 10, 5, 3).await;

        assert_eq!(links.len(), 2);
        assert!(links[1].ends_with("/politics/2025/section-story"));
    }

    #[tokio::test]
    async fn test_unreachable_seed_yields_empty() {
        let fetcher = test_fetcher();
        let discovery = LinkDiscovery::new(&fetcher);
        let links = discovery
            .discover("http://127.0.0.1:1/", &test_profile(), 10, 0, 3)
            .await;
        assert!(links.is_empty());
    }
}
