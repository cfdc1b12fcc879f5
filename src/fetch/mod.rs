//! HTTP fetching with rate limiting and robots.txt support
//!
//! One [`Fetcher`] lives for the duration of a crawl session. Requests go
//! through a global requests-per-second limiter; the deliberate randomized
//! politeness delay between article fetches is the orchestrator's job and
//! sits on top of this ([`jitter_sleep`]).

mod robots;

pub use robots::*;

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use rand::Rng;
use reqwest::Client;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// HTTP fetcher shared across discovery and article retrieval
pub struct Fetcher {
    client: Client,
    user_agent: String,
    respect_robots: bool,
    limiter: DirectLimiter,
    robots_cache: Arc<RwLock<HashMap<String, RobotsRules>>>,
}

impl Fetcher {
    /// Create a new fetcher from crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Crawl(format!("Failed to create HTTP client: {}", e)))?;

        let rps = NonZeroU32::new(config.rate_limit_rps).unwrap_or(nonzero!(1u32));
        let limiter = RateLimiter::direct(Quota::per_second(rps));

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            respect_robots: config.respect_robots_txt,
            limiter,
            robots_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Fetch a URL and return its body as text. Non-2xx statuses are errors.
    /// Callers decide whether an error is fatal; in this pipeline it never
    /// is, since failed URLs are logged and skipped.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::Crawl(format!("URL has no host: {}", url)))?
            .to_string();

        if self.respect_robots {
            self.ensure_robots_loaded(&host, &parsed).await?;
            let cache = self.robots_cache.read().await;
            if let Some(rules) = cache.get(&host) {
                if !rules.is_allowed(parsed.path(), &self.user_agent) {
                    return Err(Error::RobotsDisallowed(url.to_string()));
                }
            }
        }

        self.limiter.until_ready().await;

        debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Crawl(format!("HTTP {}: {}", status, url)));
        }

        Ok(response.text().await?)
    }

    async fn ensure_robots_loaded(&self, host: &str, url: &Url) -> Result<()> {
        {
            let cache = self.robots_cache.read().await;
            if cache.contains_key(host) {
                return Ok(());
            }
        }

        let robots_url = format!("{}://{}/robots.txt", url.scheme(), host);
        debug!("Fetching robots.txt from {}", robots_url);

        let rules = match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => {
                let text = response.text().await.unwrap_or_default();
                RobotsRules::parse(&text)
            }
            // No robots.txt or error - allow all
            _ => RobotsRules::allow_all(),
        };

        let mut cache = self.robots_cache.write().await;
        cache.insert(host.to_string(), rules);
        Ok(())
    }
}

/// Sleep for a uniformly random duration within `[min_ms, max_ms]`.
/// This is deliberate politeness between requests, not a performance knob.
pub async fn jitter_sleep(min_ms: u64, max_ms: u64) {
    let upper = max_ms.max(min_ms);
    let wait_ms = rand::thread_rng().gen_range(min_ms..=upper);
    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
}
