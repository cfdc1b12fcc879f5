//! robots.txt rules for outlet hosts
//!
//! The fetcher holds one [`RobotsRules`] per host for the life of a session.
//! A missing or unreachable robots.txt yields unrestricted rules; the
//! collector only ever narrows what it fetches, never widens it.

use robotstxt::DefaultMatcher;
use tracing::debug;

/// Crawl permissions for a single host
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt body; `None` means the host carries no restrictions
    rules: Option<String>,
}

impl RobotsRules {
    /// Build rules from a fetched robots.txt body. A blank body is treated
    /// as unrestricted.
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        Self {
            rules: (!trimmed.is_empty()).then(|| content.to_string()),
        }
    }

    /// Rules for a host without a usable robots.txt
    pub fn allow_all() -> Self {
        Self { rules: None }
    }

    /// Whether the collector may fetch this path as the given user agent
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let body = match &self.rules {
            Some(body) => body,
            None => return true,
        };

        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(body, user_agent, path);
        if !allowed {
            debug!("robots.txt disallows {} for {}", path, user_agent);
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let rules = RobotsRules::allow_all();
        assert!(rules.is_allowed("/anything", "newsharvest"));
    }

    #[test]
    fn test_blank_body_is_unrestricted() {
        let rules = RobotsRules::parse("   \n");
        assert!(rules.is_allowed("/news/page", "newsharvest"));
    }

    #[test]
    fn test_disallow_path() {
        let rules = RobotsRules::parse("User-agent: *\nDisallow: /private/\n");
        assert!(!rules.is_allowed("/private/page", "newsharvest"));
        assert!(rules.is_allowed("/news/page", "newsharvest"));
    }
}
