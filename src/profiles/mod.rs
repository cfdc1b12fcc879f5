//! Per-outlet site profiles
//!
//! A [`SiteProfile`] is pure data: which hrefs on an outlet's pages count as
//! article links, which container holds the article body, and which section
//! pages are worth a secondary look when discovery comes up short. The
//! [`ProfileRegistry`] resolves a domain to its profile and falls back to a
//! generic profile for unknown sites, so the acceptance and extraction logic
//! stays uniform instead of branching per outlet.

/// Link-acceptance and extraction rules for one domain
#[derive(Debug, Clone, Default)]
pub struct SiteProfile {
    /// Domain match key; a profile applies when this is a substring of the
    /// target domain
    pub domain: String,

    /// Accept only hrefs starting with one of these path prefixes (if any)
    pub path_starts: Vec<String>,

    /// Accept only hrefs containing one of these substrings (if any)
    pub path_contains: Vec<String>,

    /// Reject any href containing one of these, regardless of other rules
    pub exclude_patterns: Vec<String>,

    /// Minimum number of `/` characters in the href
    pub min_path_depth: usize,

    /// Minimum length of the final path segment, when set
    pub min_slug_len: Option<usize>,

    /// Reject hrefs ending in `/` (section indexes, not articles)
    pub reject_trailing_slash: bool,

    /// Body container CSS selectors, tried in order (primary then fallback)
    pub container_selectors: Vec<String>,

    /// Section paths probed when discovery falls below quota
    pub section_paths: Vec<String>,
}

impl SiteProfile {
    /// Check whether an href satisfies every configured predicate.
    /// Exclusion patterns take precedence over everything else.
    pub fn accepts(&self, href: &str) -> bool {
        let href_lower = href.to_lowercase();

        if self
            .exclude_patterns
            .iter()
            .any(|pat| href_lower.contains(pat.as_str()))
        {
            return false;
        }

        if !self.path_starts.is_empty()
            && !self.path_starts.iter().any(|p| href.starts_with(p.as_str()))
        {
            return false;
        }

        if !self.path_contains.is_empty()
            && !self.path_contains.iter().any(|p| href.contains(p.as_str()))
        {
            return false;
        }

        if href.matches('/').count() < self.min_path_depth {
            return false;
        }

        if self.reject_trailing_slash && href.ends_with('/') {
            return false;
        }

        if let Some(min_len) = self.min_slug_len {
            let slug = href.trim_end_matches('/').rsplit('/').next().unwrap_or("");
            if slug.len() < min_len {
                return false;
            }
        }

        true
    }
}

/// Registry of site profiles with a generic fallback
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<SiteProfile>,
    generic: SiteProfile,
}

impl ProfileRegistry {
    /// Build the registry for the ten outlets the collector ships with
    pub fn builtin() -> Self {
        Self {
            profiles: builtin_profiles(),
            generic: generic_profile(),
        }
    }

    /// Resolve the profile for a domain: first registered profile whose
    /// domain key is a substring of the target, otherwise the generic profile
    pub fn resolve(&self, domain: &str) -> &SiteProfile {
        self.profiles
            .iter()
            .find(|p| domain.contains(p.domain.as_str()))
            .unwrap_or(&self.generic)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fallback rules for domains without a registered profile
fn generic_profile() -> SiteProfile {
    SiteProfile {
        domain: String::new(),
        path_contains: strings(&["/2024/", "/2025/", "/news/", "/article/"]),
        exclude_patterns: strings(&["video", "live", "gallery", "photo"]),
        min_path_depth: 1,
        ..Default::default()
    }
}

fn builtin_profiles() -> Vec<SiteProfile> {
    vec![
        SiteProfile {
            domain: "cnn.com".to_string(),
            path_contains: strings(&[
                "/2024/", "/2025/", "/politics/", "/us/", "/world/", "/business/",
            ]),
            exclude_patterns: strings(&["video", "live", "gallery", "photos"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                "div.article__content",
                r#"div[data-module="ArticleBody"]"#,
            ]),
            section_paths: strings(&["/politics", "/us", "/world", "/business", "/tech"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "cbsnews.com".to_string(),
            path_starts: strings(&[
                "/news/",
                "/politics/",
                "/world/",
                "/health/",
                "/sports/",
                "/entertainment/",
                "/moneywatch/",
            ]),
            exclude_patterns: strings(&["video", "live", "playlist", "gallery", "photo"]),
            min_path_depth: 2,
            container_selectors: strings(&["section.content__body", "div.content__body"]),
            section_paths: strings(&[
                "/news/",
                "/politics/",
                "/world/",
                "/health/",
                "/moneywatch/",
            ]),
            ..Default::default()
        },
        SiteProfile {
            domain: "foxnews.com".to_string(),
            path_contains: strings(&["/politics/", "/us/", "/world/", "/opinion/", "/category/"]),
            exclude_patterns: strings(&["video", "live"]),
            min_path_depth: 3,
            container_selectors: strings(&["div.article-body", "div.content"]),
            section_paths: strings(&["/politics", "/us", "/world", "/opinion"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "reuters.com".to_string(),
            path_contains: strings(&[
                "/world/",
                "/politics/",
                "/business/",
                "/technology/",
                "/markets/",
            ]),
            exclude_patterns: strings(&["video", "graphics", "picture"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                r#"div[data-module="ArticleBody"]"#,
                "div.StandardArticleBody_body",
            ]),
            section_paths: strings(&["/world/", "/politics/", "/business/", "/technology/"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "apnews.com".to_string(),
            path_starts: strings(&[
                "/article/",
                "/politics/",
                "/business/",
                "/technology/",
                "/health/",
            ]),
            exclude_patterns: strings(&["video", "photo", "gallery"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                "div.RichTextStoryBody",
                r#"div[data-key="article"]"#,
            ]),
            section_paths: strings(&["/politics/", "/business/", "/technology/", "/health/"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "bbc.com".to_string(),
            path_contains: strings(&[
                "/news/",
                "/world/",
                "/politics/",
                "/business/",
                "/technology/",
            ]),
            exclude_patterns: strings(&["video", "live", "iplayer", "sounds"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                r#"div[data-component="text-block"]"#,
                "div.story-body",
            ]),
            section_paths: strings(&[
                "/news/world",
                "/news/politics",
                "/news/business",
                "/news/technology",
            ]),
            ..Default::default()
        },
        SiteProfile {
            domain: "theguardian.com".to_string(),
            path_contains: strings(&[
                "/world/",
                "/politics/",
                "/business/",
                "/technology/",
                "/us-news/",
                "/uk-news/",
            ]),
            exclude_patterns: strings(&["video", "live", "gallery", "audio"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                "div.content__article-body",
                r#"div[data-component="standfirst"]"#,
            ]),
            section_paths: strings(&["/world", "/politics", "/business", "/technology", "/us-news"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "npr.org".to_string(),
            path_contains: strings(&[
                "/2024/",
                "/2025/",
                "/politics/",
                "/world/",
                "/business/",
                "/technology/",
            ]),
            exclude_patterns: strings(&["audio", "podcasts", "music"]),
            min_path_depth: 2,
            container_selectors: strings(&["div.storytext", "div#storytext"]),
            section_paths: strings(&["/politics/", "/world/", "/business/", "/technology/"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "abcnews.go.com".to_string(),
            path_starts: strings(&[
                "/Politics/",
                "/US/",
                "/International/",
                "/Business/",
                "/Technology/",
            ]),
            exclude_patterns: strings(&["video", "live", "photo"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                "div.Article__Content",
                r#"div[data-module="ArticleBody"]"#,
            ]),
            section_paths: strings(&["/Politics", "/US", "/International", "/Business"]),
            ..Default::default()
        },
        SiteProfile {
            domain: "nbcnews.com".to_string(),
            path_contains: strings(&["/politics/", "/news/", "/world/", "/business/", "/tech/"]),
            exclude_patterns: strings(&["video", "live", "slideshow"]),
            min_path_depth: 2,
            container_selectors: strings(&[
                "div.ArticleBody",
                r#"div[data-module="ArticleBody"]"#,
            ]),
            section_paths: strings(&["/politics", "/news", "/world", "/business", "/tech"]),
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn politics_profile() -> SiteProfile {
        SiteProfile {
            path_contains: strings(&["/politics/"]),
            exclude_patterns: strings(&["video"]),
            min_path_depth: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_matching_href() {
        assert!(politics_profile().accepts("/politics/2025/story"));
    }

    #[test]
    fn test_exclusion_wins_over_other_predicates() {
        // satisfies contains + depth, but carries an excluded term
        assert!(!politics_profile().accepts("/politics/video/clip"));
    }

    #[test]
    fn test_rejects_shallow_path() {
        assert!(!politics_profile().accepts("/politics"));
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        assert!(!politics_profile().accepts("/politics/2025/VIDEO-recap"));
    }

    #[test]
    fn test_path_starts_predicate() {
        let profile = SiteProfile {
            path_starts: strings(&["/news/"]),
            min_path_depth: 2,
            ..Default::default()
        };
        assert!(profile.accepts("/news/local/story"));
        assert!(!profile.accepts("/opinion/news/story"));
    }

    #[test]
    fn test_slug_and_trailing_slash_rules() {
        let profile = SiteProfile {
            min_slug_len: Some(10),
            reject_trailing_slash: true,
            ..Default::default()
        };
        assert!(profile.accepts("/world/some-long-article-slug"));
        assert!(!profile.accepts("/world/short"));
        assert!(!profile.accepts("/world/some-long-article-slug/"));
    }

    #[test]
    fn test_resolve_known_domain() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.resolve("www.cnn.com");
        assert_eq!(profile.domain, "cnn.com");
    }

    #[test]
    fn test_resolve_unknown_domain_falls_back_to_generic() {
        let registry = ProfileRegistry::builtin();
        let profile = registry.resolve("example.org");
        assert!(profile.domain.is_empty());
        assert!(profile.accepts("/news/something"));
        assert!(!profile.accepts("/news/video-roundup"));
    }

    #[test]
    fn test_builtin_profiles_all_have_containers() {
        let registry = ProfileRegistry::builtin();
        for seed in ["cnn.com", "bbc.com", "npr.org", "nbcnews.com"] {
            assert!(
                !registry.resolve(seed).container_selectors.is_empty(),
                "{seed} profile missing container selectors"
            );
        }
    }
}
