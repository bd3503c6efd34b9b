use crate::config::validation::validate_seed_hosts;
use crate::filter::TypeGroup;
use crate::ConfigResult;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// User agent sent when a configuration does not name one
pub const DEFAULT_USER_AGENT: &str = "ripple-crawl/1.0 (+https://github.com/ripple-crawl)";

/// Configuration of one crawler instance
///
/// Owned by its engine once registered. `initial_urls` must be non-empty and
/// share one host; this is checked when the engine is created.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Seed URLs, crawled first and in the given order
    pub initial_urls: Vec<Url>,

    /// URLs treated as already visited
    pub urls_to_skip: Vec<Url>,

    /// Content type groups whose links are never queued
    pub excluded_types: HashSet<TypeGroup>,

    /// User agent sent with every fetch
    pub user_agent: String,

    /// Minimum spacing between two fetches
    pub crawl_delay: Duration,
}

impl CrawlerConfig {
    /// Starts building a configuration
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_crawl::{CrawlerConfig, TypeGroup};
    /// use url::Url;
    ///
    /// let config = CrawlerConfig::builder()
    ///     .initial_url(Url::parse("https://example.com/").unwrap())
    ///     .exclude(TypeGroup::images())
    ///     .exclude(TypeGroup::archives())
    ///     .user_agent("docs-bot/0.1")
    ///     .build();
    ///
    /// assert_eq!(config.host().unwrap(), "example.com");
    /// ```
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::default()
    }

    /// The single host shared by all initial URLs
    ///
    /// Fails if there are no initial URLs or if they span more than one host.
    pub fn host(&self) -> ConfigResult<String> {
        validate_seed_hosts(&self.initial_urls)
    }
}

/// Builder for [`CrawlerConfig`]
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    initial_urls: Vec<Url>,
    urls_to_skip: Vec<Url>,
    excluded_types: HashSet<TypeGroup>,
    user_agent: Option<String>,
    crawl_delay: Duration,
}

impl CrawlerConfigBuilder {
    pub fn initial_url(mut self, url: Url) -> Self {
        if !self.initial_urls.contains(&url) {
            self.initial_urls.push(url);
        }
        self
    }

    pub fn initial_urls<I: IntoIterator<Item = Url>>(self, urls: I) -> Self {
        urls.into_iter().fold(self, Self::initial_url)
    }

    pub fn skip_url(mut self, url: Url) -> Self {
        if !self.urls_to_skip.contains(&url) {
            self.urls_to_skip.push(url);
        }
        self
    }

    pub fn skip_urls<I: IntoIterator<Item = Url>>(self, urls: I) -> Self {
        urls.into_iter().fold(self, Self::skip_url)
    }

    pub fn exclude(mut self, group: TypeGroup) -> Self {
        self.excluded_types.insert(group);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn crawl_delay(mut self, delay: Duration) -> Self {
        self.crawl_delay = delay;
        self
    }

    pub fn build(self) -> CrawlerConfig {
        CrawlerConfig {
            initial_urls: self.initial_urls,
            urls_to_skip: self.urls_to_skip,
            excluded_types: self.excluded_types,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            crawl_delay: self.crawl_delay,
        }
    }
}

/// Top-level structure of a TOML configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default, rename = "crawler")]
    pub crawlers: Vec<CrawlerEntry>,
}

/// Values applied to every crawler entry that does not override them
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// User agent sent with every fetch
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum time between fetches (milliseconds)
    #[serde(rename = "crawl-delay-ms", default)]
    pub crawl_delay_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            crawl_delay_ms: 0,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// One `[[crawler]]` table
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerEntry {
    /// Optional label used in logs
    #[serde(default)]
    pub name: Option<String>,

    /// Seed URLs, all on one host
    pub seeds: Vec<String>,

    /// URLs that should be treated as already visited
    #[serde(default)]
    pub skip: Vec<String>,

    /// Names of excluded content type groups (e.g. "images", "pdf")
    #[serde(rename = "excluded-types", default)]
    pub excluded_types: Vec<String>,

    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    #[serde(rename = "crawl-delay-ms", default)]
    pub crawl_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Converts every `[[crawler]]` entry into a [`CrawlerConfig`]
    pub fn crawler_configs(&self) -> ConfigResult<Vec<CrawlerConfig>> {
        self.crawlers
            .iter()
            .map(|entry| entry.to_crawler_config(&self.defaults))
            .collect()
    }
}

impl CrawlerEntry {
    /// Label for logs: the entry name, or its first seed
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.seeds.first().map(String::as_str))
            .unwrap_or("<unnamed>")
    }

    /// Builds the engine configuration for this entry
    pub fn to_crawler_config(&self, defaults: &DefaultsConfig) -> ConfigResult<CrawlerConfig> {
        use crate::config::validation::parse_http_url;

        let seeds = self
            .seeds
            .iter()
            .map(|s| parse_http_url(s))
            .collect::<ConfigResult<Vec<_>>>()?;
        let skip = self
            .skip
            .iter()
            .map(|s| parse_http_url(s))
            .collect::<ConfigResult<Vec<_>>>()?;

        let mut builder = CrawlerConfig::builder()
            .initial_urls(seeds)
            .skip_urls(skip)
            .user_agent(
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| defaults.user_agent.clone()),
            )
            .crawl_delay(Duration::from_millis(
                self.crawl_delay_ms.unwrap_or(defaults.crawl_delay_ms),
            ));

        for name in &self.excluded_types {
            builder = builder.exclude(TypeGroup::from_name(name)?);
        }

        Ok(builder.build())
    }
}
