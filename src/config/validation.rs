use crate::config::types::{CrawlerEntry, DefaultsConfig, FileConfig};
use crate::filter::TypeGroup;
use crate::url::extract_host;
use crate::ConfigError;
use std::collections::BTreeSet;
use url::Url;

/// Validates the entire configuration file
pub fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    validate_defaults(&config.defaults)?;

    if config.crawlers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[crawler]] entry is required".to_string(),
        ));
    }

    for entry in &config.crawlers {
        validate_crawler_entry(entry)?;
    }

    Ok(())
}

/// Checks that seed URLs exist and share one host, returning that host
///
/// A URL without a host counts as its own distinct host.
pub fn validate_seed_hosts(urls: &[Url]) -> Result<String, ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::NoInitialUrls);
    }

    let hosts: BTreeSet<String> = urls
        .iter()
        .map(|url| extract_host(url).unwrap_or_else(|| url.to_string()))
        .collect();

    let mut iter = hosts.into_iter();
    match (iter.next(), iter.next()) {
        (Some(host), None) => Ok(host),
        (Some(first), Some(second)) => {
            let mut distinct = vec![first, second];
            distinct.extend(iter);
            Err(ConfigError::DistinctHosts(distinct))
        }
        (None, _) => Err(ConfigError::NoInitialUrls),
    }
}

/// Parses a URL and requires an HTTP(S) scheme with a host
pub fn parse_http_url(url_str: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(url_str)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' must use HTTP or HTTPS scheme",
            url_str
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' has no host",
            url_str
        )));
    }

    Ok(url)
}

fn validate_defaults(defaults: &DefaultsConfig) -> Result<(), ConfigError> {
    validate_user_agent(&defaults.user_agent)
}

/// Validates one `[[crawler]]` entry
fn validate_crawler_entry(entry: &CrawlerEntry) -> Result<(), ConfigError> {
    if entry.seeds.is_empty() {
        return Err(ConfigError::Validation(format!(
            "crawler '{}' must have at least one seed URL",
            entry.label()
        )));
    }

    let seeds = entry
        .seeds
        .iter()
        .map(|s| parse_http_url(s))
        .collect::<Result<Vec<_>, _>>()?;
    validate_seed_hosts(&seeds)?;

    for skip in &entry.skip {
        parse_http_url(skip)?;
    }

    for name in &entry.excluded_types {
        TypeGroup::from_name(name)?;
    }

    if let Some(user_agent) = &entry.user_agent {
        validate_user_agent(user_agent)?;
    }

    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}
