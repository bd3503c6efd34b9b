use url::Url;

/// Extracts the host from a URL
///
/// This function retrieves the host portion of a URL (without the port) and
/// converts it to lowercase. URLs without a host, such as `mailto:` links,
/// return None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::extract_host;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host equals `host`
pub fn is_on_host(url: &Url, host: &str) -> bool {
    extract_host(url).is_some_and(|h| h == host)
}
