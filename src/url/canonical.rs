use crate::url::extract_host;
use crate::{UrlError, UrlResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// A URL used as a frontier and de-duplication key
///
/// Two canonical URLs are equal when their scheme, host and path are equal.
/// Query string and fragment are ignored, so `/p?x=1`, `/p?x=2` and `/p#top`
/// collapse into one frontier entry. The wrapped URL is kept as given and is
/// what gets fetched.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::CanonicalUrl;
///
/// let a = CanonicalUrl::parse("http://example.com/p?a=1").unwrap();
/// let b = CanonicalUrl::parse("http://example.com/p#frag").unwrap();
/// assert_eq!(a, b);
///
/// let c = CanonicalUrl::parse("https://example.com/p").unwrap();
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone)]
pub struct CanonicalUrl {
    raw: Url,
}

impl CanonicalUrl {
    /// Wraps an already parsed URL
    pub fn new(raw: Url) -> Self {
        Self { raw }
    }

    /// Parses a URL string into a canonical URL
    ///
    /// Only URLs with a host can be crawled, so hostless ones are rejected.
    pub fn parse(url_str: &str) -> UrlResult<Self> {
        let raw = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
        if raw.host_str().is_none() {
            return Err(UrlError::MissingHost(url_str.to_string()));
        }
        Ok(Self::new(raw))
    }

    /// The URL exactly as it was supplied
    pub fn as_url(&self) -> &Url {
        &self.raw
    }

    /// Consumes the canonical URL and returns the wrapped URL
    pub fn into_url(self) -> Url {
        self.raw
    }

    /// The lowercase host of the URL, if it has one
    pub fn host(&self) -> Option<String> {
        extract_host(&self.raw)
    }

    fn identity(&self) -> (&str, Option<&str>, &str) {
        (self.raw.scheme(), self.raw.host_str(), self.raw.path())
    }
}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for CanonicalUrl {}

impl Hash for CanonicalUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl From<Url> for CanonicalUrl {
    fn from(raw: Url) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
