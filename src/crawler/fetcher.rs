//! Page fetch capability
//!
//! The engine only sees the `PageFetcher` trait. `HttpFetcher` is the real
//! implementation:
//! - GET request carrying the crawler's user agent
//! - Redirects followed by the client (final URL is the document location)
//! - Non-2xx status and non-HTML content are failures
//! - The body is parsed into a `Document` before returning

use crate::crawler::document::Document;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches a page and hands it back parsed
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url, user_agent: &str) -> FetchResult<Document>;
}

/// Builds the HTTP client shared by all crawlers of a process
///
/// No default user agent is set; every request carries its crawler's own.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` over a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default client settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_crawl::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new().unwrap();
    /// ```
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, user_agent: &str) -> FetchResult<Document> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::Unavailable {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(Document::parse(&body, final_url))
    }
}

/// True for `text/html` and `application/xhtml+xml`, parameters ignored
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "TestCrawler/1.0";

    fn html_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("TEXT/HTML"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/json"));
        assert!(!is_html("text/plain"));
        assert!(!is_html(""));
    }

    #[tokio::test]
    async fn test_fetch_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", UA))
            .respond_with(html_response(
                r#"<html><head><title>Home</title></head><body><a href="/a">A</a></body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let doc = fetcher.fetch(&url, UA).await.unwrap();

        assert_eq!(doc.title(), "Home");
        assert_eq!(doc.anchor_hrefs(), &[format!("{}/a", server.uri())]);
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        match fetcher.fetch(&url, UA).await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse(&format!("{}/data.json", server.uri())).unwrap();

        assert!(matches!(
            fetcher.fetch(&url, UA).await,
            Err(FetchError::ContentMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_unsupported_scheme() {
        let fetcher = HttpFetcher::new().unwrap();
        let url = Url::parse("ftp://example.com/file").unwrap();

        assert!(matches!(
            fetcher.fetch(&url, UA).await,
            Err(FetchError::Unavailable { .. })
        ));
    }
}
