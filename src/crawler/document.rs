//! HTML document model handed from the fetcher to the engine
//!
//! Parsing happens once, up front; a `Document` only holds owned strings so
//! it can cross threads freely.

use scraper::{Html, Selector};
use url::Url;

/// A fetched and parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    location: Url,
    title: String,
    html: String,
    hrefs: Vec<String>,
}

impl Document {
    /// Parses HTML content fetched from `location`
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `href` of every `<a href="...">`, resolved against `location`
    ///
    /// **Exclude:**
    /// - `javascript:`, `mailto:`, `tel:` links
    /// - Data URIs
    /// - Fragment-only links (same page anchors)
    ///
    /// An href that cannot be resolved is kept as written, so the caller can
    /// report it as malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_crawl::Document;
    /// use url::Url;
    ///
    /// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
    /// let doc = Document::parse(html, Url::parse("https://example.com/").unwrap());
    /// assert_eq!(doc.title(), "Test");
    /// assert_eq!(doc.anchor_hrefs(), &["https://example.com/page".to_string()]);
    /// ```
    pub fn parse(html: &str, location: Url) -> Self {
        let document = Html::parse_document(html);

        let title = extract_title(&document);
        let hrefs = extract_anchor_hrefs(&document, &location);

        Self {
            location,
            title,
            html: document.html(),
            hrefs,
        }
    }

    /// Builds a document from already extracted parts
    pub fn from_parts(location: Url, title: &str, html: &str, hrefs: Vec<String>) -> Self {
        Self {
            location,
            title: title.to_string(),
            html: html.to_string(),
            hrefs,
        }
    }

    /// The URL the document was fetched from
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Text of the `<title>` element, empty when the page has none
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Serialized HTML of the whole document
    pub fn outer_html(&self) -> &str {
        &self.html
    }

    /// Absolute hrefs of all anchor elements, in document order
    pub fn anchor_hrefs(&self) -> &[String] {
        &self.hrefs
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts the href of every anchor element
fn extract_anchor_hrefs(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, base_url))
        .collect()
}

/// Resolves an href against the page URL
///
/// Returns None for links that are never followed. Hrefs the URL parser
/// rejects are returned unchanged.
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowercase = href.to_ascii_lowercase();
    if lowercase.starts_with("javascript:")
        || lowercase.starts_with("mailto:")
        || lowercase.starts_with("tel:")
        || lowercase.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(_) => Some(href.to_string()),
    }
}
