//! Per-page-view context supplied by the host page

use url::Url;

use crate::error::Result;

/// The page a set of blocks is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    url: Url,
    referrer: String,
}

impl PageContext {
    /// Create a context from the page URL and the document referrer
    pub fn new(page_url: &str, referrer: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: Url::parse(page_url)?,
            referrer: referrer.into(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `document.referrer` equivalent; empty when there was none
    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    /// Scheme, host and port of the page, e.g. `https://forum.example.com`
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Resolve a link href against the page URL
    pub fn resolve(&self, href: &str) -> Result<Url> {
        Ok(self.url.join(href)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_drops_path() {
        let page = PageContext::new("https://forum.test:8443/t/topic/12?page=2", "").unwrap();
        assert_eq!(page.origin(), "https://forum.test:8443");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let page = PageContext::new("https://forum.test/t/topic/12", "").unwrap();
        assert_eq!(
            page.resolve("/latest?order=views").unwrap().as_str(),
            "https://forum.test/latest?order=views"
        );
        assert_eq!(
            page.resolve("https://x.test/a").unwrap().as_str(),
            "https://x.test/a"
        );
    }

    #[test]
    fn test_invalid_page_url() {
        assert!(PageContext::new("not a url", "").is_err());
    }
}
