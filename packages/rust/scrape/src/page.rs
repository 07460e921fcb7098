//! The [`Page`] type and the fetcher that produces it.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use tracing::{debug, warn};

use brochurebuilder_shared::{BrochureError, FetchConfig, Result};

use crate::extract::{extract_links, extract_text, extract_title};

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("brochurebuilder/", env!("CARGO_PKG_VERSION"));

/// Sentinel title for pages that could not be fetched.
const FETCH_ERROR_TITLE: &str = "No title found (Error fetching page)";

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One scraped web page: title, visible text, and outbound links.
///
/// Immutable once constructed. Construction never fails — an unreachable
/// page degrades to a sentinel title with empty text and links.
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL this page was fetched from.
    pub url: String,
    /// The `<title>` text, or a sentinel when absent or unfetchable.
    pub title: String,
    /// Visible body text, noise elements removed, newline-joined.
    pub text: String,
    /// Raw `<a href>` values in document order, empties dropped.
    pub links: Vec<String>,
}

impl Page {
    /// Build a page from already-fetched HTML.
    pub fn from_html(url: &str, html: &str) -> Self {
        let doc = Html::parse_document(html);
        let page = Self {
            url: url.to_string(),
            title: extract_title(&doc),
            text: extract_text(&doc),
            links: extract_links(&doc),
        };
        debug!(url, title = %page.title, links = page.links.len(), "parsed page");
        page
    }

    /// The degraded page returned when a fetch fails.
    fn unreachable(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: FETCH_ERROR_TITLE.to_string(),
            text: String::new(),
            links: Vec::new(),
        }
    }

    /// Render this page's contents for aggregation.
    pub fn contents(&self) -> String {
        format!(
            "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
            self.title, self.text
        )
    }
}

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

/// Fetches pages over HTTP with a bounded timeout.
///
/// Each call performs a fresh network fetch — no caching, no retries,
/// default redirect handling.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Create a fetcher with the configured timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrochureError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch and parse one page.
    ///
    /// A network failure or non-2xx status is logged and yields the
    /// sentinel page — callers never see an error from this path.
    pub async fn fetch(&self, url: &str) -> Page {
        match self.try_fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url, error = %e, "page fetch failed, using empty page");
                Page::unreachable(url)
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BrochureError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrochureError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BrochureError::Network(format!("{url}: body read failed: {e}")))?;

        Ok(Page::from_html(url, &body))
    }
}
