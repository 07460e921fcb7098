//! Content aggregation: landing page plus classified links, one document.

use tracing::{info, instrument, warn};

use brochurebuilder_chat::ChatClient;
use brochurebuilder_scrape::PageFetcher;
use brochurebuilder_shared::Result;

use crate::classify::classify;

/// Fetch the landing page and every classified link, concatenating their
/// contents under labeled headings.
///
/// Links are visited one at a time, in classifier order. A link whose URL
/// does not start with an http/https scheme is skipped and logged; the
/// scheme prefix is the only resolvability check performed. The result is
/// unbounded — truncation is the caller's responsibility.
#[instrument(skip_all, fields(url = %url))]
pub async fn aggregate(fetcher: &PageFetcher, chat: &ChatClient, url: &str) -> Result<String> {
    let landing = fetcher.fetch(url).await;

    let mut result = String::from("Landing page:\n");
    result.push_str(&landing.contents());

    let selection = classify(chat, &landing).await?;
    info!(links = selection.links.len(), "classifier selected links");

    for link in &selection.links {
        if !link.url.starts_with("http://") && !link.url.starts_with("https://") {
            warn!(url = %link.url, kind = %link.kind, "skipping non-HTTP link");
            continue;
        }

        let page = fetcher.fetch(&link.url).await;
        result.push_str(&format!("\n\n{}\n", link.kind));
        result.push_str(&page.contents());
    }

    Ok(result)
}
