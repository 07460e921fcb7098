//! Model-driven link selection.
//!
//! The classifier hands a page's raw link list to the model and asks for
//! the brochure-relevant subset as JSON. Model output is unconstrained in
//! practice, so parsing is two-stage: a strict parse of the reply, then a
//! bounded fallback that extracts the first brace-delimited region. If
//! both fail the error propagates — unlike fetch failures, a reply we
//! cannot interpret aborts the run.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use brochurebuilder_chat::{ChatClient, Message};
use brochurebuilder_scrape::Page;
use brochurebuilder_shared::{BrochureError, Result};

/// System instruction for the link-selection call.
pub const LINK_SYSTEM_PROMPT: &str = "\
You are provided with a list of links found on a webpage. You are able to decide \
which of the links would be most relevant to include in a brochure about the company, \
such as links to an About page, or a Company page, or Careers/Jobs pages, and more.
You should respond in JSON as in this example:
{
    \"links\": [
        {\"type\": \"about page\", \"url\": \"https://full.url/goes/here/about\"},
        {\"type\": \"careers page\", \"url\": \"https://another.full.url/careers\"}
    ]
}";

// ---------------------------------------------------------------------------
// Selection types
// ---------------------------------------------------------------------------

/// One model-selected link. The URL is taken as the model returned it —
/// nothing checks it is well-formed or reachable here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifiedLink {
    /// Category label, e.g. "about page" or "careers page".
    #[serde(rename = "type")]
    pub kind: String,
    /// Target URL as returned by the model.
    pub url: String,
}

/// The `{"links": [...]}` payload the model is instructed to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkSelection {
    pub links: Vec<ClassifiedLink>,
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// User instruction embedding the page URL and its raw hrefs.
fn links_user_prompt(page: &Page) -> String {
    format!(
        "Here is the list of links on the website of {} - please decide which of these are \
         relevant web links for a brochure about the company, respond with the full https URL \
         in JSON format. Do not include Terms of Service, Privacy, email links.\n\
         Links (some might be relative links):\n{}",
        page.url,
        page.links.join("\n")
    )
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// First `{` through last `}`, across newlines.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Interpret a model reply as a [`LinkSelection`].
///
/// Strict parse first; on failure, extract the first brace-delimited
/// region and parse that. No further recovery is attempted.
pub fn parse_link_selection(content: &str) -> Result<LinkSelection> {
    if let Ok(selection) = serde_json::from_str::<LinkSelection>(content) {
        return Ok(selection);
    }

    let candidate = JSON_OBJECT_RE
        .find(content)
        .ok_or_else(|| BrochureError::parse("no JSON object found in link reply"))?;

    serde_json::from_str(candidate.as_str().trim())
        .map_err(|e| BrochureError::parse(format!("link reply not in expected shape: {e}")))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Ask the model which of `page`'s links belong in the brochure.
///
/// Single attempt, non-streamed; parse failures propagate to the caller.
pub async fn classify(chat: &ChatClient, page: &Page) -> Result<LinkSelection> {
    let messages = [
        Message::system(LINK_SYSTEM_PROMPT),
        Message::user(links_user_prompt(page)),
    ];

    let content = chat.chat(&messages).await?;
    debug!(chars = content.len(), "link selection reply received");

    let selection = parse_link_selection(&content)?;
    debug!(links = selection.links.len(), "links classified");
    Ok(selection)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
