//! Streamed brochure generation from aggregated site content.

use tracing::{debug, instrument};

use brochurebuilder_chat::{ChatClient, ChunkSink, Message};
use brochurebuilder_scrape::PageFetcher;
use brochurebuilder_shared::Result;

use crate::aggregate::aggregate;

/// System instruction for the default, professional brochure.
pub const BROCHURE_SYSTEM_PROMPT: &str = "You are a professional marketing assistant tasked \
with creating a short, polished brochure for a company. Analyze the provided website content \
and generate a brochure in Markdown format. The brochure should include key sections such as \
'About Us,' 'Our Mission,' 'Careers,' 'Research,' 'Contact Information,' and other relevant \
details that appeal to customers, investors, and recruits. Do not include technical issues, \
support content, or unrelated status updates. Use concise and professional language, and \
format the brochure with Markdown syntax (e.g., headings, bullet points, and links).";

/// Alternate system instruction for a joking, entertaining brochure.
pub const HUMOROUS_SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of \
several relevant pages from a company website and creates a short humorous, entertaining, \
jokey brochure about the company for prospective customers, investors and recruits. Respond \
in markdown. Include details of company culture, customers and careers/jobs if you have the \
information.";

/// Brochure voice, selecting which system instruction is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Professional,
    Humorous,
}

impl Tone {
    fn system_prompt(self) -> &'static str {
        match self {
            Self::Professional => BROCHURE_SYSTEM_PROMPT,
            Self::Humorous => HUMOROUS_SYSTEM_PROMPT,
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// User instruction embedding the company name and aggregated content,
/// truncated to `max_chars` characters. Hard cutoff — not word-aware.
fn brochure_user_prompt(company_name: &str, details: &str, max_chars: usize) -> String {
    let mut prompt = format!("You are creating a brochure for the company: {company_name}.\n");
    prompt.push_str(
        "Below is the content extracted from the company's website, organized by relevant \
         sections. Use this content to generate a Markdown brochure with headings and links, \
         focusing on key sections:\n\n",
    );
    prompt.push_str(details);
    prompt.push_str(
        "\n\nEnsure that the brochure includes only relevant sections such as 'About Us,' \
         'Our Mission,' 'Careers,' 'Research,' and 'Contact Information.' Exclude technical \
         issues, support, and status updates.",
    );
    truncate_chars(&prompt, max_chars)
}

/// Truncate to at most `max_chars` characters, respecting UTF-8 boundaries.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a brochure for `company_name` from `url`, streaming chunks
/// into `sink` as they arrive and returning the accumulated text.
///
/// The sequence of chunks is finite and not restartable; it ends when the
/// model's stream ends.
#[instrument(skip_all, fields(company = company_name, url = %url))]
pub async fn generate(
    fetcher: &PageFetcher,
    chat: &ChatClient,
    company_name: &str,
    url: &str,
    tone: Tone,
    max_chars: usize,
    sink: &mut dyn ChunkSink,
) -> Result<String> {
    let details = aggregate(fetcher, chat, url).await?;
    debug!(chars = details.len(), "aggregated site content");

    let messages = [
        Message::system(tone.system_prompt()),
        Message::user(brochure_user_prompt(company_name, &details, max_chars)),
    ];

    chat.chat_stream(&messages, sink).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
