//! Page fetching and HTML content extraction for brochurebuilder.
//!
//! A [`PageFetcher`] turns a URL into a [`Page`] — title, visible body
//! text, and the raw outbound links, in document order. Fetch failures
//! never surface as errors: the result degrades to a sentinel page and
//! the pipeline keeps going.

mod extract;
mod page;

pub use page::{Page, PageFetcher};
