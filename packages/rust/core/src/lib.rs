//! The brochure pipeline: link classification, content aggregation,
//! and streamed brochure generation.
//!
//! Control flow is a strict linear chain — [`brochure::generate`] calls
//! [`aggregate::aggregate`], which calls [`classify::classify`] and the
//! page fetcher. Every step is stateless request/response.

pub mod aggregate;
pub mod brochure;
pub mod classify;

pub use aggregate::aggregate;
pub use brochure::{Tone, generate};
pub use classify::{ClassifiedLink, LinkSelection, classify};
