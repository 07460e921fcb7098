//! brochurebuilder CLI — generate a company brochure from a website URL.
//!
//! Scrapes the landing page, asks a local chat model which links matter,
//! aggregates their contents, and streams a Markdown brochure to stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
