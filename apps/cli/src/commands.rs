//! CLI command definitions, routing, and tracing setup.

use std::io::Write as _;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use url::Url;

use brochurebuilder_chat::{ChatClient, ChunkSink};
use brochurebuilder_core::Tone;
use brochurebuilder_scrape::PageFetcher;
use brochurebuilder_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// brochurebuilder — turn a company website into a Markdown brochure.
#[derive(Parser)]
#[command(
    name = "brochurebuilder",
    version,
    about = "Generate a streamed Markdown brochure for a company from its website.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a brochure for one company website.
    Generate {
        /// Landing page URL to scrape.
        url: String,

        /// Company name (defaults to the URL hostname).
        #[arg(short, long)]
        company: Option<String>,

        /// Brochure voice.
        #[arg(short, long, default_value = "professional")]
        tone: ToneArg,

        /// Override the configured model identifier.
        #[arg(long)]
        model: Option<String>,

        /// Override the configured chat endpoint URL.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Brochure voice flag.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ToneArg {
    Professional,
    Humorous,
}

impl From<ToneArg> for Tone {
    fn from(tone: ToneArg) -> Self {
        match tone {
            ToneArg::Professional => Tone::Professional,
            ToneArg::Humorous => Tone::Humorous,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Diagnostics go to stdout, interleaved with streamed brochure text.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "brochurebuilder=info",
        1 => "brochurebuilder=debug",
        _ => "brochurebuilder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            url,
            company,
            tone,
            model,
            endpoint,
        } => {
            cmd_generate(
                &url,
                company.as_deref(),
                tone,
                model.as_deref(),
                endpoint.as_deref(),
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

/// Sink that writes each brochure chunk to stdout as it arrives.
struct StdoutSink;

impl ChunkSink for StdoutSink {
    fn emit(&mut self, chunk: &str) {
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    }
}

async fn cmd_generate(
    url: &str,
    company: Option<&str>,
    tone: ToneArg,
    model: Option<&str>,
    endpoint: Option<&str>,
) -> Result<()> {
    let mut config = load_config()?;

    // CLI flags override config file values.
    if let Some(model) = model {
        config.chat.model = model.to_string();
    }
    if let Some(endpoint) = endpoint {
        config.chat.endpoint = endpoint.to_string();
    }

    let parsed_url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;

    // Derive company name from hostname if not provided.
    let company_name = company
        .map(String::from)
        .unwrap_or_else(|| parsed_url.host_str().unwrap_or("unknown").to_string());

    info!(
        url,
        company = %company_name,
        model = %config.chat.model,
        endpoint = %config.chat.endpoint,
        "generating brochure"
    );

    let fetcher = PageFetcher::new(&config.fetch)?;
    let chat = ChatClient::new(&config.chat);

    let mut sink = StdoutSink;
    brochurebuilder_core::generate(
        &fetcher,
        &chat,
        &company_name,
        url,
        tone.into(),
        config.brochure.max_chars,
        &mut sink,
    )
    .await?;

    // The stream carries no trailing newline of its own.
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
