//! Application configuration for brochurebuilder.
//!
//! User config lives at `~/.brochurebuilder/brochurebuilder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BrochureError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "brochurebuilder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".brochurebuilder";

// ---------------------------------------------------------------------------
// Config structs (matching brochurebuilder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat endpoint settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Page fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Brochure generation settings.
    #[serde(default)]
    pub brochure: BrochureConfig,
}

/// `[chat]` section — the locally hosted chat-completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Chat-completion endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/chat".into()
}
fn default_model() -> String {
    "llama3.2".into()
}

/// `[fetch]` section — page fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// HTTP timeout for page fetches, in seconds. Chat calls carry no
    /// timeout; only page fetches are bounded.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// `[brochure]` section — generation budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrochureConfig {
    /// Maximum characters of aggregated site content handed to the model.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for BrochureConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    20_000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.brochurebuilder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BrochureError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.brochurebuilder/brochurebuilder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BrochureError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BrochureError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BrochureError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BrochureError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BrochureError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("endpoint"));
        assert!(toml_str.contains("11434"));
        assert!(toml_str.contains("max_chars"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.chat.endpoint, "http://localhost:11434/api/chat");
        assert_eq!(parsed.chat.model, "llama3.2");
        assert_eq!(parsed.fetch.timeout_secs, 10);
        assert_eq!(parsed.brochure.max_chars, 20_000);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[chat]
model = "mistral"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.chat.model, "mistral");
        // Unspecified fields fall back to defaults
        assert_eq!(config.chat.endpoint, "http://localhost:11434/api/chat");
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty");
        assert_eq!(config.brochure.max_chars, 20_000);
        assert_eq!(config.fetch.timeout_secs, 10);
    }
}
