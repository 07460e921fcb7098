//! Shared error model and configuration for brochurebuilder.
//!
//! This crate is the foundation depended on by all other brochurebuilder
//! crates. It provides:
//! - [`BrochureError`] — the unified error type
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BrochureConfig, ChatConfig, FetchConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{BrochureError, Result};
