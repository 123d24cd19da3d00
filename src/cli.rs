//! Command-line arguments.
//!
//! Kept out of `main.rs` so tests can build `Cli` values directly.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, validate_config, AppConfig, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "todo-proxy")]
#[command(about = "Traced HTTP proxy for a todo-list REST API", long_about = None)]
pub struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    pub bind: Option<String>,

    /// Override `upstream.base_url`.
    #[arg(long)]
    pub upstream_url: Option<String>,
}

impl Cli {
    /// Load the config file (if any), apply flag overrides, validate.
    pub fn resolve_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(url) = &self.upstream_url {
            config.upstream.base_url = url.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
