//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod serve;

use std::path::PathBuf;

use clap::Args;
use kb_config::{CliSettings, Config};

pub(crate) use check::CheckArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Content layout options shared by all commands.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long, env = "KB_CONFIG")]
    config: Option<PathBuf>,

    /// Content root directory (overrides config).
    #[arg(short, long, env = "KB_DIR")]
    dir: Option<PathBuf>,

    /// Pages directory below the content root (overrides config).
    #[arg(long)]
    pages_dir: Option<String>,

    /// Assets directory below the content root (overrides config).
    #[arg(long)]
    assets_dir: Option<String>,

    /// URL prefix to serve the site under (overrides config).
    #[arg(long, env = "KB_MOUNT_PATH")]
    mount_path: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SiteArgs {
    /// Load the config with these arguments and `extra` applied on top.
    pub(crate) fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            root_dir: self.dir.clone(),
            pages_dir: self.pages_dir.clone(),
            assets_dir: self.assets_dir.clone(),
            mount_path: self.mount_path.clone(),
            ..extra
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config_path = ?config.config_path,
            root_dir = %config.docs_resolved.root_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
