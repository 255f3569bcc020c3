//! `kb serve` command implementation.

use clap::Args;
use kb_config::CliSettings;
use kb_server::{run_server, server_config_from_config};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,

    /// Host to bind to (overrides config).
    #[arg(long, env = "KB_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "KB_PORT")]
    port: Option<u16>,

    /// Disable full-text search.
    #[arg(long)]
    no_search: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings {
            host: self.host,
            port: self.port,
            search_enabled: self.no_search.then_some(false),
            ..Default::default()
        })?;

        output.status(
            "Listening",
            format!("{}:{}", config.server.host, config.server.port),
        );
        output.status("Content", config.docs_resolved.root_dir.display());
        output.status("Mount path", &config.docs_resolved.mount_path);
        output.status(
            "Search",
            if config.search.enabled { "enabled" } else { "disabled" },
        );

        let server_config = server_config_from_config(&config)?;
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
