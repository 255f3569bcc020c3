//! `kb check` command implementation.
//!
//! Loads the site like `serve` does and prints the menu tree.

use clap::Args;
use kb_config::CliSettings;
use kb_server::{load_site, server_config_from_config};
use kb_site::Children;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) site: SiteArgs,
}

impl CheckArgs {
    /// Execute the check command.
    pub(crate) fn execute(&self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings::default())?;
        let server_config = server_config_from_config(&config)?;
        let site = load_site(&server_config)?;

        output.status(
            "Pages",
            config
                .docs_resolved
                .root_dir
                .join(&server_config.site.pages_dir)
                .display(),
        );
        for (row, is_group) in tree_lines(site.menu().items()) {
            output.tree_row(&row, is_group);
        }
        output.success(&format!("OK: {} menu entries", site.menu().len()));

        Ok(())
    }
}

/// Indented `order. label` lines in menu order, flagged when the entry is a group.
fn tree_lines(children: &Children) -> Vec<(String, bool)> {
    let mut lines = Vec::new();
    collect_lines(children, 0, &mut lines);
    lines
}

fn collect_lines(children: &Children, depth: usize, lines: &mut Vec<(String, bool)>) {
    for (order, node) in children.iter_ordered() {
        let suffix = if node.is_group() { "/" } else { "" };
        lines.push((
            format!("{}{order}. {}{suffix}", "  ".repeat(depth), node.label),
            node.is_group(),
        ));
        collect_lines(&node.children, depth + 1, lines);
    }
}
