//! Terminal output for the CLI.
//!
//! Everything goes to stderr; stdout stays free for piping.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    label: Style,
    group: Style,
    page: Style,
    ok: Style,
    failure: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().bold(),
            group: Style::new().cyan().bold(),
            page: Style::new(),
            ok: Style::new().green(),
            failure: Style::new().red(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// `label: value` line used for startup settings.
    pub(crate) fn status(&self, label: &str, value: impl std::fmt::Display) {
        self.line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// One row of the menu tree.
    pub(crate) fn tree_row(&self, row: &str, is_group: bool) {
        let style = if is_group { &self.group } else { &self.page };
        self.line(&style.apply_to(row).to_string());
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.failure.apply_to(msg).to_string());
    }
}
