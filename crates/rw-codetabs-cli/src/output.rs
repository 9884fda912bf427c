//! Styled stderr messages for the CLI commands.

use std::fmt::{self, Display};
use std::path::Path;

use console::{Style, Term};

/// Status reporter writing to stderr, leaving stdout for rendered output.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Report the groups written to `path` (green).
    pub(crate) fn rendered(&self, groups: usize, path: &Path) {
        self.write(
            &self.green,
            format_args!("Rendered {groups} code group(s) to {}", path.display()),
        );
    }

    /// Report a recovered code block problem (yellow).
    pub(crate) fn warning(&self, warning: &impl Display) {
        self.write(&self.yellow, format_args!("Warning: {warning}"));
    }

    /// Report the error that ended the command (red).
    pub(crate) fn error(&self, error: &impl Display) {
        self.write(&self.red, format_args!("Error: {error}"));
    }

    fn write(&self, style: &Style, msg: fmt::Arguments<'_>) {
        if let Err(e) = self.term.write_line(&styled(style, msg)) {
            tracing::debug!("failed to write to stderr: {e}");
        }
    }
}

fn styled(style: &Style, msg: fmt::Arguments<'_>) -> String {
    style.apply_to(msg).to_string()
}
