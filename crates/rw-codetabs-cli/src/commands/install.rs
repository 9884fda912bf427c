//! `rw-codetabs install` command implementation.

use std::io::Write;

use clap::Args;
use rw_codetabs::{INSTALL_LANGUAGE, RawCodeBlock, expand_install};

use crate::error::CliError;

/// Arguments for the install command.
#[derive(Args)]
pub(crate) struct InstallArgs {
    /// Packages to install.
    #[arg(required = true)]
    packages: Vec<String>,

    /// Ecosystem hint as written after `package-install` (e.g. "python -no-venv").
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    meta: String,

    /// Only print the commands of this package manager.
    #[arg(short, long)]
    tool: Option<String>,
}

impl InstallArgs {
    /// Execute the install command.
    ///
    /// # Errors
    ///
    /// Returns an error if `--tool` names no generated package manager or
    /// stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let block = RawCodeBlock::new(INSTALL_LANGUAGE, self.meta, self.packages.join(" "));
        let text = format_commands(&expand_install(&block), self.tool.as_deref())?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Commands per package manager, or one manager's commands alone.
fn format_commands(tabs: &[RawCodeBlock], tool: Option<&str>) -> Result<String, CliError> {
    if let Some(tool) = tool {
        let tab = tabs.iter().find(|t| t.metadata == tool).ok_or_else(|| {
            let known: Vec<&str> = tabs.iter().map(|t| t.metadata.as_str()).collect();
            CliError::Validation(format!(
                "unknown package manager \"{tool}\" (expected one of: {})",
                known.join(", ")
            ))
        })?;
        return Ok(format!("{}\n", tab.source));
    }

    Ok(tabs
        .iter()
        .map(|tab| format!("# {}\n{}\n", tab.metadata, tab.source))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tabs(meta: &str, packages: &str) -> Vec<RawCodeBlock> {
        expand_install(&RawCodeBlock::new(INSTALL_LANGUAGE, meta, packages))
    }

    #[test]
    fn test_all_tools() {
        let text = format_commands(&tabs("", "zod"), None).unwrap();
        assert_eq!(
            text,
            "# npm\nnpm install zod\n\n# yarn\nyarn add zod\n\n# pnpm\npnpm add zod\n\n# bun\nbun add zod\n"
        );
    }

    #[test]
    fn test_single_tool() {
        let text = format_commands(&tabs("python", "httpx"), Some("poetry")).unwrap();
        assert_eq!(text, "poetry shell\npoetry add httpx\n");
    }

    #[test]
    fn test_unknown_tool() {
        let err = format_commands(&tabs("py", "httpx"), Some("npm")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown package manager \"npm\" (expected one of: uv, poetry, pip)"
        );
    }
}
