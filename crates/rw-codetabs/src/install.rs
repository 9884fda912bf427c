//! Package install command expansion.
//!
//! A `package-install` block lists packages once; it is expanded into one
//! terminal block per package manager of the detected ecosystem.

use crate::block::RawCodeBlock;

/// Language tag of generated blocks.
pub const TERMINAL_LANGUAGE: &str = "terminal";

/// Storage key shared by all install groups so one choice applies page-wide.
pub const INSTALL_STORAGE_KEY: &str = "package-manager";

/// Package ecosystem detected from block metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ecosystem {
    /// npm, yarn, pnpm, bun.
    JavaScript,
    /// uv, poetry, pip.
    Python {
        /// Prefix commands with virtual environment setup.
        venv: bool,
    },
}

impl Ecosystem {
    /// Detect the ecosystem from metadata.
    ///
    /// Matching is case-insensitive. `python` anywhere or a `py` token selects
    /// Python, `-no-venv` skips environment setup. JavaScript is the default
    /// and also wins when both ecosystems are named explicitly.
    #[must_use]
    pub fn detect(metadata: &str) -> Self {
        let lower = metadata.to_lowercase();
        let has_token = |token: &str| lower.split_whitespace().any(|t| t == token);

        let is_python = lower.contains("python") || has_token("py");
        let explicit_js = lower.contains("javascript")
            || lower.contains("typescript")
            || has_token("js")
            || has_token("ts");

        if explicit_js || !is_python {
            Self::JavaScript
        } else {
            Self::Python {
                venv: !has_token("-no-venv"),
            }
        }
    }
}

/// Expand an install block into per-tool terminal blocks.
///
/// The block source is the package list; output order is fixed per ecosystem.
///
/// # Example
///
/// ```
/// use rw_codetabs::{RawCodeBlock, expand_install};
///
/// let tabs = expand_install(&RawCodeBlock::new("package-install", "py -no-venv", "requests"));
/// let tools: Vec<&str> = tabs.iter().map(|b| b.metadata.as_str()).collect();
/// assert_eq!(tools, ["uv", "poetry", "pip"]);
/// assert_eq!(tabs[2].source, "pip install requests");
/// ```
#[must_use]
pub fn expand_install(block: &RawCodeBlock) -> Vec<RawCodeBlock> {
    let pkg = block.source.split_whitespace().collect::<Vec<_>>().join(" ");
    let commands: Vec<(&str, Vec<String>)> = match Ecosystem::detect(&block.metadata) {
        Ecosystem::JavaScript => vec![
            ("npm", vec![format!("npm install {pkg}")]),
            ("yarn", vec![format!("yarn add {pkg}")]),
            ("pnpm", vec![format!("pnpm add {pkg}")]),
            ("bun", vec![format!("bun add {pkg}")]),
        ],
        Ecosystem::Python { venv: false } => vec![
            ("uv", vec![format!("uv add {pkg}")]),
            ("poetry", vec![format!("poetry add {pkg}")]),
            ("pip", vec![format!("pip install {pkg}")]),
        ],
        Ecosystem::Python { venv: true } => vec![
            (
                "uv",
                vec![
                    "uv venv".to_owned(),
                    "source .venv/bin/activate".to_owned(),
                    format!("uv add {pkg}"),
                ],
            ),
            (
                "poetry",
                vec!["poetry shell".to_owned(), format!("poetry add {pkg}")],
            ),
            (
                "pip",
                vec![
                    "python -m venv .venv".to_owned(),
                    "source .venv/bin/activate".to_owned(),
                    format!("pip install {pkg}"),
                ],
            ),
        ],
    };

    commands
        .into_iter()
        .map(|(tool, lines)| RawCodeBlock::new(TERMINAL_LANGUAGE, tool, lines.join("\n")))
        .collect()
}
