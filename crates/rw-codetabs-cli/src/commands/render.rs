//! `rw-codetabs render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rw_codetabs::{
    CodeGroup, CollectingSink, DocumentBuilder, FailurePolicy, GroupLayout, HtmlRenderer,
    PlainHighlighter, TabSelection,
};
use rw_codetabs_config::{CliSettings, Config};
use rw_tabstore::{FileTabStore, TabStore};

use crate::error::CliError;
use crate::output::Output;

/// Output format of the render command.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    /// Code groups as JSON.
    Json,
    /// Accessible HTML fragments, one per group.
    Html,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    markdown_file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover codetabs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default flags for groups that declare none (overrides config).
    #[arg(long, allow_hyphen_values = true)]
    flags: Option<String>,

    /// Lines shown before a block collapses (overrides config).
    #[arg(long)]
    collapse_threshold: Option<usize>,

    /// Render tabs that fail to highlight as plain text.
    #[arg(long)]
    isolate_failures: bool,

    /// Tab selection store file (overrides config).
    #[arg(long)]
    store: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading the input, building the
    /// groups or writing the output fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            flags: self.flags,
            collapse_threshold: self.collapse_threshold,
            isolate_failures: self.isolate_failures.then_some(true),
            store_path: self.store,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = std::fs::read_to_string(&self.markdown_file)?;

        let policy = if config.code.isolate_failures {
            FailurePolicy::IsolateTab
        } else {
            FailurePolicy::AbortGroup
        };
        let sink = CollectingSink::new();
        let groups = DocumentBuilder::new(&PlainHighlighter)
            .with_diagnostics(&sink)
            .with_failure_policy(policy)
            .with_default_flags(config.code.flag_chars())
            .build(&markdown)
            .await?;

        for warning in sink.into_warnings() {
            output.warning(&warning);
        }

        let rendered = match self.format {
            Format::Json => serde_json::to_string_pretty(&groups)?,
            Format::Html => {
                let store = FileTabStore::open(config.store_resolved.path.clone());
                render_html(&groups, &store, config.code.collapse_threshold)
            }
        };

        if let Some(path) = &self.output {
            std::fs::write(path, rendered)?;
            output.rendered(groups.len(), path);
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }

        Ok(())
    }
}

/// Render every group with its stored tab selection.
fn render_html(groups: &[CodeGroup], store: &dyn TabStore, collapse_threshold: usize) -> String {
    let mut renderer = HtmlRenderer::new().with_collapse_threshold(collapse_threshold);
    groups
        .iter()
        .map(|group| match group.layout() {
            GroupLayout::Single => renderer.render(group, None),
            GroupLayout::Tabbed => renderer.render(group, Some(&TabSelection::new(group, store))),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
