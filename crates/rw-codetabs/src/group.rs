//! Tab group assembly.
//!
//! [`TabGroupBuilder`] turns a list of raw code blocks into a [`CodeGroup`]:
//! each block is parsed, highlighted and annotated concurrently, and the
//! resulting tabs keep the order of the input blocks.

use futures::future::try_join_all;

use crate::annotations::{AnnotatedCode, apply_pipeline, build_pipeline, extract_annotations};
use crate::block::RawCodeBlock;
use crate::diagnostics::{DiagnosticSink, TracingSink, Warning};
use crate::error::BuildError;
use crate::highlight::{Highlighted, Highlighter};
use crate::icons::{IconResolver, StaticIconRegistry, TabIcon, resolve_tab_icon};
use crate::meta::parse_meta;
use crate::options::{CodeOptions, flags_to_options, merge_options};

/// One selectable variant of a code group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TabDescriptor {
    /// Title from the block metadata. Used to identify the tab on selection.
    pub title: String,
    /// Filename given with `-f`, empty if none.
    pub filename: String,
    /// Language tag of the block.
    pub language: String,
    /// Group options merged with the tab's own flags.
    pub options: CodeOptions,
    /// Raw highlighter output.
    pub highlighted: Highlighted,
    /// Highlighted lines after the annotation pipeline.
    pub code: AnnotatedCode,
    pub icon: TabIcon,
    /// Displayed code (annotation comments removed).
    pub source: String,
}

impl TabDescriptor {
    /// Text for the tab button: title, else filename, else language.
    #[must_use]
    pub fn label(&self) -> &str {
        [&self.title, &self.filename, &self.language]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("", String::as_str)
    }
}

/// A group of tabs handed to the renderer.
///
/// `tabs` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CodeGroup {
    /// Key under which the selected tab is persisted.
    pub storage_key: Option<String>,
    /// Options resolved from the group's own flags.
    pub group_options: CodeOptions,
    pub tabs: Vec<TabDescriptor>,
}

impl CodeGroup {
    /// Find a tab by title.
    ///
    /// Titles are not unique; this is a linear scan and the first match wins.
    #[must_use]
    pub fn find_tab(&self, title: &str) -> Option<(usize, &TabDescriptor)> {
        self.tabs.iter().enumerate().find(|(_, tab)| tab.title == title)
    }
}

/// What to do when the highlighter fails for one tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail the whole group (all tabs are awaited together).
    #[default]
    AbortGroup,
    /// Render the failing tab as plain text and report a warning.
    IsolateTab,
}

/// Builds [`CodeGroup`]s from raw code blocks.
///
/// # Example
///
/// ```
/// use rw_codetabs::{PlainHighlighter, RawCodeBlock, TabGroupBuilder};
///
/// # futures::executor::block_on(async {
/// let blocks = [
///     RawCodeBlock::new("ts", "Client -n", "connect();"),
///     RawCodeBlock::new("python", "Client", "connect()"),
/// ];
/// let group = TabGroupBuilder::new(&PlainHighlighter)
///     .build_group(&blocks, Some("c"), Some("lang"))
///     .await
///     .unwrap();
///
/// assert_eq!(group.tabs.len(), 2);
/// assert!(group.tabs[0].options.copy_button());
/// assert!(group.tabs[0].options.line_numbers());
/// assert!(!group.tabs[1].options.line_numbers());
/// # });
/// ```
pub struct TabGroupBuilder<'a, H> {
    highlighter: &'a H,
    icons: &'a dyn IconResolver,
    diagnostics: &'a dyn DiagnosticSink,
    policy: FailurePolicy,
}

impl<'a, H: Highlighter> TabGroupBuilder<'a, H> {
    /// Create a builder around a highlighter.
    ///
    /// Uses the static icon registry, logs warnings through `tracing` and
    /// aborts the group on highlight failures.
    #[must_use]
    pub fn new(highlighter: &'a H) -> Self {
        Self {
            highlighter,
            icons: &StaticIconRegistry,
            diagnostics: &TracingSink,
            policy: FailurePolicy::default(),
        }
    }

    /// Set the icon resolver for non-builtin languages.
    #[must_use]
    pub fn with_icons(mut self, icons: &'a dyn IconResolver) -> Self {
        self.icons = icons;
        self
    }

    /// Set the sink receiving warnings.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Set the highlight failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a group from `blocks`.
    ///
    /// All tabs are built concurrently; `tabs[i]` always corresponds to
    /// `blocks[i]` regardless of completion order.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NoCodeBlocks`] if `blocks` is empty
    /// - [`BuildError::Highlight`] if a highlight fails under
    ///   [`FailurePolicy::AbortGroup`]
    pub async fn build_group(
        &self,
        blocks: &[RawCodeBlock],
        group_flags: Option<&str>,
        storage_key: Option<&str>,
    ) -> Result<CodeGroup, BuildError> {
        if blocks.is_empty() {
            return Err(BuildError::NoCodeBlocks {
                component: "CodeGroup".to_owned(),
            });
        }

        let group_options = group_flags
            .map(|flags| flags_to_options(flags, self.diagnostics))
            .unwrap_or_default();

        let tabs =
            try_join_all(blocks.iter().map(|block| self.build_tab(block, group_options))).await?;

        tracing::debug!(tabs = tabs.len(), storage_key, "Built code group");

        Ok(CodeGroup {
            storage_key: storage_key.map(str::to_owned),
            group_options,
            tabs,
        })
    }

    async fn build_tab(
        &self,
        block: &RawCodeBlock,
        group_options: CodeOptions,
    ) -> Result<TabDescriptor, BuildError> {
        let meta = parse_meta(&block.metadata);
        let options = merge_options(group_options, flags_to_options(&meta.flags, self.diagnostics));
        let (source, annotations) = extract_annotations(&block.source);

        let highlighted = match self.highlighter.highlight(&block.language, &source).await {
            Ok(highlighted) => highlighted,
            Err(err) => match self.policy {
                FailurePolicy::AbortGroup => {
                    return Err(BuildError::Highlight {
                        title: meta.title,
                        language: block.language.clone(),
                        source: err,
                    });
                }
                FailurePolicy::IsolateTab => {
                    self.diagnostics.warn(Warning::HighlightFallback {
                        title: meta.title.clone(),
                        language: block.language.clone(),
                        message: err.to_string(),
                    });
                    Highlighted::plain(&block.language, &source)
                }
            },
        };

        let mut code = AnnotatedCode::from_highlighted(&highlighted);
        apply_pipeline(&build_pipeline(&options), &mut code, &annotations);

        let icon_name = if meta.title.is_empty() {
            &meta.filename
        } else {
            &meta.title
        };
        let icon = resolve_tab_icon(&block.language, icon_name, self.icons);

        Ok(TabDescriptor {
            title: meta.title,
            filename: meta.filename,
            language: block.language.clone(),
            options,
            highlighted,
            code,
            icon,
            source,
        })
    }
}
