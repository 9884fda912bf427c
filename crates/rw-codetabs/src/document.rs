//! Whole-document building.

use crate::block::RawCodeBlock;
use crate::diagnostics::DiagnosticSink;
use crate::error::BuildError;
use crate::group::{CodeGroup, FailurePolicy, TabGroupBuilder};
use crate::highlight::Highlighter;
use crate::icons::IconResolver;
use crate::install::{INSTALL_STORAGE_KEY, expand_install};
use crate::markdown::{CodeSection, extract_sections};

/// Builds every code group of a Markdown document.
///
/// Sections are built one after another in document order; the tabs of each
/// group are built concurrently.
///
/// # Example
///
/// ```
/// use rw_codetabs::{DocumentBuilder, PlainHighlighter};
///
/// # futures::executor::block_on(async {
/// let groups = DocumentBuilder::new(&PlainHighlighter)
///     .build("```package-install\nzod\n```\n")
///     .await
///     .unwrap();
///
/// assert_eq!(groups[0].storage_key.as_deref(), Some("package-manager"));
/// assert_eq!(groups[0].tabs.len(), 4);
/// # });
/// ```
pub struct DocumentBuilder<'a, H> {
    groups: TabGroupBuilder<'a, H>,
    default_flags: Option<String>,
}

impl<'a, H: Highlighter> DocumentBuilder<'a, H> {
    #[must_use]
    pub fn new(highlighter: &'a H) -> Self {
        Self {
            groups: TabGroupBuilder::new(highlighter),
            default_flags: None,
        }
    }

    /// Flags applied to groups and single blocks that declare none.
    #[must_use]
    pub fn with_default_flags(mut self, flags: impl Into<String>) -> Self {
        self.default_flags = Some(flags.into()).filter(|f| !f.is_empty());
        self
    }

    #[must_use]
    pub fn with_icons(mut self, icons: &'a dyn IconResolver) -> Self {
        self.groups = self.groups.with_icons(icons);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn DiagnosticSink) -> Self {
        self.groups = self.groups.with_diagnostics(diagnostics);
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.groups = self.groups.with_failure_policy(policy);
        self
    }

    /// Build all groups of `markdown`.
    ///
    /// # Errors
    ///
    /// Returns the first extraction or group build error.
    pub async fn build(&self, markdown: &str) -> Result<Vec<CodeGroup>, BuildError> {
        let sections = extract_sections(markdown)?;
        let mut groups = Vec::with_capacity(sections.len());

        for section in sections {
            let group = match section {
                CodeSection::Single(block) => self.build_blocks(&[block], None, None).await?,
                CodeSection::Group {
                    blocks,
                    flags,
                    storage_key,
                } => {
                    self.build_blocks(&blocks, flags.as_deref(), storage_key.as_deref())
                        .await?
                }
                CodeSection::Install(block) => {
                    let blocks = expand_install(&block);
                    self.build_blocks(&blocks, None, Some(INSTALL_STORAGE_KEY))
                        .await?
                }
            };
            groups.push(group);
        }

        tracing::info!(groups = groups.len(), "Built document code groups");
        Ok(groups)
    }

    async fn build_blocks(
        &self,
        blocks: &[RawCodeBlock],
        flags: Option<&str>,
        storage_key: Option<&str>,
    ) -> Result<CodeGroup, BuildError> {
        let flags = flags.or(self.default_flags.as_deref());
        self.groups.build_group(blocks, flags, storage_key).await
    }
}
