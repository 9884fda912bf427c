//! Code block normalization and tab grouping for RW.
//!
//! Turns fenced code blocks into tab groups ready for rendering. Each block
//! goes through the same steps:
//!
//! 1. **Metadata**: the info string after the language is split into title,
//!    flags and filename ([`parse_meta`])
//! 2. **Options**: group and tab flags become [`CodeOptions`]
//!    ([`flags_to_options`], [`merge_options`])
//! 3. **Highlighting**: an injected [`Highlighter`] produces styled tokens
//! 4. **Annotations**: comment annotations (`// !mark`, `# !diff +`) are
//!    stripped and applied by an ordered handler pipeline ([`build_pipeline`])
//! 5. **Icon**: builtin icon or an [`IconResolver`] lookup
//!
//! [`TabGroupBuilder`] runs these steps concurrently for every block of a
//! group and keeps tabs in input order. [`DocumentBuilder`] does the same for
//! every group of a Markdown document, including `package-install` blocks
//! expanded into one tab per package manager ([`expand_install`]).
//!
//! # Example
//!
//! ```
//! use rw_codetabs::{HtmlRenderer, PlainHighlighter, RawCodeBlock, TabGroupBuilder, TabSelection};
//! use rw_tabstore::MemoryTabStore;
//!
//! # futures::executor::block_on(async {
//! let blocks = [
//!     RawCodeBlock::new("ts", "Client -c", "connect();"),
//!     RawCodeBlock::new("python", "Client -c", "connect()"),
//! ];
//! let group = TabGroupBuilder::new(&PlainHighlighter)
//!     .build_group(&blocks, None, Some("lang"))
//!     .await
//!     .unwrap();
//!
//! let store = MemoryTabStore::new();
//! let mut selection = TabSelection::new(&group, &store);
//! selection.select("Client");
//!
//! let html = HtmlRenderer::new().render(&group, Some(&selection));
//! assert!(html.contains(r#"role="tablist""#));
//! # });
//! ```

mod annotations;
mod block;
mod diagnostics;
mod document;
mod error;
mod group;
mod highlight;
mod html;
mod icons;
mod install;
mod markdown;
mod meta;
mod options;
mod view;

pub use annotations::{
    AnnotatedCode, AnnotatedLine, AnnotatedToken, Annotation, AnnotationHandler, CollapseLine,
    CollapseRole, DiffKind, apply_pipeline, build_pipeline, extract_annotations,
};
pub use block::RawCodeBlock;
pub use diagnostics::{CollectingSink, DiagnosticSink, TracingSink, Warning};
pub use document::DocumentBuilder;
pub use error::BuildError;
pub use group::{CodeGroup, FailurePolicy, TabDescriptor, TabGroupBuilder};
pub use highlight::{HighlightError, Highlighted, Highlighter, PlainHighlighter, Token};
pub use html::HtmlRenderer;
pub use icons::{
    BuiltinIcon, FileIcon, IconResolver, StaticIconRegistry, TabIcon, resolve_tab_icon,
};
pub use install::{Ecosystem, INSTALL_STORAGE_KEY, TERMINAL_LANGUAGE, expand_install};
pub use markdown::{CODE_GROUP_DIRECTIVE, CodeSection, INSTALL_LANGUAGE, extract_sections};
pub use meta::{ParsedMeta, parse_meta};
pub use options::{CodeOptions, flags_to_options, merge_options};
pub use view::{CollapseState, DEFAULT_COLLAPSE_THRESHOLD, GroupLayout, TabSelection};
