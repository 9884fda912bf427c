//! Build errors.

use crate::highlight::HighlightError;

/// Error building a code group.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A group declaration contained no code blocks.
    #[error("{component} requires at least one code block")]
    NoCodeBlocks {
        /// Name of the offending component (e.g., "code-group").
        component: String,
    },
    /// Any other structural problem in a group declaration.
    #[error("{component}: {message}")]
    Structure {
        /// Name of the offending component.
        component: String,
        /// What is wrong with it.
        message: String,
    },
    /// The highlighter rejected one tab.
    #[error("failed to highlight tab \"{title}\" ({language}): {source}")]
    Highlight {
        /// Title of the tab.
        title: String,
        /// Language tag passed to the highlighter.
        language: String,
        /// Highlighter error.
        source: HighlightError,
    },
}
