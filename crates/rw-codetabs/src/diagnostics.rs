//! Non-fatal diagnostics emitted while normalizing code blocks.
//!
//! Parsing problems (unknown flag characters, highlight failures under tab
//! isolation) never abort a build. They are reported to a [`DiagnosticSink`]
//! passed into the builder, so callers decide whether warnings go to the log
//! or get collected for display.

use std::fmt;
use std::sync::RwLock;

/// A recoverable problem found while building a code group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A flags token contained a character with no option mapping.
    UnknownFlag {
        /// The unrecognized character.
        flag: char,
        /// The full flags token it appeared in.
        token: String,
    },
    /// Highlighting failed for one tab and plain output was used instead.
    HighlightFallback {
        /// Title of the affected tab.
        title: String,
        /// Language tag that failed to highlight.
        language: String,
        /// Error reported by the highlighter.
        message: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFlag { flag, token } => {
                write!(f, "unknown code block flag '{flag}' in \"-{token}\"")
            }
            Self::HighlightFallback {
                title,
                language,
                message,
            } => write!(
                f,
                "highlighting tab \"{title}\" ({language}) failed, using plain text: {message}"
            ),
        }
    }
}

/// Receiver for [`Warning`]s.
///
/// Implementations must be shareable across the concurrent per-tab futures of
/// a single group build.
pub trait DiagnosticSink: Send + Sync {
    /// Report a warning.
    fn warn(&self, warning: Warning);
}

/// Sink that logs every warning through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, warning: Warning) {
        tracing::warn!(%warning, "Code block warning");
    }
}

/// Sink that records warnings in memory.
///
/// # Example
///
/// ```
/// use rw_codetabs::{CollectingSink, flags_to_options};
///
/// let sink = CollectingSink::new();
/// let options = flags_to_options("nx", &sink);
/// assert_eq!(options.line_numbers, Some(true));
/// assert_eq!(sink.warnings().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: RwLock<Vec<Warning>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of warnings reported so far, in report order.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings
            .read()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Consume the sink and return its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings.into_inner().unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, warning: Warning) {
        if let Ok(mut warnings) = self.warnings.write() {
            warnings.push(warning);
        }
    }
}
