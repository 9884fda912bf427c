//! Highlighter interface.
//!
//! Syntax highlighting itself lives outside this crate. A [`Highlighter`]
//! turns `(language, source)` into styled tokens; the builder treats the result
//! as opaque apart from walking its lines to attach annotations.

use std::future::Future;

/// Error returned by a [`Highlighter`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HighlightError(pub String);

/// A run of text sharing one style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// Token text.
    pub content: String,
    /// Style for the token (e.g., a CSS color), `None` for unstyled text.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub style: Option<String>,
}

impl Token {
    /// Create an unstyled token.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: None,
        }
    }
}

/// Highlighter output for one source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Highlighted {
    /// Language the highlighter actually used.
    pub language: String,
    /// Tokens per source line.
    pub lines: Vec<Vec<Token>>,
    /// Style payload for the whole block (theme colors, CSS), if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub style: Option<String>,
    /// The source text that was highlighted.
    pub raw_text: String,
}

impl Highlighted {
    /// Plain-text output: one unstyled token per line.
    #[must_use]
    pub fn plain(language: &str, source: &str) -> Self {
        Self {
            language: language.to_owned(),
            lines: source.lines().map(|line| vec![Token::plain(line)]).collect(),
            style: None,
            raw_text: source.to_owned(),
        }
    }
}

/// Converts source text into styled tokens.
///
/// Implementations should degrade unknown languages to plain text rather than
/// fail: under the default failure policy one error fails the whole group.
pub trait Highlighter: Sync {
    /// Highlight `source` as `language`.
    fn highlight(
        &self,
        language: &str,
        source: &str,
    ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send;
}

/// Highlighter that never styles anything.
///
/// Useful when no highlighter is configured and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(
        &self,
        language: &str,
        source: &str,
    ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send {
        let highlighted = Highlighted::plain(language, source);
        async move { Ok(highlighted) }
    }
}
