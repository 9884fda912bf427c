//! Raw code block input.

/// A fenced code block as extracted from a document.
///
/// The language tag and metadata come from the fence info string
/// (`` ```ts My Title -nc -f app.ts ``), the source is the block body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawCodeBlock {
    /// Language identifier (e.g., "typescript", "terminal").
    pub language: String,
    /// Free-form metadata following the language in the info string.
    pub metadata: String,
    /// Block body.
    pub source: String,
}

impl RawCodeBlock {
    /// Create a new raw block.
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        metadata: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            metadata: metadata.into(),
            source: source.into(),
        }
    }

    /// Split a fence info string into a block's language and metadata.
    ///
    /// The first whitespace-separated word is the language, everything after
    /// it (trimmed) is metadata.
    #[must_use]
    pub fn from_info(info: &str, source: impl Into<String>) -> Self {
        let info = info.trim();
        let (language, metadata) = info
            .split_once(char::is_whitespace)
            .map_or((info, ""), |(lang, rest)| (lang, rest.trim()));
        Self::new(language, metadata, source)
    }
}
