//! Line representation rewritten by annotation handlers.

use crate::highlight::{Highlighted, Token};

/// Diff marker on a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiffKind {
    Added,
    Removed,
}

impl DiffKind {
    /// Gutter symbol for the marker.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
        }
    }
}

/// Role of a line inside a collapsible region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CollapseRole {
    /// Inside a region, role not assigned yet.
    Region,
    /// Clickable first line of the region.
    Trigger,
    /// Hidden when the region is collapsed.
    Content,
}

/// Collapsible region membership of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollapseLine {
    /// Region id, unique within the block.
    pub region: usize,
    /// Role of this line.
    pub role: CollapseRole,
    /// Whether the region starts collapsed.
    pub collapsed: bool,
}

/// A highlighted token plus inline decorations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnnotatedToken {
    pub content: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub style: Option<String>,
    /// Link target.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link: Option<String>,
    /// Tooltip text.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tooltip: Option<String>,
    /// Name of the hover target this token activates.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hover: Option<String>,
    /// Stable key used to animate the token between tabs.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub transition_key: Option<String>,
}

impl From<&Token> for AnnotatedToken {
    fn from(token: &Token) -> Self {
        Self {
            content: token.content.clone(),
            style: token.style.clone(),
            ..Self::default()
        }
    }
}

/// One rendered line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnnotatedLine {
    /// 1-based line number, set when line numbers are enabled.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub number: Option<usize>,
    pub tokens: Vec<AnnotatedToken>,
    /// Highlight color or class for a marked line.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub mark: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub diff: Option<DiffKind>,
    pub folded: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub collapse: Option<CollapseLine>,
    pub wrap: bool,
    /// Callout notes rendered below the line.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub callouts: Vec<String>,
}

impl AnnotatedLine {
    /// Concatenated token text.
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.content.as_str()).collect()
    }
}

/// Highlighted code after the annotation pipeline ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnnotatedCode {
    pub lines: Vec<AnnotatedLine>,
    /// Whether tokens carry transition keys.
    pub animate: bool,
}

impl AnnotatedCode {
    /// Start from highlighter output with no decorations.
    #[must_use]
    pub fn from_highlighted(highlighted: &Highlighted) -> Self {
        let lines = highlighted
            .lines
            .iter()
            .map(|tokens| AnnotatedLine {
                tokens: tokens.iter().map(AnnotatedToken::from).collect(),
                ..AnnotatedLine::default()
            })
            .collect();
        Self {
            lines,
            animate: false,
        }
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Split tokens so every occurrence of `pattern` is its own token.
///
/// Returns the indices of the tokens equal to `pattern`. Occurrences that
/// straddle a token boundary are not matched.
pub(crate) fn isolate_pattern(line: &mut AnnotatedLine, pattern: &str) -> Vec<usize> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let mut tokens = Vec::with_capacity(line.tokens.len());
    let mut matched = Vec::new();

    for token in line.tokens.drain(..) {
        let mut rest = token.content.as_str();
        while let Some(pos) = rest.find(pattern) {
            if pos > 0 {
                tokens.push(AnnotatedToken {
                    content: rest[..pos].to_owned(),
                    ..token.clone()
                });
            }
            matched.push(tokens.len());
            tokens.push(AnnotatedToken {
                content: pattern.to_owned(),
                ..token.clone()
            });
            rest = &rest[pos + pattern.len()..];
        }
        if !rest.is_empty() {
            tokens.push(AnnotatedToken {
                content: rest.to_owned(),
                ..token.clone()
            });
        }
    }

    line.tokens = tokens;
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(parts: &[&str]) -> AnnotatedLine {
        AnnotatedLine {
            tokens: parts
                .iter()
                .map(|p| AnnotatedToken {
                    content: (*p).to_owned(),
                    style: Some("#fff".to_owned()),
                    ..AnnotatedToken::default()
                })
                .collect(),
            ..AnnotatedLine::default()
        }
    }

    #[test]
    fn test_from_highlighted() {
        let code = AnnotatedCode::from_highlighted(&Highlighted::plain("txt", "a\nb"));
        assert_eq!(code.line_count(), 2);
        assert_eq!(code.lines[1].text(), "b");
        assert!(code.lines[0].number.is_none());
    }

    #[test]
    fn test_isolate_pattern_splits_token() {
        let mut l = line(&["(map-get? m k)"]);
        let matched = isolate_pattern(&mut l, "map-get?");
        assert_eq!(matched, vec![1]);
        let parts: Vec<&str> = l.tokens.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(parts, vec!["(", "map-get?", " m k)"]);
        assert!(l.tokens.iter().all(|t| t.style.as_deref() == Some("#fff")));
        assert_eq!(l.text(), "(map-get? m k)");
    }

    #[test]
    fn test_isolate_pattern_multiple_occurrences() {
        let mut l = line(&["a+a", "b a"]);
        let matched = isolate_pattern(&mut l, "a");
        assert_eq!(matched, vec![0, 2, 4]);
        assert_eq!(l.text(), "a+ab a");
    }

    #[test]
    fn test_isolate_pattern_no_match() {
        let mut l = line(&["abc"]);
        assert!(isolate_pattern(&mut l, "z").is_empty());
        assert_eq!(l.tokens.len(), 1);
    }

    #[test]
    fn test_diff_symbol() {
        assert_eq!(DiffKind::Added.symbol(), '+');
        assert_eq!(DiffKind::Removed.symbol(), '-');
    }
}
