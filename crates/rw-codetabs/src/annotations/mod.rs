//! Annotation pipeline.
//!
//! Handlers run in a fixed order and each one rewrites the [`AnnotatedCode`]
//! produced by the previous one:
//!
//! ```text
//! mark → tooltip → fold → link → [animate] token_transitions
//!      → [line_numbers] line_numbers → diff
//!      → collapse → collapse_trigger → collapse_content
//!      → [word_wrap] word_wrap → callout → hover
//! ```
//!
//! Bracketed handlers are only present when the named option is set.
//! Region-defining handlers run first; line numbers are assigned before diff
//! markers; purely cosmetic handlers run last.

mod code;
mod extract;

pub use code::{
    AnnotatedCode, AnnotatedLine, AnnotatedToken, CollapseLine, CollapseRole, DiffKind,
};
pub use extract::{Annotation, extract_annotations};

use crate::options::CodeOptions;
use code::isolate_pattern;

/// A named transform over annotated lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AnnotationHandler {
    Mark,
    Tooltip,
    Fold,
    Link,
    TokenTransitions,
    LineNumbers,
    Diff,
    Collapse,
    CollapseTrigger,
    CollapseContent,
    WordWrap,
    Callout,
    Hover,
}

impl AnnotationHandler {
    /// Handler name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mark => "mark",
            Self::Tooltip => "tooltip",
            Self::Fold => "fold",
            Self::Link => "link",
            Self::TokenTransitions => "tokenTransitions",
            Self::LineNumbers => "lineNumbers",
            Self::Diff => "diff",
            Self::Collapse => "collapse",
            Self::CollapseTrigger => "collapseTrigger",
            Self::CollapseContent => "collapseContent",
            Self::WordWrap => "wordWrap",
            Self::Callout => "callout",
            Self::Hover => "hover",
        }
    }

    /// Apply this handler to `code`.
    ///
    /// Annotation-driven handlers only look at annotations carrying their own
    /// name; the rest act on every line.
    pub fn apply(self, code: &mut AnnotatedCode, annotations: &[Annotation]) {
        match self {
            Self::Mark => for_lines(code, annotations, "mark", |line, a| {
                line.mark = Some(if a.query.is_empty() {
                    "default".to_owned()
                } else {
                    a.query.clone()
                });
            }),
            Self::Tooltip => for_tokens(code, annotations, "tooltip", |token, a| {
                token.tooltip = Some(a.query.clone());
            }),
            Self::Fold => for_lines(code, annotations, "fold", |line, _| line.folded = true),
            Self::Link => for_tokens(code, annotations, "link", |token, a| {
                token.link = Some(a.query.clone());
            }),
            Self::TokenTransitions => {
                code.animate = true;
                for (row, line) in code.lines.iter_mut().enumerate() {
                    for (col, token) in line.tokens.iter_mut().enumerate() {
                        token.transition_key = Some(format!("{row}:{col}"));
                    }
                }
            }
            Self::LineNumbers => {
                for (idx, line) in code.lines.iter_mut().enumerate() {
                    line.number = Some(idx + 1);
                }
            }
            Self::Diff => for_lines(code, annotations, "diff", |line, a| {
                match a.query.chars().next() {
                    Some('+') => line.diff = Some(DiffKind::Added),
                    Some('-') => line.diff = Some(DiffKind::Removed),
                    _ => {}
                }
            }),
            Self::Collapse => {
                let regions = annotations.iter().filter(|a| a.name == "collapse");
                for (region, a) in regions.enumerate() {
                    let collapsed = a.query == "collapsed";
                    for line in lines_in(code, a) {
                        line.collapse = Some(CollapseLine {
                            region,
                            role: CollapseRole::Region,
                            collapsed,
                        });
                    }
                }
            }
            Self::CollapseTrigger => {
                let mut seen = Vec::new();
                for line in &mut code.lines {
                    if let Some(collapse) = line.collapse.as_mut()
                        && !seen.contains(&collapse.region)
                    {
                        seen.push(collapse.region);
                        collapse.role = CollapseRole::Trigger;
                    }
                }
            }
            Self::CollapseContent => {
                for collapse in code.lines.iter_mut().filter_map(|l| l.collapse.as_mut()) {
                    if collapse.role == CollapseRole::Region {
                        collapse.role = CollapseRole::Content;
                    }
                }
            }
            Self::WordWrap => {
                for line in &mut code.lines {
                    line.wrap = true;
                }
            }
            Self::Callout => for_lines(code, annotations, "callout", |line, a| {
                line.callouts.push(a.query.clone());
            }),
            Self::Hover => for_tokens(code, annotations, "hover", |token, a| {
                token.hover = Some(a.query.clone());
            }),
        }
    }
}

/// Build the ordered handler list for resolved options.
///
/// # Example
///
/// ```
/// use rw_codetabs::{AnnotationHandler, CodeOptions, build_pipeline};
///
/// let pipeline = build_pipeline(&CodeOptions {
///     line_numbers: Some(true),
///     ..CodeOptions::default()
/// });
/// let numbers = pipeline.iter().position(|h| *h == AnnotationHandler::LineNumbers);
/// let diff = pipeline.iter().position(|h| *h == AnnotationHandler::Diff);
/// assert!(numbers < diff);
/// ```
#[must_use]
pub fn build_pipeline(options: &CodeOptions) -> Vec<AnnotationHandler> {
    use AnnotationHandler as H;

    let mut handlers = vec![H::Mark, H::Tooltip, H::Fold, H::Link];
    if options.animate() {
        handlers.push(H::TokenTransitions);
    }
    if options.line_numbers() {
        handlers.push(H::LineNumbers);
    }
    handlers.extend([H::Diff, H::Collapse, H::CollapseTrigger, H::CollapseContent]);
    if options.word_wrap() {
        handlers.push(H::WordWrap);
    }
    handlers.extend([H::Callout, H::Hover]);
    handlers
}

/// Run `handlers` over `code` in order.
pub fn apply_pipeline(
    handlers: &[AnnotationHandler],
    code: &mut AnnotatedCode,
    annotations: &[Annotation],
) {
    for handler in handlers {
        handler.apply(code, annotations);
    }
}

/// Lines covered by an annotation, clamped to the code.
fn lines_in<'a>(
    code: &'a mut AnnotatedCode,
    annotation: &Annotation,
) -> impl Iterator<Item = &'a mut AnnotatedLine> {
    code.lines
        .iter_mut()
        .skip(annotation.start)
        .take(
            annotation
                .end
                .saturating_add(1)
                .saturating_sub(annotation.start),
        )
}

fn for_lines(
    code: &mut AnnotatedCode,
    annotations: &[Annotation],
    name: &str,
    mut f: impl FnMut(&mut AnnotatedLine, &Annotation),
) {
    for a in annotations.iter().filter(|a| a.name == name) {
        for line in lines_in(code, a) {
            f(line, a);
        }
    }
}

/// Decorate the tokens matched by each annotation's pattern, or every token
/// of the covered lines when there is no pattern.
fn for_tokens(
    code: &mut AnnotatedCode,
    annotations: &[Annotation],
    name: &str,
    mut f: impl FnMut(&mut AnnotatedToken, &Annotation),
) {
    for a in annotations.iter().filter(|a| a.name == name) {
        for line in lines_in(code, a) {
            match &a.pattern {
                Some(pattern) => {
                    for idx in isolate_pattern(line, pattern) {
                        f(&mut line.tokens[idx], a);
                    }
                }
                None => line.tokens.iter_mut().for_each(|token| f(token, a)),
            }
        }
    }
}
