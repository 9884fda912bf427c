//! Code section extraction from Markdown.
//!
//! Fenced code blocks are found with pulldown-cmark. Code groups are declared
//! with a container directive wrapping the blocks that become its tabs:
//!
//! ````markdown
//! ::: code-group -c storage=lang
//! ```ts Client -n
//! connect();
//! ```
//! ```python Client
//! connect()
//! ```
//! :::
//! ````
//!
//! Containers are found with a line scanner that skips fenced code, so a
//! `:::` inside a code block is never taken as a marker. Other `:::`
//! directives inside a group (admonitions, details) are kept as group content.

mod fence;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::block::RawCodeBlock;
use crate::error::BuildError;

use self::fence::FenceTracker;

/// Directive name of a code group container.
pub const CODE_GROUP_DIRECTIVE: &str = "code-group";

/// Fence language of a package install block.
pub const INSTALL_LANGUAGE: &str = "package-install";

/// A unit of code found in a document, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeSection {
    /// A code block outside any group.
    Single(RawCodeBlock),
    /// Blocks inside a `::: code-group` container.
    Group {
        blocks: Vec<RawCodeBlock>,
        /// Flags from the container line with dashes removed (`-c -n` gives "cn").
        flags: Option<String>,
        /// Value of `storage=` on the container line.
        storage_key: Option<String>,
    },
    /// A `package-install` block outside any group.
    Install(RawCodeBlock),
}

/// Parsed `:::` line.
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    Open { name: &'a str, args: &'a str },
    Close,
}

fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let trimmed = line.trim();
    let colons = trimmed.chars().take_while(|&c| c == ':').count();
    if colons < 3 {
        return None;
    }
    let rest = trimmed[colons..].trim();
    if rest.is_empty() {
        return Some(Directive::Close);
    }
    let (name, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, args)| (name, args.trim()));
    Some(Directive::Open { name, args })
}

/// Group being collected.
struct OpenGroup {
    line: usize,
    flags: Option<String>,
    storage_key: Option<String>,
    body: String,
    /// Nested non-group directives still open.
    depth: usize,
}

impl OpenGroup {
    fn new(line: usize, args: &str) -> Self {
        let mut flags = String::new();
        let mut storage_key = None;
        for token in args.split_whitespace() {
            if let Some(key) = token.strip_prefix("storage=") {
                storage_key = Some(key.to_owned()).filter(|k| !k.is_empty());
            } else if let Some(token_flags) = token.strip_prefix('-') {
                flags.push_str(token_flags);
            } else {
                tracing::debug!(line, token, "Ignoring code-group argument");
            }
        }
        Self {
            line,
            flags: Some(flags).filter(|f| !f.is_empty()),
            storage_key,
            body: String::new(),
            depth: 0,
        }
    }

    fn finish(self) -> Result<CodeSection, BuildError> {
        let blocks = fenced_blocks(&self.body);
        if blocks.is_empty() {
            return Err(BuildError::NoCodeBlocks {
                component: CODE_GROUP_DIRECTIVE.to_owned(),
            });
        }
        Ok(CodeSection::Group {
            blocks,
            flags: self.flags,
            storage_key: self.storage_key,
        })
    }
}

/// Extract code sections from a Markdown document.
///
/// # Errors
///
/// - [`BuildError::NoCodeBlocks`] for a code group without fenced blocks
/// - [`BuildError::Structure`] for a nested or unclosed code group
///
/// # Example
///
/// ```
/// use rw_codetabs::{CodeSection, extract_sections};
///
/// let sections = extract_sections("```package-install\nzod\n```\n").unwrap();
/// assert!(matches!(&sections[..], [CodeSection::Install(block)] if block.source == "zod\n"));
/// ```
pub fn extract_sections(markdown: &str) -> Result<Vec<CodeSection>, BuildError> {
    let mut sections = Vec::new();
    let mut fence = FenceTracker::default();
    let mut outside = String::new();
    let mut group: Option<OpenGroup> = None;

    for (idx, line) in markdown.lines().enumerate() {
        let line_no = idx + 1;
        let directive = if fence.in_fence() {
            None
        } else {
            parse_directive(line)
        };
        fence.observe(line);

        match (directive, group.as_mut()) {
            (Some(Directive::Open { name, args }), None) if name == CODE_GROUP_DIRECTIVE => {
                push_loose_blocks(&mut sections, &outside);
                outside.clear();
                group = Some(OpenGroup::new(line_no, args));
                continue;
            }
            (Some(Directive::Open { name, .. }), Some(open)) => {
                if name == CODE_GROUP_DIRECTIVE {
                    return Err(BuildError::Structure {
                        component: CODE_GROUP_DIRECTIVE.to_owned(),
                        message: format!(
                            "nested code-group at line {line_no} (outer opened at line {})",
                            open.line
                        ),
                    });
                }
                open.depth += 1;
            }
            (Some(Directive::Close), Some(open)) => {
                if open.depth == 0 {
                    if let Some(open) = group.take() {
                        sections.push(open.finish()?);
                    }
                    continue;
                }
                open.depth -= 1;
            }
            _ => {}
        }

        let buffer = match group.as_mut() {
            Some(open) => &mut open.body,
            None => &mut outside,
        };
        buffer.push_str(line);
        buffer.push('\n');
    }

    if let Some(open) = group {
        return Err(BuildError::Structure {
            component: CODE_GROUP_DIRECTIVE.to_owned(),
            message: format!("code-group opened at line {} is never closed", open.line),
        });
    }
    push_loose_blocks(&mut sections, &outside);

    tracing::debug!(sections = sections.len(), "Extracted code sections");
    Ok(sections)
}

fn push_loose_blocks(sections: &mut Vec<CodeSection>, markdown: &str) {
    sections.extend(fenced_blocks(markdown).into_iter().map(|block| {
        if block.language == INSTALL_LANGUAGE {
            CodeSection::Install(block)
        } else {
            CodeSection::Single(block)
        }
    }));
}

/// Fenced code blocks of a Markdown fragment. Indented blocks are skipped.
fn fenced_blocks(markdown: &str) -> Vec<RawCodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some((info.into_string(), String::new()));
            }
            Event::Text(text) => {
                if let Some((_, source)) = current.as_mut() {
                    source.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, source)) = current.take() {
                    blocks.push(RawCodeBlock::from_info(&info, source));
                }
            }
            _ => {}
        }
    }
    blocks
}
