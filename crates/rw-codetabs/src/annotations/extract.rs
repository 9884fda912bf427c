//! Annotation comments embedded in code block sources.
//!
//! An annotation is a line holding only a comment whose body starts with `!`:
//!
//! ```text
//! // !mark                 next line
//! // !mark(2)              next two lines
//! # !diff(1:3) +           lines 1 to 3 after the comment
//! ;; !link[/map-get?/] https://docs.stacks.co
//! ```
//!
//! Annotation lines are removed from the code; line ranges refer to lines of
//! the cleaned code.

/// Comment prefixes recognized before `!name`.
const COMMENT_PREFIXES: &[&str] = &["//", "#", "--", ";;"];

/// Annotation names that can appear in source comments.
const ANNOTATION_NAMES: &[&str] = &[
    "mark", "tooltip", "fold", "link", "diff", "collapse", "callout", "hover",
];

/// An annotation extracted from a source comment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Annotation {
    /// Annotation name (e.g., "mark").
    pub name: String,
    /// Free text after the name and range (e.g., a URL or a color).
    pub query: String,
    /// Inline text to decorate, from `[/text/]`. `None` targets whole lines.
    pub pattern: Option<String>,
    /// First annotated line (0-based, in cleaned code).
    pub start: usize,
    /// Last annotated line, inclusive.
    pub end: usize,
}

impl Annotation {
    /// Whether `line` falls inside this annotation's range.
    #[must_use]
    pub fn covers(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

/// Strip annotation comments from `source`.
///
/// Returns the cleaned source and the annotations found, in source order.
/// Lines that look like comments but use an unknown name (a shebang,
/// `# !important`) are kept as code.
#[must_use]
pub fn extract_annotations(source: &str) -> (String, Vec<Annotation>) {
    let mut kept: Vec<&str> = Vec::new();
    let mut annotations = Vec::new();

    for line in source.lines() {
        match parse_annotation_line(line, kept.len()) {
            Some(annotation) => annotations.push(annotation),
            None => kept.push(line),
        }
    }

    if annotations.is_empty() {
        return (source.to_owned(), annotations);
    }

    let mut code = kept.join("\n");
    if source.ends_with('\n') && !code.is_empty() {
        code.push('\n');
    }
    (code, annotations)
}

/// Parse a single line as an annotation applying from line `next`.
fn parse_annotation_line(line: &str, next: usize) -> Option<Annotation> {
    let trimmed = line.trim();
    let body = COMMENT_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))?
        .trim_start()
        .strip_prefix('!')?;

    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(body.len());
    let name = &body[..name_len];
    if !ANNOTATION_NAMES.contains(&name) {
        return None;
    }
    let mut rest = &body[name_len..];

    let (mut start, mut end) = (next, next);
    if let Some(after) = rest.strip_prefix('(') {
        let close = after.find(')')?;
        let (from, to) = parse_range(&after[..close])?;
        start = next.checked_add(from)?.checked_sub(1)?;
        end = next.checked_add(to)?.checked_sub(1)?;
        rest = &after[close + 1..];
    }

    let mut pattern = None;
    if let Some(after) = rest.strip_prefix("[/") {
        let close = after.find("/]")?;
        pattern = Some(after[..close].to_owned()).filter(|p| !p.is_empty());
        rest = &after[close + 2..];
    }

    // Anything glued to the name that isn't a range or pattern (e.g. "!mark:x")
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(Annotation {
        name: name.to_owned(),
        query: rest.trim().to_owned(),
        pattern,
        start,
        end,
    })
}

/// Parse `n` or `a:b` (1-based, relative) into an inclusive range.
fn parse_range(range: &str) -> Option<(usize, usize)> {
    let (from, to) = match range.split_once(':') {
        Some((from, to)) => (from.trim().parse().ok()?, to.trim().parse().ok()?),
        None => (1, range.trim().parse().ok()?),
    };
    (from >= 1 && to >= from).then_some((from, to))
}
