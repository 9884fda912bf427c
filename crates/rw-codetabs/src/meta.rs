//! Code block metadata parsing.
//!
//! The metadata is whatever follows the language in a fence info string:
//!
//! ```text
//! ```ts Server setup -nc -f server.ts
//!       ^^^^^^^^^^^^ ^^^ ^^^^^^^^^^^^
//!       title        flags filename
//! ```
//!
//! Flags and filename are found by two independent scans of the original
//! string; the title is what remains after removing both matches.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// First `-<word>` run. ASCII word characters only.
static FLAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-([A-Za-z0-9_]+)").unwrap());

/// First `-f <name>` run.
static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-f\s+(\S+)").unwrap());

/// Result of parsing a code block metadata string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedMeta {
    /// Display title (metadata minus flags and filename, trimmed).
    pub title: String,
    /// Flag characters without the leading dash (e.g., "nc").
    pub flags: String,
    /// Filename given with `-f`.
    pub filename: String,
}

/// Parse a metadata string into title, flags token and filename.
///
/// Never fails: missing parts come back as empty strings.
///
/// The flags scan takes the first `-<word>` run anywhere in the string, so a
/// `-f <name>` that comes before the real flags is itself picked up as the
/// flags token `"f"` (which the options resolver then reports as unknown).
/// A `-f <name>` that is the only dash run in the string is not treated as
/// flags.
///
/// # Example
///
/// ```
/// use rw_codetabs::parse_meta;
///
/// let meta = parse_meta("Server -nc -f server.ts");
/// assert_eq!(meta.title, "Server");
/// assert_eq!(meta.flags, "nc");
/// assert_eq!(meta.filename, "server.ts");
/// ```
#[must_use]
pub fn parse_meta(metadata: &str) -> ParsedMeta {
    let filename = FILENAME_RE.captures(metadata);
    let filename_span = filename.as_ref().and_then(|c| c.get(0)).map(|m| m.range());

    let flags = FLAGS_RE.captures(metadata).filter(|caps| {
        let span = caps.get(0).map(|m| m.range());
        !is_lone_filename_marker(metadata, span, filename_span.as_ref())
    });
    let flags_span = flags.as_ref().and_then(|c| c.get(0)).map(|m| m.range());

    let mut spans: Vec<Range<usize>> = flags_span.into_iter().chain(filename_span).collect();
    let title = remove_spans(metadata, &mut spans).trim().to_owned();

    ParsedMeta {
        title,
        flags: capture_text(flags.as_ref()),
        filename: capture_text(filename.as_ref()),
    }
}

fn capture_text(caps: Option<&regex::Captures<'_>>) -> String {
    caps.and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

/// Whether the flags match is just the `-f` of the filename with no other
/// dash run anywhere outside the filename.
fn is_lone_filename_marker(
    metadata: &str,
    flags_span: Option<Range<usize>>,
    filename_span: Option<&Range<usize>>,
) -> bool {
    let (Some(flags_span), Some(filename_span)) = (flags_span, filename_span) else {
        return false;
    };
    flags_span.start == filename_span.start
        && FLAGS_RE.find_iter(metadata).all(|m| {
            m.start() >= filename_span.start && m.end() <= filename_span.end
        })
}

/// Remove byte ranges from `s`, tolerating overlap.
fn remove_spans(s: &str, spans: &mut [Range<usize>]) -> String {
    spans.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(s.len());
    let mut pos = 0;
    for span in spans.iter() {
        if span.start > pos {
            out.push_str(&s[pos..span.start]);
        }
        pos = pos.max(span.end);
    }
    out.push_str(&s[pos..]);
    out
}
