//! Fence state for the container scanner.
//!
//! `:::` lines inside a fenced code block are code, not container markers.

/// An open code fence: marker character and run length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Parse an opening fence (three or more backticks or tildes).
    fn open(trimmed: &str) -> Option<Self> {
        let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = run_length(trimmed, marker);
        (len >= 3).then_some(Self { marker, len })
    }

    /// Whether `trimmed` closes this fence.
    ///
    /// Same marker, at least as long, nothing but whitespace after the run.
    fn closed_by(self, trimmed: &str) -> bool {
        let len = run_length(trimmed, self.marker);
        len >= self.len && trimmed[len * self.marker.len_utf8()..].trim().is_empty()
    }
}

fn run_length(s: &str, marker: char) -> usize {
    s.chars().take_while(|&c| c == marker).count()
}

/// Tracks whether a line-by-line scan is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line, opening or closing a fence as needed.
    pub(crate) fn observe(&mut self, line: &str) {
        let trimmed = line.trim_start();
        self.open = match self.open {
            Some(fence) if fence.closed_by(trimmed) => None,
            Some(fence) => Some(fence),
            None => Fence::open(trimmed),
        };
    }
}
