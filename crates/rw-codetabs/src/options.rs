//! Rendering options toggled by code block flags.

use crate::diagnostics::{DiagnosticSink, Warning};

/// Partial set of rendering options.
///
/// Every field is tri-state: `None` means "not set" and lets a merge fall
/// through to the other operand, which is different from `Some(false)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CodeOptions {
    /// Show a copy-to-clipboard button (`c`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub copy_button: Option<bool>,
    /// Show a line number gutter (`n`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub line_numbers: Option<bool>,
    /// Soft-wrap long lines (`w`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub word_wrap: Option<bool>,
    /// Animate token changes between tabs (`a`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub animate: Option<bool>,
}

impl CodeOptions {
    /// Whether the copy button is enabled.
    #[must_use]
    pub fn copy_button(&self) -> bool {
        self.copy_button.unwrap_or(false)
    }

    /// Whether line numbers are enabled.
    #[must_use]
    pub fn line_numbers(&self) -> bool {
        self.line_numbers.unwrap_or(false)
    }

    /// Whether word wrap is enabled.
    #[must_use]
    pub fn word_wrap(&self) -> bool {
        self.word_wrap.unwrap_or(false)
    }

    /// Whether token transitions are enabled.
    #[must_use]
    pub fn animate(&self) -> bool {
        self.animate.unwrap_or(false)
    }
}

/// Map a flags token to options.
///
/// Each character is handled on its own: `c` copy button, `n` line numbers,
/// `w` word wrap, `a` animate. Unknown characters are reported to
/// `diagnostics` and skipped.
///
/// # Example
///
/// ```
/// use rw_codetabs::{TracingSink, flags_to_options};
///
/// let options = flags_to_options("na", &TracingSink);
/// assert_eq!(options.line_numbers, Some(true));
/// assert_eq!(options.animate, Some(true));
/// assert_eq!(options.copy_button, None);
/// ```
pub fn flags_to_options(flags: &str, diagnostics: &dyn DiagnosticSink) -> CodeOptions {
    let mut options = CodeOptions::default();
    for flag in flags.chars() {
        match flag {
            'c' => options.copy_button = Some(true),
            'n' => options.line_numbers = Some(true),
            'w' => options.word_wrap = Some(true),
            'a' => options.animate = Some(true),
            _ => diagnostics.warn(Warning::UnknownFlag {
                flag,
                token: flags.to_owned(),
            }),
        }
    }
    options
}

/// Merge group-level and tab-level options. Tab keys win.
#[must_use]
pub fn merge_options(group: CodeOptions, tab: CodeOptions) -> CodeOptions {
    CodeOptions {
        copy_button: tab.copy_button.or(group.copy_button),
        line_numbers: tab.line_numbers.or(group.line_numbers),
        word_wrap: tab.word_wrap.or(group.word_wrap),
        animate: tab.animate.or(group.animate),
    }
}
