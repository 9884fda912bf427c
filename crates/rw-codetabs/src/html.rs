//! HTML output for code groups.
//!
//! Tabbed groups follow the WAI-ARIA tabs pattern:
//!
//! ```html
//! <div class="code-group" id="code-group-0" data-storage-key="lang">
//!   <div class="code-group-tabs" role="tablist">
//!     <button role="tab" id="code-tab-0-0" aria-controls="code-panel-0-0"
//!             aria-selected="true" tabindex="0">Client</button>
//!     <button role="tab" id="code-tab-0-1" aria-controls="code-panel-0-1"
//!             aria-selected="false" tabindex="-1">Server</button>
//!   </div>
//!   <div role="tabpanel" id="code-panel-0-0" aria-labelledby="code-tab-0-0">...</div>
//!   <div role="tabpanel" id="code-panel-0-1" aria-labelledby="code-tab-0-1" hidden>...</div>
//! </div>
//! ```
//!
//! Single-tab groups render the code block alone, with a title bar when the
//! tab has a label other than its language.

use crate::annotations::{AnnotatedLine, AnnotatedToken, CollapseRole, DiffKind};
use crate::group::{CodeGroup, TabDescriptor};
use crate::icons::TabIcon;
use crate::view::{CollapseState, DEFAULT_COLLAPSE_THRESHOLD, GroupLayout, TabSelection};

/// Renders [`CodeGroup`]s to HTML.
///
/// Element ids are numbered per renderer, so one renderer should be used for
/// a whole page.
#[derive(Debug)]
pub struct HtmlRenderer {
    collapse_threshold: usize,
    next_group: usize,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            next_group: 0,
        }
    }
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines shown before a block gets a collapse toggle.
    #[must_use]
    pub fn with_collapse_threshold(mut self, threshold: usize) -> Self {
        self.collapse_threshold = threshold;
        self
    }

    /// Render `group` with the tab chosen by `selection` active.
    ///
    /// Single-tab groups ignore `selection`. Tabbed groups without one open on
    /// their first tab.
    pub fn render(
        &mut self,
        group: &CodeGroup,
        selection: Option<&TabSelection<'_>>,
    ) -> String {
        let group_id = self.next_group;
        self.next_group += 1;

        let mut out = String::with_capacity(1024);
        out.push_str(&format!(r#"<div class="code-group" id="code-group-{group_id}""#));
        if let Some(key) = &group.storage_key {
            out.push_str(&format!(r#" data-storage-key="{}""#, escape_html(key)));
        }
        out.push('>');

        match group.layout() {
            GroupLayout::Single => {
                if let Some(tab) = group.tabs.first() {
                    if tab.label() != tab.language {
                        out.push_str(r#"<div class="code-title">"#);
                        push_icon(&tab.icon, &mut out);
                        out.push_str(&escape_html(tab.label()));
                        out.push_str("</div>");
                    }
                    self.push_block(tab, &mut out);
                }
            }
            GroupLayout::Tabbed => {
                let active = selection.map_or(0, TabSelection::active_index);

                out.push_str(r#"<div class="code-group-tabs" role="tablist">"#);
                for (idx, tab) in group.tabs.iter().enumerate() {
                    let selected = idx == active;
                    out.push_str(&format!(
                        r#"<button role="tab" id="code-tab-{group_id}-{idx}" aria-controls="code-panel-{group_id}-{idx}" aria-selected="{selected}" tabindex="{}" data-title="{}">"#,
                        if selected { "0" } else { "-1" },
                        escape_html(&tab.title),
                    ));
                    push_icon(&tab.icon, &mut out);
                    out.push_str(&escape_html(tab.label()));
                    out.push_str("</button>");
                }
                out.push_str("</div>");

                for (idx, tab) in group.tabs.iter().enumerate() {
                    let hidden = if idx == active { "" } else { " hidden" };
                    out.push_str(&format!(
                        r#"<div role="tabpanel" id="code-panel-{group_id}-{idx}" aria-labelledby="code-tab-{group_id}-{idx}"{hidden}>"#
                    ));
                    self.push_block(tab, &mut out);
                    out.push_str("</div>");
                }
            }
        }

        out.push_str("</div>");
        out
    }

    fn push_block(&self, tab: &TabDescriptor, out: &mut String) {
        let line_count = tab.code.line_count();
        let collapse = CollapseState::for_lines(line_count, self.collapse_threshold);
        let visible = collapse.visible_lines(line_count);

        out.push_str(&format!(
            r#"<div class="code-block" data-language="{}""#,
            escape_html(&tab.language)
        ));
        if collapse.is_collapsed() {
            out.push_str(" data-collapsed");
        }
        out.push('>');

        if tab.options.copy_button() {
            out.push_str(&format!(
                r#"<button class="copy-button" type="button" aria-label="Copy code" data-code="{}"></button>"#,
                escape_html(&tab.source)
            ));
        }

        let pre_class = if tab.options.word_wrap() {
            "code wrap"
        } else {
            "code"
        };
        out.push_str(&format!(r#"<pre class="{pre_class}"><code>"#));
        for (idx, line) in tab.code.lines.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            push_line(line, idx >= visible, out);
        }
        out.push_str("</code></pre>");

        if let Some(label) = collapse.label() {
            out.push_str(&format!(
                r#"<button class="collapse-toggle" type="button" aria-expanded="false">{}</button>"#,
                escape_html(&label)
            ));
        }
        out.push_str("</div>");
    }
}

fn push_icon(icon: &TabIcon, out: &mut String) {
    match icon {
        TabIcon::Builtin { icon } => {
            out.push_str(&format!(
                r#"<span class="tab-icon" data-icon="{}" aria-hidden="true"></span>"#,
                icon.name()
            ));
        }
        TabIcon::File(file) => {
            // Registry SVG is trusted markup.
            out.push_str(&format!(
                r#"<span class="tab-icon" style="color: {}" aria-hidden="true">{}</span>"#,
                escape_html(&file.accent_color),
                file.svg
            ));
        }
        TabIcon::None => {}
    }
}

fn push_line(line: &AnnotatedLine, hidden: bool, out: &mut String) {
    let mut classes = vec!["line"];
    if line.mark.is_some() {
        classes.push("marked");
    }
    match line.diff {
        Some(DiffKind::Added) => classes.push("diff-added"),
        Some(DiffKind::Removed) => classes.push("diff-removed"),
        None => {}
    }
    if line.folded {
        classes.push("folded");
    }
    if let Some(collapse) = &line.collapse {
        classes.push(match collapse.role {
            CollapseRole::Trigger => "collapse-trigger",
            CollapseRole::Region | CollapseRole::Content => "collapse-content",
        });
    }

    out.push_str(&format!(r#"<span class="{}""#, classes.join(" ")));
    if let Some(mark) = &line.mark {
        out.push_str(&format!(r#" data-mark="{}""#, escape_html(mark)));
    }
    if let Some(collapse) = &line.collapse {
        out.push_str(&format!(r#" data-region="{}""#, collapse.region));
        if collapse.collapsed && collapse.role != CollapseRole::Trigger {
            out.push_str(" data-region-collapsed");
        }
    }
    if hidden {
        out.push_str(" hidden");
    }
    out.push('>');

    if let Some(number) = line.number {
        out.push_str(&format!(r#"<span class="line-number">{number}</span>"#));
    }
    if let Some(diff) = line.diff {
        out.push_str(&format!(r#"<span class="diff-symbol">{}</span>"#, diff.symbol()));
    }
    for token in &line.tokens {
        push_token(token, out);
    }
    for callout in &line.callouts {
        out.push_str(&format!(
            r#"<span class="callout">{}</span>"#,
            escape_html(callout)
        ));
    }
    out.push_str("</span>");
}

fn push_token(token: &AnnotatedToken, out: &mut String) {
    let content = escape_html(&token.content);
    let decorated = token.style.is_some()
        || token.tooltip.is_some()
        || token.hover.is_some()
        || token.transition_key.is_some();

    if let Some(link) = &token.link {
        out.push_str(&format!(r#"<a href="{}">"#, escape_html(link)));
    }
    if decorated {
        out.push_str("<span");
        if let Some(style) = &token.style {
            out.push_str(&format!(r#" style="{}""#, escape_html(style)));
        }
        if let Some(tooltip) = &token.tooltip {
            out.push_str(&format!(r#" title="{}""#, escape_html(tooltip)));
        }
        if let Some(hover) = &token.hover {
            out.push_str(&format!(r#" data-hover="{}""#, escape_html(hover)));
        }
        if let Some(key) = &token.transition_key {
            out.push_str(&format!(r#" data-key="{}""#, escape_html(key)));
        }
        out.push('>');
        out.push_str(&content);
        out.push_str("</span>");
    } else {
        out.push_str(&content);
    }
    if token.link.is_some() {
        out.push_str("</a>");
    }
}

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotatedCode;
    use crate::block::RawCodeBlock;
    use crate::group::TabGroupBuilder;
    use crate::highlight::PlainHighlighter;
    use rw_tabstore::{MemoryTabStore, NullTabStore, TabStore};

    async fn build(blocks: &[RawCodeBlock], flags: Option<&str>, key: Option<&str>) -> CodeGroup {
        TabGroupBuilder::new(&PlainHighlighter)
            .build_group(blocks, flags, key)
            .await
            .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[tokio::test]
    async fn test_tabbed_group_aria() {
        let group = build(
            &[
                RawCodeBlock::new("ts", "Client", "connect();"),
                RawCodeBlock::new("text", "Server", "serve()"),
            ],
            None,
            Some("lang"),
        )
        .await;
        let html = HtmlRenderer::new()
            .render(&group, Some(&TabSelection::new(&group, &NullTabStore)));

        assert!(html.starts_with(r#"<div class="code-group" id="code-group-0" data-storage-key="lang">"#));
        assert!(html.contains(r#"<div class="code-group-tabs" role="tablist">"#));
        assert!(html.contains(
            r#"<button role="tab" id="code-tab-0-0" aria-controls="code-panel-0-0" aria-selected="true" tabindex="0" data-title="Client">"#
        ));
        assert!(html.contains(
            r#"<button role="tab" id="code-tab-0-1" aria-controls="code-panel-0-1" aria-selected="false" tabindex="-1" data-title="Server">Server</button>"#
        ));
        assert!(html.contains(
            r#"<div role="tabpanel" id="code-panel-0-0" aria-labelledby="code-tab-0-0">"#
        ));
        assert!(html.contains(
            r#"<div role="tabpanel" id="code-panel-0-1" aria-labelledby="code-tab-0-1" hidden>"#
        ));
        assert!(html.contains(r#"data-icon="typescript""#));
    }

    #[tokio::test]
    async fn test_stored_selection_is_active() {
        let store = MemoryTabStore::new();
        store.set("lang", "Server");
        let group = build(
            &[
                RawCodeBlock::new("ts", "Client", "a"),
                RawCodeBlock::new("go", "Server", "b"),
            ],
            None,
            Some("lang"),
        )
        .await;
        let html = HtmlRenderer::new().render(&group, Some(&TabSelection::new(&group, &store)));
        assert!(html.contains(r#"id="code-tab-0-1" aria-controls="code-panel-0-1" aria-selected="true""#));
        assert!(html.contains(r#"aria-labelledby="code-tab-0-0" hidden>"#));
    }

    #[tokio::test]
    async fn test_group_ids_increment() {
        let group = build(&[RawCodeBlock::new("rust", "", "x")], None, None).await;
        let selection = TabSelection::new(&group, &NullTabStore);
        let mut renderer = HtmlRenderer::new();
        assert!(renderer.render(&group, Some(&selection)).contains(r#"id="code-group-0""#));
        assert!(renderer.render(&group, Some(&selection)).contains(r#"id="code-group-1""#));
    }

    #[tokio::test]
    async fn test_single_block_without_tabs() {
        let group = build(&[RawCodeBlock::new("rust", "-cn -f main.rs", "fn main() {}")], None, None).await;
        let html = HtmlRenderer::new().render(&group, None);

        assert!(!html.contains("role=\"tablist\""));
        assert!(html.contains(r#"<div class="code-title">"#));
        assert!(html.contains("main.rs</div>"));
        assert!(html.contains(r#"<button class="copy-button" type="button" aria-label="Copy code" data-code="fn main() {}"></button>"#));
        assert!(html.contains(
            r#"<span class="line"><span class="line-number">1</span>fn main() {}</span>"#
        ));
    }

    #[tokio::test]
    async fn test_untitled_single_block_has_no_title_bar() {
        let group = build(&[RawCodeBlock::new("rust", "", "x")], None, None).await;
        let html = HtmlRenderer::new().render(&group, None);
        assert!(!html.contains("code-title"));
        assert!(!html.contains("copy-button"));
    }

    #[tokio::test]
    async fn test_tabbed_group_without_selection_opens_first_tab() {
        let group = build(
            &[
                RawCodeBlock::new("ts", "Client", "connect();"),
                RawCodeBlock::new("text", "Server", "serve()"),
            ],
            None,
            None,
        )
        .await;
        let html = HtmlRenderer::new().render(&group, None);

        assert!(html.contains(r#"aria-selected="true" tabindex="0" data-title="Client""#));
        assert!(html.contains(r#"id="code-panel-0-1" aria-labelledby="code-tab-0-1" hidden>"#));
    }

    #[tokio::test]
    async fn test_diff_and_mark_classes() {
        let group = build(
            &[RawCodeBlock::new(
                "js",
                "",
                "// !mark\nlet a = 1;\n// !diff -\nlet b = 2;",
            )],
            None,
            None,
        )
        .await;
        let html = HtmlRenderer::new().render(&group, None);
        assert!(html.contains(r#"<span class="line marked""#));
        assert!(html.contains(
            r#"<span class="line diff-removed"><span class="diff-symbol">-</span>let b = 2;</span>"#
        ));
    }

    #[tokio::test]
    async fn test_long_block_collapses() {
        let source = (1..=12).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let group = build(&[RawCodeBlock::new("text", "", source)], None, None).await;
        let html = HtmlRenderer::new().render(&group, None);

        assert!(html.contains(r#"data-collapsed>"#));
        assert!(html.contains(r#"<span class="line">line 10</span>"#));
        assert!(html.contains(r#"<span class="line" hidden>line 11</span>"#));
        assert!(html.contains(
            r#"<button class="collapse-toggle" type="button" aria-expanded="false">Show 2 more lines</button>"#
        ));

        let mut relaxed = HtmlRenderer::new().with_collapse_threshold(20);
        let html = relaxed.render(&group, None);
        assert!(!html.contains("collapse-toggle"));
    }

    #[test]
    fn test_token_decorations() {
        let mut out = String::new();
        push_token(
            &AnnotatedToken {
                content: "<T>".to_owned(),
                link: Some("https://example.com/?a=1&b=2".to_owned()),
                tooltip: Some("generic".to_owned()),
                ..AnnotatedToken::default()
            },
            &mut out,
        );
        assert_eq!(
            out,
            r#"<a href="https://example.com/?a=1&amp;b=2"><span title="generic">&lt;T&gt;</span></a>"#
        );
    }

    #[test]
    fn test_word_wrap_class() {
        let mut tab = TabDescriptor {
            title: String::new(),
            filename: String::new(),
            language: "text".to_owned(),
            options: crate::options::CodeOptions {
                word_wrap: Some(true),
                ..Default::default()
            },
            highlighted: crate::highlight::Highlighted::default(),
            code: AnnotatedCode::default(),
            icon: TabIcon::None,
            source: String::new(),
        };
        let mut out = String::new();
        HtmlRenderer::new().push_block(&tab, &mut out);
        assert!(out.contains(r#"<pre class="code wrap">"#));

        tab.options.word_wrap = None;
        out.clear();
        HtmlRenderer::new().push_block(&tab, &mut out);
        assert!(out.contains(r#"<pre class="code">"#));
    }
}
