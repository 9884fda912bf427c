use std::future::Future;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rw_codetabs::{
    BuildError, CollapseState, CollectingSink, DiffKind, DocumentBuilder, FailurePolicy, FileIcon,
    HighlightError, Highlighted, Highlighter, HtmlRenderer, IconResolver, TabIcon, TabSelection,
    Token, Warning,
};
use rw_tabstore::{MemoryTabStore, TabStore};

/// Splits lines on whitespace and styles the first word of each line.
struct KeywordHighlighter;

impl Highlighter for KeywordHighlighter {
    fn highlight(
        &self,
        language: &str,
        source: &str,
    ) -> impl Future<Output = Result<Highlighted, HighlightError>> + Send {
        let result = if language == "brainfuck" {
            Err(HighlightError("unsupported".to_owned()))
        } else {
            let lines = source
                .lines()
                .map(|line| match line.split_once(' ') {
                    Some((head, rest)) => vec![
                        Token {
                            content: head.to_owned(),
                            style: Some("color: #c678dd".to_owned()),
                        },
                        Token::plain(format!(" {rest}")),
                    ],
                    None => vec![Token::plain(line)],
                })
                .collect();
            Ok(Highlighted {
                language: language.to_owned(),
                lines,
                style: None,
                raw_text: source.to_owned(),
            })
        };
        // Longer sources finish first
        let delay = Duration::from_millis(100_u64.saturating_sub(source.len() as u64));
        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }
}

/// Resolves every extension to a generic icon.
struct GenericIcons;

impl IconResolver for GenericIcons {
    fn resolve_icon(&self, name_or_extension: &str) -> Option<FileIcon> {
        Some(FileIcon {
            name: name_or_extension.to_owned(),
            svg: "<svg/>".to_owned(),
            accent_color: "#888".to_owned(),
        })
    }
}

const PAGE: &str = "\
# Connect a wallet

```package-install
@stacks/connect @stacks/transactions
```

::: code-group -c storage=lang
```ts Client -n
// !mark
import { connect } from '@stacks/connect';
connect();
```

```rust Client -f client.rs
use stacks::connect;
// !diff +
connect();
```
:::
";

#[tokio::test(start_paused = true)]
async fn test_page_builds_and_renders() {
    let groups = DocumentBuilder::new(&KeywordHighlighter)
        .with_icons(&GenericIcons)
        .build(PAGE)
        .await
        .unwrap();
    assert_eq!(groups.len(), 2);

    let install = &groups[0];
    assert_eq!(
        install.tabs[3].source,
        "bun add @stacks/connect @stacks/transactions"
    );

    let lang = &groups[1];
    let ts = &lang.tabs[0];
    assert_eq!(ts.language, "ts");
    assert!(ts.options.copy_button());
    assert!(ts.options.line_numbers());
    assert_eq!(ts.code.lines[0].mark.as_deref(), Some("default"));
    assert_eq!(ts.code.lines[1].number, Some(2));
    assert_eq!(ts.code.lines[0].tokens[0].content, "import");

    let rust = &lang.tabs[1];
    assert_eq!(rust.filename, "client.rs");
    assert!(!rust.options.line_numbers());
    assert_eq!(rust.code.lines[1].diff, Some(DiffKind::Added));
    assert!(matches!(&rust.icon, TabIcon::File(icon) if icon.name == "rust"));

    let store = MemoryTabStore::new();
    store.set("lang", "Client");
    let selection = TabSelection::new(lang, &store);
    assert_eq!(selection.active_index(), 0);

    let html = HtmlRenderer::new().render(lang, Some(&selection));
    assert!(html.contains(r#"<span style="color: #c678dd">import</span>"#));
    assert!(html.contains("copy-button"));
}

#[tokio::test(start_paused = true)]
async fn test_selection_is_shared_by_storage_key() {
    let markdown = "\
```package-install
zod
```

```package-install
valibot
```
";
    let groups = DocumentBuilder::new(&KeywordHighlighter)
        .build(markdown)
        .await
        .unwrap();
    let store = MemoryTabStore::new();

    let mut first = TabSelection::new(&groups[0], &store);
    assert!(first.select("pnpm"));

    let second = TabSelection::new(&groups[1], &store);
    let active = second.active().unwrap();
    assert_eq!(active.title, "pnpm");
    assert_eq!(active.source, "pnpm add valibot");
}

#[tokio::test(start_paused = true)]
async fn test_failure_policy() {
    let markdown = "\
::: code-group
```ts Good
ok
```
```brainfuck Bad
+[-]
```
:::
";
    let err = DocumentBuilder::new(&KeywordHighlighter)
        .build(markdown)
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::Highlight { ref title, .. } if title == "Bad"));

    let sink = CollectingSink::new();
    let groups = DocumentBuilder::new(&KeywordHighlighter)
        .with_diagnostics(&sink)
        .with_failure_policy(FailurePolicy::IsolateTab)
        .build(markdown)
        .await
        .unwrap();
    assert_eq!(groups[0].tabs[1].highlighted.raw_text, "+[-]\n");
    assert!(matches!(
        sink.warnings().as_slice(),
        [Warning::HighlightFallback { language, .. }] if language == "brainfuck"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_long_block_collapse_state() {
    let body: String = (0..15).map(|n| format!("step {n}\n")).collect();
    let markdown = format!("```sh Steps\n{body}```\n");
    let groups = DocumentBuilder::new(&KeywordHighlighter)
        .build(&markdown)
        .await
        .unwrap();

    let lines = groups[0].tabs[0].code.line_count();
    assert_eq!(lines, 15);
    let state = CollapseState::for_lines(lines, 10);
    assert_eq!(state.label().as_deref(), Some("Show 5 more lines"));
    assert_eq!(state.toggle().label().as_deref(), Some("Show less"));
}
