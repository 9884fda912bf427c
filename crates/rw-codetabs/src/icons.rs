//! Tab icons.
//!
//! A handful of languages get a fixed builtin icon. Everything else goes
//! through an [`IconResolver`] keyed by file extension.

/// Icons drawn by the renderer itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BuiltinIcon {
    Clarity,
    Terminal,
    Json,
    TypeScript,
    Python,
}

impl BuiltinIcon {
    /// Builtin icon for a language tag.
    #[must_use]
    pub fn for_language(language: &str) -> Option<Self> {
        match language {
            "clarity" => Some(Self::Clarity),
            "bash" | "sh" | "shell" | "terminal" => Some(Self::Terminal),
            "json" => Some(Self::Json),
            "typescript" | "ts" => Some(Self::TypeScript),
            "python" | "py" => Some(Self::Python),
            _ => None,
        }
    }

    /// Lowercase icon name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::Terminal => "terminal",
            Self::Json => "json",
            Self::TypeScript => "typescript",
            Self::Python => "python",
        }
    }
}

/// Icon markup returned by an [`IconResolver`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileIcon {
    /// Registry key that matched.
    pub name: String,
    /// Inline SVG markup.
    pub svg: String,
    /// Accent color (CSS).
    pub accent_color: String,
}

/// Icon chosen for a tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum TabIcon {
    Builtin {
        icon: BuiltinIcon,
    },
    File(FileIcon),
    #[default]
    None,
}

/// Looks up icons by file name or extension.
pub trait IconResolver: Send + Sync {
    /// Resolve an icon, `None` on a miss.
    fn resolve_icon(&self, name_or_extension: &str) -> Option<FileIcon>;
}

/// Resolve the icon for a tab.
///
/// Builtin languages win. Otherwise the lookup key is the extension of
/// `title` when it contains a dot, else the language tag itself.
pub fn resolve_tab_icon(language: &str, title: &str, resolver: &dyn IconResolver) -> TabIcon {
    if let Some(icon) = BuiltinIcon::for_language(language) {
        return TabIcon::Builtin { icon };
    }
    let key = match title.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => language,
    };
    if key.is_empty() {
        return TabIcon::None;
    }
    resolver.resolve_icon(key).map_or(TabIcon::None, TabIcon::File)
}

/// Accent color and glyph label for one registry entry.
struct IconSpec {
    accent: &'static str,
    label: &'static str,
}

/// Registry keys follow several naming conventions; lookups probe them
/// through [`candidate_keys`].
const REGISTRY: &[(&str, IconSpec)] = &[
    ("rs", IconSpec { accent: "#dea584", label: "RS" }),
    ("RustIcon", IconSpec { accent: "#dea584", label: "RS" }),
    ("js", IconSpec { accent: "#f1e05a", label: "JS" }),
    ("JavascriptIcon", IconSpec { accent: "#f1e05a", label: "JS" }),
    ("jsx", IconSpec { accent: "#61dafb", label: "JSX" }),
    ("tsx", IconSpec { accent: "#3178c6", label: "TSX" }),
    ("Toml", IconSpec { accent: "#9c4221", label: "TOML" }),
    ("YamlIcon", IconSpec { accent: "#cb171e", label: "YML" }),
    ("yml", IconSpec { accent: "#cb171e", label: "YML" }),
    ("md", IconSpec { accent: "#083fa1", label: "MD" }),
    ("MarkdownIcon", IconSpec { accent: "#083fa1", label: "MD" }),
    ("go", IconSpec { accent: "#00add8", label: "GO" }),
    ("html", IconSpec { accent: "#e34c26", label: "HTML" }),
    ("css", IconSpec { accent: "#563d7c", label: "CSS" }),
    ("Solidity", IconSpec { accent: "#aa6746", label: "SOL" }),
    ("sql", IconSpec { accent: "#e38c00", label: "SQL" }),
    ("Dockerfile", IconSpec { accent: "#384d54", label: "DOCK" }),
    ("env", IconSpec { accent: "#ecd53f", label: "ENV" }),
];

/// Keys to try, in order: exact, `<name>Icon`, capitalized, capitalized `Icon`.
fn candidate_keys(name: &str) -> Vec<String> {
    let mut chars = name.chars();
    let capitalized = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    });
    let suffixed = format!("{capitalized}Icon");

    let mut keys: Vec<String> = Vec::with_capacity(4);
    for key in [name.to_owned(), format!("{name}Icon"), capitalized, suffixed] {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Static extension-to-icon registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticIconRegistry;

impl IconResolver for StaticIconRegistry {
    fn resolve_icon(&self, name_or_extension: &str) -> Option<FileIcon> {
        candidate_keys(name_or_extension).into_iter().find_map(|key| {
            REGISTRY
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(name, spec)| FileIcon {
                    name: (*name).to_owned(),
                    svg: file_glyph(spec),
                    accent_color: spec.accent.to_owned(),
                })
        })
    }
}

fn file_glyph(spec: &IconSpec) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16" width="16" height="16"><path d="M3 1h7l3 3v11H3z" fill="none" stroke="{accent}"/><text x="8" y="12" font-size="4" text-anchor="middle" fill="{accent}">{label}</text></svg>"#,
        accent = spec.accent,
        label = spec.label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_languages() {
        assert_eq!(
            resolve_tab_icon("clarity", "counter.clar", &StaticIconRegistry),
            TabIcon::Builtin {
                icon: BuiltinIcon::Clarity
            }
        );
        assert_eq!(
            resolve_tab_icon("bash", "", &StaticIconRegistry),
            TabIcon::Builtin {
                icon: BuiltinIcon::Terminal
            }
        );
        assert_eq!(
            BuiltinIcon::for_language("python"),
            Some(BuiltinIcon::Python)
        );
        assert_eq!(BuiltinIcon::for_language("json"), Some(BuiltinIcon::Json));
        assert_eq!(
            BuiltinIcon::for_language("typescript"),
            Some(BuiltinIcon::TypeScript)
        );
        assert_eq!(BuiltinIcon::for_language("rust"), None);
    }

    #[test]
    fn test_candidate_keys_order() {
        assert_eq!(
            candidate_keys("toml"),
            vec!["toml", "tomlIcon", "Toml", "TomlIcon"]
        );
        assert_eq!(candidate_keys("Go"), vec!["Go", "GoIcon"]);
    }

    #[test]
    fn test_resolves_through_each_convention() {
        let registry = StaticIconRegistry;
        assert_eq!(registry.resolve_icon("rs").unwrap().name, "rs");
        assert_eq!(registry.resolve_icon("javascript").unwrap().name, "JavascriptIcon");
        assert_eq!(registry.resolve_icon("toml").unwrap().name, "Toml");
        assert_eq!(registry.resolve_icon("yaml").unwrap().name, "YamlIcon");
        assert!(registry.resolve_icon("nope").is_none());
    }

    #[test]
    fn test_title_extension_wins_over_language() {
        let icon = resolve_tab_icon("text", "Cargo.toml", &StaticIconRegistry);
        match icon {
            TabIcon::File(file) => {
                assert_eq!(file.name, "Toml");
                assert_eq!(file.accent_color, "#9c4221");
                assert!(file.svg.contains("TOML"));
            }
            other => panic!("expected file icon, got {other:?}"),
        }
    }

    #[test]
    fn test_language_used_when_title_has_no_dot() {
        let icon = resolve_tab_icon("go", "Server", &StaticIconRegistry);
        assert!(matches!(icon, TabIcon::File(f) if f.name == "go"));
    }

    #[test]
    fn test_miss_is_none() {
        assert_eq!(
            resolve_tab_icon("brainfuck", "", &StaticIconRegistry),
            TabIcon::None
        );
        assert_eq!(resolve_tab_icon("", "", &StaticIconRegistry), TabIcon::None);
    }
}
