//! Configuration for RW code tabs.
//!
//! Parses `codetabs.toml` with serde and discovers it in the current
//! directory or any parent. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ```toml
//! [code]
//! flags = "c"               # default flags for groups that declare none
//! collapse_threshold = 10   # lines shown before a block collapses
//! isolate_failures = false  # render failed highlights as plain text
//!
//! [store]
//! path = "${XDG_STATE_HOME:-.rw}/tabs.json"
//! ```
//!
//! `code.flags` and `store.path` support `${VAR}` and `${VAR:-default}`
//! expansion. Relative store paths resolve against the config file directory.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "codetabs.toml";

/// Flag characters accepted in `code.flags`.
const KNOWN_FLAGS: &str = "cnwa";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub flags: Option<String>,
    pub collapse_threshold: Option<usize>,
    pub isolate_failures: Option<bool>,
    pub store_path: Option<PathBuf>,
}

/// Code tabs configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering defaults.
    pub code: CodeConfig,
    /// Tab store location as written in TOML.
    store: StoreConfigRaw,

    /// Resolved tab store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Rendering defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Flags for groups and blocks that declare none. A leading dash is allowed.
    pub flags: String,
    /// Lines shown before a long block gets a collapse toggle.
    pub collapse_threshold: usize,
    /// Render a tab as plain text when highlighting fails instead of failing
    /// its group.
    pub isolate_failures: bool,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            flags: String::new(),
            collapse_threshold: 10,
            isolate_failures: false,
        }
    }
}

impl CodeConfig {
    /// Flags without the leading dash.
    #[must_use]
    pub fn flag_chars(&self) -> &str {
        self.flags.trim().trim_start_matches('-')
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    path: Option<String>,
}

/// Resolved tab store configuration.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// JSON file holding tab selections.
    pub path: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`store.path`").
        field: String,
        message: String,
    },
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// Uses `config_path` when given, otherwise the nearest `codetabs.toml`
    /// in the current directory or its parents, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(flags) = &settings.flags {
            self.code.flags.clone_from(flags);
        }
        if let Some(threshold) = settings.collapse_threshold {
            self.code.collapse_threshold = threshold;
        }
        if let Some(isolate) = settings.isolate_failures {
            self.code.isolate_failures = isolate;
        }
        if let Some(path) = &settings.store_path {
            self.store_resolved.path.clone_from(path);
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(flag) = self
            .code
            .flag_chars()
            .chars()
            .find(|c| !KNOWN_FLAGS.contains(*c))
        {
            return Err(ConfigError::Validation(format!(
                "code.flags contains unknown flag '{flag}' (expected any of \"{KNOWN_FLAGS}\")"
            )));
        }
        if self.code.collapse_threshold == 0 {
            return Err(ConfigError::Validation(
                "code.collapse_threshold must be greater than 0".to_owned(),
            ));
        }
        if self.store_resolved.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "store.path cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            code: CodeConfig::default(),
            store: StoreConfigRaw::default(),
            store_resolved: StoreConfig {
                path: default_store_path(base),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.code.flags = expand::expand_env(&self.code.flags, "code.flags")?;
        if let Some(ref path) = self.store.path {
            self.store.path = Some(expand::expand_env(path, "store.path")?);
        }
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store_resolved = StoreConfig {
            path: self
                .store
                .path
                .as_deref()
                .map_or_else(|| default_store_path(config_dir), |p| config_dir.join(p)),
        };
    }
}

fn default_store_path(base: &Path) -> PathBuf {
    base.join(".rw").join("tabs.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.code.flags, "");
        assert_eq!(config.code.collapse_threshold, 10);
        assert!(!config.code.isolate_failures);
        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/test/.rw/tabs.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_code_section() {
        let toml = r#"
[code]
flags = "-cn"
collapse_threshold = 25
isolate_failures = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.code.flag_chars(), "cn");
        assert_eq!(config.code.collapse_threshold, 25);
        assert!(config.code.isolate_failures);
    }

    #[test]
    fn test_resolve_store_path() {
        let toml = r#"
[store]
path = "state/tabs.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/project/state/tabs.json")
        );

        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/project/.rw/tabs.json")
        );
    }

    #[test]
    fn test_absolute_store_path_kept() {
        let mut config: Config = toml::from_str("[store]\npath = \"/var/tabs.json\"").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.store_resolved.path, PathBuf::from("/var/tabs.json"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            flags: Some("w".to_owned()),
            isolate_failures: Some(true),
            ..Default::default()
        });

        assert_eq!(config.code.flags, "w");
        assert!(config.code.isolate_failures);
        assert_eq!(config.code.collapse_threshold, 10); // Unchanged
        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/test/.rw/tabs.json")
        );

        config.apply_cli_settings(&CliSettings {
            collapse_threshold: Some(3),
            store_path: Some(PathBuf::from("/tmp/tabs.json")),
            ..Default::default()
        });
        assert_eq!(config.code.collapse_threshold, 3);
        assert_eq!(config.store_resolved.path, PathBuf::from("/tmp/tabs.json"));
        assert_eq!(config.code.flags, "w"); // Unchanged
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CODETABS_CONFIG_STATE", "/state");
            std::env::remove_var("CODETABS_CONFIG_FLAGS");
        }

        let toml = r#"
[code]
flags = "${CODETABS_CONFIG_FLAGS:-c}"

[store]
path = "${CODETABS_CONFIG_STATE}/tabs.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.code.flags, "c");
        assert_eq!(config.store_resolved.path, PathBuf::from("/state/tabs.json"));

        unsafe {
            std::env::remove_var("CODETABS_CONFIG_STATE");
        }
    }

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        assert!(msg.contains(expected), "Expected '{expected}' in: {msg}");
    }

    #[test]
    fn test_validate_unknown_flag() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.code.flags = "cx".to_owned();
        assert_validation_error(&config, "unknown flag 'x'");
    }

    #[test]
    fn test_validate_zero_threshold() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.code.collapse_threshold = 0;
        assert_validation_error(&config, "code.collapse_threshold");
    }

    #[test]
    fn test_validate_empty_store_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.store_resolved.path = PathBuf::new();
        assert_validation_error(&config, "store.path cannot be empty");
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[code]\nflags = \"n\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.code.flags, "n");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.store_resolved.path, tmp.path().join(".rw/tabs.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/codetabs.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[code]\ncollapse_threshold = \"ten\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));

        std::fs::write(&path, "[code]\nflags = \"q\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            collapse_threshold: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }
}
