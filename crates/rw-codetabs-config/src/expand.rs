//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Unset variable reported by the lookup closure.
struct UnsetVar(String);

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// An unset variable without a default is an error naming `field`. Strings
/// without `${` are returned as is, so a bare `$` in a path stays literal.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CODETABS_TEST_HOME", "/home/dev");
        }
        let result = expand_env("${CODETABS_TEST_HOME}/.rw/tabs.json", "store.path").unwrap();
        assert_eq!(result, "/home/dev/.rw/tabs.json");
        unsafe {
            std::env::remove_var("CODETABS_TEST_HOME");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CODETABS_TEST_FLAGS");
        }
        let result = expand_env("${CODETABS_TEST_FLAGS:-cn}", "code.flags").unwrap();
        assert_eq!(result, "cn");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CODETABS_TEST_MISSING");
        }
        let err = expand_env("${CODETABS_TEST_MISSING}", "store.path").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in store.path: ${CODETABS_TEST_MISSING} not set"
        );
    }

    #[test]
    fn test_literals_unchanged() {
        assert_eq!(expand_env("tabs.json", "store.path").unwrap(), "tabs.json");
        assert_eq!(expand_env("$HOME/tabs", "store.path").unwrap(), "$HOME/tabs");
    }
}
