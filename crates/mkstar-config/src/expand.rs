//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration field for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_is_unchanged() {
        assert_eq!(expand_env("input/docs", "f").unwrap(), "input/docs");
    }

    #[test]
    fn test_default_value() {
        let value = expand_env("${MKSTAR_TEST_SURELY_UNSET:-fallback}/docs", "f").unwrap();
        assert_eq!(value, "fallback/docs");
    }

    #[test]
    fn test_unset_variable_names_field() {
        let err = expand_env("${MKSTAR_TEST_SURELY_UNSET}/docs", "sections[0].source_dir")
            .unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("sections[0].source_dir"));
        assert!(message.contains("MKSTAR_TEST_SURELY_UNSET"));
    }
}
