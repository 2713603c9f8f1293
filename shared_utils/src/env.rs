//! Environment variable access with structured errors.

use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but its value could not be parsed.
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: String, value: String },
}

/// Reads an environment variable, returning [`EnvError::Missing`] if it is unset
/// or not valid unicode.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvError> {
    std::env::var(name).map_err(|_| EnvError::Missing(name.to_string()))
}

/// Reads an optional environment variable. Unset and blank values are `None`.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset, and [`EnvError::Invalid`]
/// when it is set to something `T` cannot parse.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, EnvError> {
    match get_optional_env_var(name) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| EnvError::Invalid {
            name: name.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_var_is_reported_by_name() {
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_MISSING") };
        let err = get_env_var("SHARED_UTILS_TEST_MISSING").unwrap_err();
        assert_eq!(err, EnvError::Missing("SHARED_UTILS_TEST_MISSING".into()));
        assert!(err.to_string().contains("SHARED_UTILS_TEST_MISSING"));
    }

    #[test]
    #[serial]
    fn blank_optional_var_is_none() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert_eq!(get_optional_env_var("SHARED_UTILS_TEST_BLANK"), None);
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_BLANK") };
    }

    #[test]
    #[serial]
    fn parse_env_var_parses_and_rejects() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_TTL", " 60 ") };
        assert_eq!(parse_env_var::<u64>("SHARED_UTILS_TEST_TTL"), Ok(Some(60)));

        unsafe { std::env::set_var("SHARED_UTILS_TEST_TTL", "soon") };
        let err = parse_env_var::<u64>("SHARED_UTILS_TEST_TTL").unwrap_err();
        assert!(matches!(err, EnvError::Invalid { ref value, .. } if value == "soon"));

        unsafe { std::env::remove_var("SHARED_UTILS_TEST_TTL") };
        assert_eq!(parse_env_var::<u64>("SHARED_UTILS_TEST_TTL"), Ok(None));
    }
}
