use std::time::Duration;

use thiserror::Error;

/// Failure while assembling a backend or service from configuration.
/// Distinct from `GenerationError`: configuration problems happen before any
/// generation call exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} could not be read: {reason}")]
    EnvVar { name: String, reason: String },
    #[error("{name} is invalid: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("failed to create HTTP client: {reason}")]
    HttpClient { reason: String },
}

impl ConfigError {
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn read_env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::EnvVar {
            name: name.to_string(),
            reason: error.to_string(),
        }),
    }
}

pub(crate) fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid_value(name, "must be a positive integer in seconds"))?;
    if parsed == 0 {
        return Err(ConfigError::invalid_value(
            name,
            "must be greater than 0 seconds",
        ));
    }
    Ok(Duration::from_secs(parsed))
}

pub(crate) fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ConfigError, parse_timeout_seconds};

    #[test]
    fn parse_timeout_seconds_accepts_positive_integer_values() {
        let timeout = parse_timeout_seconds("TEST_TIMEOUT", "8")
            .expect("positive integer timeout should parse");
        assert_eq!(timeout, Duration::from_secs(8));
    }

    #[test]
    fn parse_timeout_seconds_rejects_invalid_values() {
        let zero = parse_timeout_seconds("TEST_TIMEOUT", "0")
            .expect_err("zero timeout should fail validation");
        assert!(matches!(
            zero,
            ConfigError::InvalidValue { name, reason }
            if name == "TEST_TIMEOUT" && reason == "must be greater than 0 seconds"
        ));

        let invalid = parse_timeout_seconds("TEST_TIMEOUT", "abc")
            .expect_err("non-integer timeout should fail validation");
        assert!(matches!(
            invalid,
            ConfigError::InvalidValue { name, reason }
            if name == "TEST_TIMEOUT" && reason == "must be a positive integer in seconds"
        ));
    }
}
