//! Configuration validation for moodscope services.
//!
//! Checks that configured values are present and within valid ranges
//! before the service binds its listener.

use thiserror::Error;

use crate::config::{
    ClassifierConfig, Config, NetworkConfig, ObservabilityConfig, SummarizerConfig, TwitterConfig,
};
use crate::logging::LogFormat;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let sections: [&dyn Validate; 5] = [
            &self.network,
            &self.twitter,
            &self.classifiers,
            &self.summarizer,
            &self.observability,
        ];

        let mut errors: Vec<ValidationError> = sections
            .iter()
            .filter_map(|section| section.validate().err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load, apply environment overrides, and validate configuration.
    pub fn load_and_validate() -> crate::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn check_http_url(field: &str, value: &str) -> ValidationResult<()> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: format!("unsupported scheme: {}", parsed.scheme()),
        }),
        Err(e) => Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: e.to_string(),
        }),
    }
}

fn check_timeout(field: &str, secs: u64) -> ValidationResult<()> {
    if secs == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: "must be greater than 0".into(),
        });
    }
    Ok(())
}

impl Validate for NetworkConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort {
                port: self.port,
                field: "network.port".into(),
            });
        }
        if self.bind.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "network.bind".into(),
            });
        }
        Ok(())
    }
}

impl Validate for TwitterConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_http_url("twitter.base_url", &self.base_url)?;
        check_timeout("twitter.timeout_secs", self.timeout_secs)
    }
}

impl Validate for ClassifierConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_http_url("classifiers.base_url", &self.base_url)?;
        if self.severity_model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "classifiers.severity_model".into(),
            });
        }
        if self.sentiment_model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "classifiers.sentiment_model".into(),
            });
        }
        check_timeout("classifiers.timeout_secs", self.timeout_secs)
    }
}

impl Validate for SummarizerConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_http_url("summarizer.base_url", &self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "summarizer.model".into(),
            });
        }
        check_timeout("summarizer.timeout_secs", self.timeout_secs)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        self.log_format
            .parse::<LogFormat>()
            .map(|_| ())
            .map_err(|reason| ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.observability.log_level = "invalid".into();
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "observability.log_level"
        ));
    }

    #[test]
    fn test_unknown_log_format() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        match config.validate() {
            Err(ValidationError::InvalidValue { field, reason }) => {
                assert_eq!(field, "observability.log_format");
                assert!(reason.contains("xml"));
            }
            other => panic!("expected invalid log format, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_port() {
        let mut config = Config::default();
        config.network.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPort { port: 0, .. })
        ));
    }

    #[test_case("ftp://example.com" ; "unsupported scheme")]
    #[test_case("not a url" ; "unparsable")]
    fn test_bad_base_url(url: &str) {
        let mut config = Config::default();
        config.twitter.base_url = url.into();
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "twitter.base_url"
        ));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.summarizer.timeout_secs = 0;
        config.classifiers.severity_model = String::new();
        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }
}
