//! Configuration validation.
//!
//! Checks that required values are present and within valid ranges before the
//! server binds its listener.

use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{
    AnalysisConfig, Config, ConfigSource, NetworkConfig, ObservabilityConfig, ServerConfig,
};

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
        let sections: [&dyn Validate; 4] = [
            &self.network,
            &self.server,
            &self.analysis,
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
    pub fn load_and_validate() -> crate::Result<(Self, ConfigSource)> {
        let (config, source) = Self::load_with_env()?;
        config
            .validate()
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok((config, source))
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.bind.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "network.bind".into(),
            });
        }

        IpAddr::from_str(self.bind.trim()).map_err(|_| ValidationError::InvalidValue {
            field: "network.bind".into(),
            reason: format!("'{}' is not an IP address", self.bind),
        })?;

        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort {
                port: self.port,
                field: "server.port".into(),
            });
        }

        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "server.max_upload_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> ValidationResult<()> {
        let name = self.download_file_name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "analysis.download_file_name".into(),
            });
        }

        if name.contains(['/', '\\', '"']) {
            return Err(ValidationError::InvalidValue {
                field: "analysis.download_file_name".into(),
                reason: "must be a bare file name".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        const FORMATS: &[&str] = &["json", "pretty"];

        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LEVELS.join(", ")),
            });
        }

        if !FORMATS.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of {}", FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let server = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            server.validate(),
            Err(ValidationError::InvalidPort { port: 0, .. })
        ));
    }

    #[test_case("127.0.0.1", true ; "ipv4 loopback")]
    #[test_case("0.0.0.0", true ; "ipv4 any")]
    #[test_case("::1", true ; "ipv6 loopback")]
    #[test_case("localhost", false ; "hostname")]
    #[test_case("  ", false ; "blank")]
    fn test_bind_address(bind: &str, valid: bool) {
        let network = NetworkConfig { bind: bind.into() };
        assert_eq!(network.validate().is_ok(), valid);
    }

    #[test_case("sentiment_results.json", true ; "default name")]
    #[test_case("", false ; "empty")]
    #[test_case("../out.json", false ; "path traversal")]
    #[test_case("a\"b.json", false ; "quote")]
    fn test_download_file_name(name: &str, valid: bool) {
        let analysis = AnalysisConfig {
            download_file_name: name.into(),
        };
        assert_eq!(analysis.validate().is_ok(), valid);
    }

    #[test]
    fn test_log_settings() {
        let mut obs = ObservabilityConfig::default();
        obs.log_level = "DEBUG".into();
        assert!(obs.validate().is_ok());

        obs.log_level = "verbose".into();
        assert!(obs.validate().is_err());

        obs.log_level = "info".into();
        obs.log_format = "xml".into();
        assert!(obs.validate().is_err());
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.server.port = 0;
        config.observability.log_format = "xml".into();

        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }
}
