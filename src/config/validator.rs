use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{Result, SfsError, ValidationError};

/// Longest accepted blacklist window: one week
const MAX_BLACKLIST_THRESHOLD_MINUTES: u32 = 7 * 24 * 60;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        // Validate schema version
        Self::validate_schema_version(config, &mut errors);

        // Validate extraction settings
        Self::validate_extraction(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SfsError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_extraction(config: &Config, errors: &mut Vec<ValidationError>) {
        let minutes = config.extraction.blacklist_threshold_minutes;
        if !(1..=MAX_BLACKLIST_THRESHOLD_MINUTES).contains(&minutes) {
            errors.push(ValidationError::new(
                "extraction.blacklist_threshold_minutes",
                format!(
                    "Threshold must be between 1 and {} minutes, got {}",
                    MAX_BLACKLIST_THRESHOLD_MINUTES, minutes
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_threshold() {
        let mut config = Config::default();
        config.extraction.blacklist_threshold_minutes = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = Config::default();
        config.meta.schema_version = "0.1.0".to_string();
        config.extraction.blacklist_threshold_minutes = MAX_BLACKLIST_THRESHOLD_MINUTES + 1;

        match ConfigValidator::validate(&config) {
            Err(SfsError::ConfigValidation { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
