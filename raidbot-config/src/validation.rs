// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by settings structs that check themselves after loading.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field-level checks shared by `Validate` implementations.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {} (got {})",
                field, min, max, value
            )));
        }
        Ok(())
    }

    /// Absolute http(s) URL without a trailing slash.
    pub fn is_base_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an http(s) URL",
                field
            )));
        }
        if value.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must not end with '/'",
                field
            )));
        }
        Ok(())
    }
}
