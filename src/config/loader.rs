//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::PayrollConfig;

/// Loads and validates payroll configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Over-achievement rate: {}", config.over_achievement_rate);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns the configuration on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML or unknown value types
    /// - A value fails validation (see [`ConfigLoader::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<PayrollConfig> {
        let path = path.as_ref();
        let config = Self::load_yaml::<PayrollConfig>(path)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Checks values that parse but cannot drive a payroll run.
    pub fn validate(config: &PayrollConfig) -> EngineResult<()> {
        let invalid = |field: &str, message: &str| EngineError::InvalidConfig {
            field: field.to_string(),
            message: message.to_string(),
        };

        if config.over_achievement_rate < Decimal::ZERO
            || config.over_achievement_rate > Decimal::ONE
        {
            return Err(invalid(
                "over_achievement_rate",
                "must be between 0 and 1",
            ));
        }
        if config.max_parallel_staff == 0 {
            return Err(invalid("max_parallel_staff", "must be at least 1"));
        }
        if config.commit_retry_limit == 0 {
            return Err(invalid("commit_retry_limit", "must be at least 1"));
        }

        let mut distinct = config.non_working_weekdays.clone();
        distinct.sort_by_key(|d| d.num_days_from_monday());
        distinct.dedup();
        if distinct.len() == 7 {
            return Err(invalid(
                "non_working_weekdays",
                "at least one weekday must be a working day",
            ));
        }

        Ok(())
    }
}
