//! Configuration types for payroll runs.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a default,
//! so an empty file is a valid configuration.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Holiday, MonthYear, PayPeriod};

fn default_over_achievement_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_non_working_weekdays() -> Vec<Weekday> {
    vec![Weekday::Sun]
}

fn default_max_parallel_staff() -> usize {
    8
}

fn default_commit_retry_limit() -> u32 {
    3
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Deployment-level payroll settings.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let config: PayrollConfig = serde_yaml::from_str("max_parallel_staff: 4").unwrap();
/// assert_eq!(config.max_parallel_staff, 4);
/// assert_eq!(config.over_achievement_rate, Decimal::new(10, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Fraction of sales above target paid as the target incentive.
    #[serde(default = "default_over_achievement_rate")]
    pub over_achievement_rate: Decimal,
    /// Weekdays that never count as working days.
    #[serde(default = "default_non_working_weekdays")]
    pub non_working_weekdays: Vec<Weekday>,
    /// Dated non-working days.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Upper bound on staff processed concurrently within one run.
    #[serde(default = "default_max_parallel_staff")]
    pub max_parallel_staff: usize,
    /// Attempts per staff member when a commit hits a concurrency conflict.
    #[serde(default = "default_commit_retry_limit")]
    pub commit_retry_limit: u32,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            over_achievement_rate: default_over_achievement_rate(),
            non_working_weekdays: default_non_working_weekdays(),
            holidays: vec![],
            max_parallel_staff: default_max_parallel_staff(),
            commit_retry_limit: default_commit_retry_limit(),
            server: ServerConfig::default(),
        }
    }
}

impl PayrollConfig {
    /// The pay period for `month_year`, carrying the configured holidays that
    /// fall inside it.
    pub fn period_for(&self, month_year: MonthYear) -> PayPeriod {
        let mut period = month_year.period();
        period.holidays = self
            .holidays
            .iter()
            .filter(|h| period.contains_date(h.date))
            .cloned()
            .collect();
        period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: PayrollConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PayrollConfig::default());
        assert_eq!(config.non_working_weekdays, vec![Weekday::Sun]);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_weekdays_parse_from_short_names() {
        let config: PayrollConfig =
            serde_yaml::from_str("non_working_weekdays: [sat, sun]").unwrap();
        assert_eq!(config.non_working_weekdays, vec![Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_period_for_keeps_only_holidays_in_month() {
        let config = PayrollConfig {
            holidays: vec![
                Holiday {
                    date: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
                    name: "Republic Day".to_string(),
                },
                Holiday {
                    date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
                    name: "Independence Day".to_string(),
                },
            ],
            ..PayrollConfig::default()
        };
        let period = config.period_for(MonthYear::new(2025, 1).unwrap());
        assert_eq!(period.holidays.len(), 1);
        assert_eq!(period.holidays[0].name, "Republic Day");
    }
}
