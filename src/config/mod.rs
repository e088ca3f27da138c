//! Configuration loading and management for the payroll engine.
//!
//! This module loads deployment settings from a YAML file: the
//! over-achievement bonus rate, non-working weekdays, dated holidays, and
//! the concurrency bounds of a payroll run.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Non-working weekdays: {:?}", config.non_working_weekdays);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PayrollConfig, ServerConfig};
