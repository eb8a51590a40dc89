//! Configuration loading and management for the Timesheet Engine.
//!
//! This module loads organization settings, the weekly overtime policy,
//! rate plans and the holiday calendar from YAML files, and exposes the raw
//! configuration types that request bodies reuse for per-request overrides.
//!
//! # Example
//!
//! ```no_run
//! use timesheet_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Default plan: {}", config.default_rate_plan().unwrap().id());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    HolidayConfig, HolidaysConfig, OvertimePolicyConfig, RatePlanConfig, RatePlansConfig,
    SettingsConfig, SettingsFile,
};
