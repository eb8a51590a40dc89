//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading organization
//! settings, rate plans and the holiday calendar from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, OvertimePolicy, RatePlan, Settings};

use super::types::{HolidaysConfig, RatePlansConfig, SettingsFile};

/// Loads and provides access to timesheet configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates them into domain models and provides lookups by id.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml     # Night window, overtime threshold, rounding, overtime policy
/// ├── rate_plans.yaml   # Rate plans and the default plan id
/// └── holidays.yaml     # Holiday calendar
/// ```
///
/// # Example
///
/// ```no_run
/// use timesheet_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let plan = loader.get_rate_plan("field_crew").unwrap();
/// println!("Base rate: {} {}", plan.base_rate_hourly(), plan.currency());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: Settings,
    policy: OvertimePolicy,
    rate_plans: HashMap<String, RatePlan>,
    default_rate_plan: String,
    holidays: Vec<Holiday>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if any of the three files is missing
    /// - `ConfigParseError` if a file is not valid YAML for its structure
    /// - `Configuration` if a value fails validation, a rate plan id is
    ///   duplicated, or the default rate plan is not defined
    ///
    /// # Example
    ///
    /// ```no_run
    /// use timesheet_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), timesheet_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings_file = Self::load_yaml::<SettingsFile>(&path.join("settings.yaml"))?;
        let rate_plans = Self::load_yaml::<RatePlansConfig>(&path.join("rate_plans.yaml"))?;
        let holidays = Self::load_yaml::<HolidaysConfig>(&path.join("holidays.yaml"))?;

        let settings = Settings::try_from(settings_file.settings)?;
        let policy = OvertimePolicy::try_from(settings_file.overtime_policy)?;
        let plans = rate_plans
            .rate_plans
            .into_iter()
            .map(RatePlan::try_from)
            .collect::<EngineResult<Vec<_>>>()?;
        let holidays = holidays
            .holidays
            .into_iter()
            .map(Holiday::try_from)
            .collect::<EngineResult<Vec<_>>>()?;

        let loader = Self::new(settings, policy, plans, rate_plans.default_rate_plan, holidays)?;

        tracing::info!(
            path = %path.display(),
            rate_plans = loader.rate_plans.len(),
            holidays = loader.holidays.len(),
            default_rate_plan = %loader.default_rate_plan,
            "Configuration loaded"
        );

        Ok(loader)
    }

    /// Builds a loader from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if two plans share an id or
    /// `default_rate_plan` names no plan.
    pub fn new(
        settings: Settings,
        policy: OvertimePolicy,
        rate_plans: Vec<RatePlan>,
        default_rate_plan: impl Into<String>,
        holidays: Vec<Holiday>,
    ) -> EngineResult<Self> {
        let default_rate_plan = default_rate_plan.into();
        let mut by_id = HashMap::with_capacity(rate_plans.len());
        for plan in rate_plans {
            let id = plan.id().to_string();
            if by_id.insert(id.clone(), plan).is_some() {
                return Err(EngineError::configuration(
                    "rate_plans",
                    format!("duplicate rate plan id '{}'", id),
                ));
            }
        }
        if !by_id.contains_key(&default_rate_plan) {
            return Err(EngineError::configuration(
                "default_rate_plan",
                format!("'{}' is not a configured rate plan", default_rate_plan),
            ));
        }

        let mut holidays = holidays;
        holidays.sort_by_key(|h| h.date);

        Ok(Self {
            settings,
            policy,
            rate_plans: by_id,
            default_rate_plan,
            holidays,
        })
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

    /// Returns the per-shift classification settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the weekly overtime policy.
    pub fn policy(&self) -> &OvertimePolicy {
        &self.policy
    }

    /// Gets a rate plan by its id.
    ///
    /// Returns `RatePlanNotFound` if no plan has that id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use timesheet_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let plan = loader.get_rate_plan("field_crew")?;
    /// println!("Overtime: {}x", plan.overtime_multiplier());
    /// # Ok::<(), timesheet_engine::error::EngineError>(())
    /// ```
    pub fn get_rate_plan(&self, id: &str) -> EngineResult<&RatePlan> {
        self.rate_plans
            .get(id)
            .ok_or_else(|| EngineError::RatePlanNotFound { id: id.to_string() })
    }

    /// Returns the plan used when a request names none.
    pub fn default_rate_plan(&self) -> EngineResult<&RatePlan> {
        self.get_rate_plan(&self.default_rate_plan)
    }

    /// Returns the configured holiday calendar, sorted by date.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}
