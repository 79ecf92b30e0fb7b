use crate::workflows::roster::{
    standard_weekdays, ObjectiveWeights, Period, PlannerSettings, ShiftCatalog, SolveBudget,
    DEFAULT_PREFERENCE_SLOTS,
};
use std::env;
use std::fmt;
use std::time::Duration;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let time_limit = optional_var("ROSTER_TIME_LIMIT_SECS")
            .map(|raw| parse_number::<u64>("ROSTER_TIME_LIMIT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let preference_slots = optional_var("ROSTER_PREFERENCE_SLOTS")
            .map(|raw| parse_number::<usize>("ROSTER_PREFERENCE_SLOTS", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_PREFERENCE_SLOTS);
        if preference_slots == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "ROSTER_PREFERENCE_SLOTS",
                value: "0".to_string(),
            });
        }

        let defaults = ObjectiveWeights::default();
        let weights = ObjectiveWeights {
            coverage: optional_var("ROSTER_COVERAGE_WEIGHT")
                .map(|raw| parse_number::<i64>("ROSTER_COVERAGE_WEIGHT", &raw))
                .transpose()?
                .unwrap_or(defaults.coverage),
            preference: optional_var("ROSTER_PREFERENCE_WEIGHT")
                .map(|raw| parse_number::<i64>("ROSTER_PREFERENCE_WEIGHT", &raw))
                .transpose()?
                .unwrap_or(defaults.preference),
        };

        let weekdays = match optional_var("ROSTER_WEEKDAYS") {
            Some(raw) => parse_list("ROSTER_WEEKDAYS", &raw)?,
            None => standard_weekdays(),
        };

        let periods = match optional_var("ROSTER_PERIODS") {
            Some(raw) => parse_periods(&raw)?,
            None => Period::standard(),
        };

        Ok(Self {
            telemetry: TelemetryConfig { log_level },
            planner: PlannerConfig {
                weekdays,
                periods,
                preference_slots,
                weights,
                time_limit,
            },
        })
    }
}

/// Catalog shape, objective weights and solve budget.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub weekdays: Vec<String>,
    pub periods: Vec<Period>,
    pub preference_slots: usize,
    pub weights: ObjectiveWeights,
    pub time_limit: Option<Duration>,
}

impl PlannerConfig {
    pub fn catalog(&self) -> ShiftCatalog {
        ShiftCatalog::from_templates(&self.weekdays, &self.periods)
    }

    pub fn settings(&self) -> PlannerSettings {
        PlannerSettings {
            preference_slots: self.preference_slots,
            weights: self.weights,
            budget: SolveBudget {
                time_limit: self.time_limit,
            },
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    EmptyList { var: &'static str },
    InvalidPeriod { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a valid whole number (found '{value}')")
            }
            ConfigError::EmptyList { var } => {
                write!(f, "{var} must list at least one comma-separated entry")
            }
            ConfigError::InvalidPeriod { value } => write!(
                f,
                "ROSTER_PERIODS entry '{value}' must look like 'Name:capacity'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

fn parse_list(var: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();

    if items.is_empty() {
        return Err(ConfigError::EmptyList { var });
    }
    Ok(items)
}

fn parse_periods(raw: &str) -> Result<Vec<Period>, ConfigError> {
    parse_list("ROSTER_PERIODS", raw)?
        .into_iter()
        .map(|entry| {
            let invalid = || ConfigError::InvalidPeriod {
                value: entry.clone(),
            };
            let (name, capacity) = entry.rsplit_once(':').ok_or_else(invalid)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid());
            }
            let capacity = capacity.trim().parse::<u32>().map_err(|_| invalid())?;
            Ok(Period::new(name, capacity))
        })
        .collect()
}
