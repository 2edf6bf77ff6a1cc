//! Tolerance thresholds and aggregation bounds for return-trip validation.
//!
//! Every field has a production default, so a partial JSON document only needs
//! to name the values it overrides:
//!
//! ```
//! use trip_audit_core::config::ValidationConfig;
//!
//! let config = ValidationConfig::from_json_str(r#"{ "max_time_gap_hours": 36.0 }"#).unwrap();
//! assert_eq!(config.max_time_gap_hours, 36.0);
//! assert_eq!(config.distance_tolerance_percent, 15.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DISTANCE_TOLERANCE_PERCENT: f64 = 15.0;
pub const DEFAULT_FUEL_TOLERANCE_PERCENT: f64 = 20.0;
pub const DEFAULT_MAX_TIME_GAP_HOURS: f64 = 48.0;
pub const DEFAULT_MIN_RETURN_DISTANCE_KM: f64 = 10.0;
pub const DEFAULT_AGGREGATION_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_AGGREGATION_LIMIT: usize = 100;

/// Upper bound on aggregation workers.
pub const MAX_WORKERS: usize = 64;

/// Longest return search window: one leap year.
pub const MAX_TIME_GAP_HOURS: f64 = 8_784.0;

/// Longest fleet-wide look-back window: ten years.
pub const MAX_AGGREGATION_WINDOW_DAYS: u32 = 3_660;

/// How the fleet-wide aggregate walks the trip window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One trip at a time, in listing order.
    #[default]
    Sequential,
    /// Bounded worker pool; results keep listing order.
    Parallel { workers: usize },
}

/// Thresholds used by every check in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed outbound/return distance variance before flagging.
    pub distance_tolerance_percent: f64,
    /// Distance variance above which a mismatch is `high`.
    pub distance_high_severity_percent: f64,
    /// Allowed fuel-efficiency variance before flagging.
    pub fuel_tolerance_percent: f64,
    /// Pair fuel variance above which an inconsistency is `high`.
    pub pair_fuel_high_severity_percent: f64,
    /// Round-trip fuel variance above which an inconsistency is `high`.
    pub round_trip_fuel_high_severity_percent: f64,
    /// Latest return start after the outbound end, and the time-gap limit.
    pub max_time_gap_hours: f64,
    /// Time gap above which a `time_gap` issue is `high`.
    pub time_gap_high_severity_hours: f64,
    /// Minimum distance of one leg; a round trip must cover twice this.
    pub min_return_distance_km: f64,
    /// Earliest return start after the outbound end.
    pub min_return_delay_hours: f64,
    /// One-way trips longer than this should have had a return leg.
    pub missing_return_distance_km: f64,
    /// One-way trips lasting longer than this should have had a return leg.
    pub missing_return_duration_hours: f64,
    /// Look-back window of the fleet-wide aggregate.
    pub aggregation_window_days: u32,
    /// Hard cap on trips analysed by the fleet-wide aggregate.
    pub aggregation_limit: usize,
    pub execution: ExecutionMode,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            distance_tolerance_percent: DEFAULT_DISTANCE_TOLERANCE_PERCENT,
            distance_high_severity_percent: 30.0,
            fuel_tolerance_percent: DEFAULT_FUEL_TOLERANCE_PERCENT,
            pair_fuel_high_severity_percent: 35.0,
            round_trip_fuel_high_severity_percent: 30.0,
            max_time_gap_hours: DEFAULT_MAX_TIME_GAP_HOURS,
            time_gap_high_severity_hours: 72.0,
            min_return_distance_km: DEFAULT_MIN_RETURN_DISTANCE_KM,
            min_return_delay_hours: 1.0,
            missing_return_distance_km: 50.0,
            missing_return_duration_hours: 6.0,
            aggregation_window_days: DEFAULT_AGGREGATION_WINDOW_DAYS,
            aggregation_limit: DEFAULT_AGGREGATION_LIMIT,
            execution: ExecutionMode::Sequential,
        }
    }
}

impl ValidationConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_distance_tolerance_percent(mut self, percent: f64) -> Self {
        self.distance_tolerance_percent = percent;
        self
    }

    pub fn with_fuel_tolerance_percent(mut self, percent: f64) -> Self {
        self.fuel_tolerance_percent = percent;
        self
    }

    pub fn with_max_time_gap_hours(mut self, hours: f64) -> Self {
        self.max_time_gap_hours = hours;
        self
    }

    pub fn with_min_return_distance_km(mut self, km: f64) -> Self {
        self.min_return_distance_km = km;
        self
    }

    pub fn with_aggregation_window_days(mut self, days: u32) -> Self {
        self.aggregation_window_days = days;
        self
    }

    pub fn with_aggregation_limit(mut self, limit: usize) -> Self {
        self.aggregation_limit = limit;
        self
    }

    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.execution = ExecutionMode::Parallel { workers };
        self
    }

    pub fn with_sequential_execution(mut self) -> Self {
        self.execution = ExecutionMode::Sequential;
        self
    }

    /// Distance a self-flagged round trip must at least cover.
    pub fn round_trip_distance_floor_km(&self) -> f64 {
        2.0 * self.min_return_distance_km
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("distance_tolerance_percent", self.distance_tolerance_percent),
            (
                "distance_high_severity_percent",
                self.distance_high_severity_percent,
            ),
            ("fuel_tolerance_percent", self.fuel_tolerance_percent),
            (
                "pair_fuel_high_severity_percent",
                self.pair_fuel_high_severity_percent,
            ),
            (
                "round_trip_fuel_high_severity_percent",
                self.round_trip_fuel_high_severity_percent,
            ),
            ("max_time_gap_hours", self.max_time_gap_hours),
            (
                "time_gap_high_severity_hours",
                self.time_gap_high_severity_hours,
            ),
            ("min_return_distance_km", self.min_return_distance_km),
            ("min_return_delay_hours", self.min_return_delay_hours),
            ("missing_return_distance_km", self.missing_return_distance_km),
            (
                "missing_return_duration_hours",
                self.missing_return_duration_hours,
            ),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite, non-negative number (got {value})"),
                });
            }
        }

        let cutoffs = [
            (
                "distance_high_severity_percent",
                self.distance_high_severity_percent,
                self.distance_tolerance_percent,
            ),
            (
                "pair_fuel_high_severity_percent",
                self.pair_fuel_high_severity_percent,
                self.fuel_tolerance_percent,
            ),
            (
                "round_trip_fuel_high_severity_percent",
                self.round_trip_fuel_high_severity_percent,
                self.fuel_tolerance_percent,
            ),
            (
                "time_gap_high_severity_hours",
                self.time_gap_high_severity_hours,
                self.max_time_gap_hours,
            ),
        ];
        for (field, cutoff, tolerance) in cutoffs {
            if cutoff < tolerance {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be below its tolerance ({cutoff} < {tolerance})"),
                });
            }
        }

        if self.max_time_gap_hours > MAX_TIME_GAP_HOURS {
            return Err(ConfigError::Invalid {
                field: "max_time_gap_hours",
                reason: format!(
                    "must not exceed {MAX_TIME_GAP_HOURS} hours (got {})",
                    self.max_time_gap_hours
                ),
            });
        }

        if self.min_return_delay_hours > self.max_time_gap_hours {
            return Err(ConfigError::Invalid {
                field: "min_return_delay_hours",
                reason: "must not exceed max_time_gap_hours".to_string(),
            });
        }

        if self.aggregation_window_days > MAX_AGGREGATION_WINDOW_DAYS {
            return Err(ConfigError::Invalid {
                field: "aggregation_window_days",
                reason: format!(
                    "must not exceed {MAX_AGGREGATION_WINDOW_DAYS} days (got {})",
                    self.aggregation_window_days
                ),
            });
        }

        if self.aggregation_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "aggregation_limit",
                reason: "must be a positive integer".to_string(),
            });
        }

        if let ExecutionMode::Parallel { workers } = self.execution {
            if workers == 0 || workers > MAX_WORKERS {
                return Err(ConfigError::Invalid {
                    field: "execution",
                    reason: format!("workers must be within 1..={MAX_WORKERS} (got {workers})"),
                });
            }
        }

        Ok(())
    }
}
