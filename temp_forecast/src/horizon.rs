//! Forecast horizon validation and future timestamp synthesis

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Hours in one horizon day
pub const HOURS_PER_DAY: usize = 24;

/// Longest horizon that is synthesised at all, roughly a century.
///
/// Every horizon hour becomes an in-memory point, so day counts beyond this
/// are rejected with [`ForecastError::InvalidHorizon`] instead of exhausting
/// memory. Smaller operational limits go in `PipelineConfig::max_horizon_days`.
pub const MAX_SUPPORTED_DAYS: u32 = 36_500;

/// A validated forecast horizon in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Horizon {
    days: u32,
}

impl Horizon {
    /// Create a horizon; `days` must be positive
    pub fn new(days: i64) -> Result<Self> {
        if days <= 0 {
            return Err(ForecastError::InvalidHorizon(format!(
                "days must be a positive integer, got {}",
                days
            )));
        }
        match u32::try_from(days) {
            Ok(days) if days <= MAX_SUPPORTED_DAYS => Ok(Self { days }),
            _ => Err(ForecastError::InvalidHorizon(format!(
                "days value {} exceeds the supported maximum of {}",
                days, MAX_SUPPORTED_DAYS
            ))),
        }
    }

    /// Parse a day count supplied as text, e.g. from a form field
    pub fn parse(input: &str) -> Result<Self> {
        let days: i64 = input.trim().parse().map_err(|_| {
            ForecastError::InvalidHorizon(format!("days must be an integer, got {:?}", input))
        })?;
        Self::new(days)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Number of hourly forecast points
    pub fn hours(&self) -> usize {
        self.days as usize * HOURS_PER_DAY
    }
}

impl TryFrom<i64> for Horizon {
    type Error = ForecastError;

    fn try_from(days: i64) -> Result<Self> {
        Horizon::new(days)
    }
}

impl From<Horizon> for i64 {
    fn from(h: Horizon) -> Self {
        h.days as i64
    }
}

/// Create the hourly timestamps following `last_timestamp`.
///
/// Yields `horizon.hours()` timestamps, the first exactly one hour after
/// `last_timestamp`, each one hour after the previous.
pub fn synthesize(last_timestamp: DateTime<Utc>, horizon: Horizon) -> Result<Vec<DateTime<Utc>>> {
    let count = horizon.hours();
    let out_of_range = || {
        ForecastError::InvalidHorizon(format!(
            "{} days after {} exceeds the supported time range",
            horizon.days(),
            last_timestamp
        ))
    };

    // the last point must be representable before anything is allocated
    Duration::try_hours(count as i64)
        .and_then(|span| last_timestamp.checked_add_signed(span))
        .ok_or_else(out_of_range)?;

    let step = Duration::hours(1);
    let mut timestamps = Vec::with_capacity(count);
    let mut current = last_timestamp;
    for _ in 0..count {
        current = current.checked_add_signed(step).ok_or_else(out_of_range)?;
        timestamps.push(current);
    }

    Ok(timestamps)
}
