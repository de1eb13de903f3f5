//! Calendar features derived from timestamps
//!
//! Every model input is a [`FeatureRow`] of three categorical-numeric values:
//! hour of day, day of week (Monday = 0) and month. The row is a pure
//! function of its timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Number of features in a [`FeatureRow`]
pub const NUM_FEATURES: usize = 3;

/// Calendar-derived model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Hour of day, 0..=23
    pub hour: u32,
    /// Day of week, 0 (Monday) ..= 6 (Sunday)
    pub weekday: u32,
    /// Month, 1..=12
    pub month: u32,
}

impl FeatureRow {
    /// Derive the features of a timestamp
    pub fn from_timestamp(ts: DateTime<Utc>) -> Self {
        Self {
            hour: ts.hour(),
            weekday: ts.weekday().num_days_from_monday(),
            month: ts.month(),
        }
    }

    /// Features in model order: hour, weekday, month
    pub fn to_vec(&self) -> [f64; NUM_FEATURES] {
        [self.hour as f64, self.weekday as f64, self.month as f64]
    }

    /// Feature names for debugging/logging
    pub fn feature_names() -> [&'static str; NUM_FEATURES] {
        ["Hour", "Day", "Month"]
    }
}

/// How feature rows for the forecast horizon are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FutureFeatureScheme {
    /// Derive features from the synthesised future timestamps.
    ///
    /// This departs from the legacy forecast service, which used the
    /// [`Positional`](Self::Positional) formula. Months here follow the real
    /// calendar, so forecasts differ from that service once the horizon
    /// starts more than one day after the first observation.
    #[default]
    Calendar,
    /// Derive features from the row position, cycling months every 24 rows.
    ///
    /// Reproduces the legacy behaviour `hour = i % 24`,
    /// `weekday = (i / 24) % 7`, `month = (i / 24) % 12 + 1`. Month values do
    /// not follow the real calendar.
    Positional,
}

/// Map timestamps to feature rows, preserving order
pub fn build_features(timestamps: &[DateTime<Utc>]) -> Vec<FeatureRow> {
    timestamps.iter().map(|&ts| FeatureRow::from_timestamp(ts)).collect()
}

/// Positional feature rows for indices `start_index .. start_index + count`
pub fn positional_features(start_index: usize, count: usize) -> Vec<FeatureRow> {
    (start_index..start_index + count)
        .map(|i| FeatureRow {
            hour: (i % 24) as u32,
            weekday: ((i / 24) % 7) as u32,
            month: ((i / 24) % 12 + 1) as u32,
        })
        .collect()
}
