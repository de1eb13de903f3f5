//! Forecast payload normalisation into a time-indexed temperature series

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the epoch-milliseconds column
pub const TIME_COLUMN: &str = "dt";
/// Name of the maximum-temperature column
pub const TEMPERATURE_COLUMN: &str = "Temp_Max";

/// One historical (timestamp, temperature) data point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    /// Maximum temperature in °C
    pub temperature: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    dt: i64,
    main: RawMain,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp_max: f64,
}

/// Normalised historical series, sorted by time with unique timestamps
#[derive(Debug, Clone)]
pub struct TemperatureSeries {
    /// Data frame with `dt` (epoch ms) and `Temp_Max` columns
    df: DataFrame,
}

/// Converts raw forecast payloads into [`TemperatureSeries`]
#[derive(Debug)]
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Normalise a payload given as JSON text
    pub fn from_json_str(payload: &str) -> Result<TemperatureSeries> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ForecastError::MalformedPayload(format!("invalid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Normalise an already parsed payload.
    ///
    /// The payload must carry a `list` array whose entries each hold an
    /// integer `dt` (epoch seconds) and a numeric `main.temp_max`.
    pub fn from_value(payload: &Value) -> Result<TemperatureSeries> {
        let entries = payload
            .get("list")
            .ok_or_else(|| ForecastError::MalformedPayload("missing field `list`".to_string()))?
            .as_array()
            .ok_or_else(|| {
                ForecastError::MalformedPayload("field `list` is not an array".to_string())
            })?;

        let mut observations = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let raw = RawEntry::deserialize(entry).map_err(|e| {
                ForecastError::MalformedPayload(format!("entry {}: {}", i, e))
            })?;
            let timestamp = DateTime::from_timestamp(raw.dt, 0).ok_or_else(|| {
                ForecastError::MalformedPayload(format!(
                    "entry {}: timestamp {} is out of range",
                    i, raw.dt
                ))
            })?;
            observations.push(Observation::new(timestamp, raw.main.temp_max));
        }

        Self::from_observations(observations)
    }

    /// Sort and de-duplicate observations into a series.
    ///
    /// When a timestamp repeats, the observation that came last wins.
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<TemperatureSeries> {
        if observations.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        if let Some(bad) = observations.iter().find(|o| !o.temperature.is_finite()) {
            return Err(ForecastError::MalformedPayload(format!(
                "non-finite temperature at {}",
                bad.timestamp
            )));
        }

        let raw_count = observations.len();
        // stable sort keeps payload order within equal timestamps
        observations.sort_by_key(|o| o.timestamp);

        let mut unique: Vec<Observation> = Vec::with_capacity(raw_count);
        for obs in observations {
            match unique.last_mut() {
                Some(last) if last.timestamp == obs.timestamp => *last = obs,
                _ => unique.push(obs),
            }
        }

        tracing::debug!(
            raw = raw_count,
            kept = unique.len(),
            duplicates = raw_count - unique.len(),
            "normalised forecast payload"
        );

        TemperatureSeries::from_sorted(&unique)
    }
}

impl TemperatureSeries {
    fn from_sorted(observations: &[Observation]) -> Result<Self> {
        let millis: Vec<i64> = observations
            .iter()
            .map(|o| o.timestamp.timestamp_millis())
            .collect();
        let temps: Vec<f64> = observations.iter().map(|o| o.temperature).collect();

        let df = df!(
            TIME_COLUMN => millis,
            TEMPERATURE_COLUMN => temps
        )?;

        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the timestamps as a vector
    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let col = self.df.column(TIME_COLUMN)?.i64()?;
        col.into_iter()
            .flatten()
            .map(|ms| {
                DateTime::from_timestamp_millis(ms).ok_or_else(|| {
                    ForecastError::Frame(format!("timestamp {} ms is out of range", ms))
                })
            })
            .collect()
    }

    /// Get the temperatures as a vector
    pub fn temperatures(&self) -> Result<Vec<f64>> {
        let col = self.df.column(TEMPERATURE_COLUMN)?.f64()?;
        Ok(col.into_iter().flatten().collect())
    }

    /// Get the series as observations
    pub fn observations(&self) -> Result<Vec<Observation>> {
        let timestamps = self.timestamps()?;
        let temps = self.temperatures()?;
        Ok(timestamps
            .into_iter()
            .zip(temps)
            .map(|(t, v)| Observation::new(t, v))
            .collect())
    }

    /// Earliest timestamp
    pub fn first_timestamp(&self) -> Result<DateTime<Utc>> {
        self.timestamps()?
            .first()
            .copied()
            .ok_or(ForecastError::EmptySeries)
    }

    /// Latest timestamp, the anchor for the forecast horizon
    pub fn last_timestamp(&self) -> Result<DateTime<Utc>> {
        self.timestamps()?
            .last()
            .copied()
            .ok_or(ForecastError::EmptySeries)
    }

    /// Lowest temperature in the series
    pub fn min_temperature(&self) -> Result<f64> {
        self.temperatures()?
            .into_iter()
            .reduce(f64::min)
            .ok_or(ForecastError::EmptySeries)
    }

    /// Highest temperature in the series
    pub fn max_temperature(&self) -> Result<f64> {
        self.temperatures()?
            .into_iter()
            .reduce(f64::max)
            .ok_or(ForecastError::EmptySeries)
    }
}
