//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object or an empty
//! environment yields a usable configuration.

use crate::error::{ForecastError, Result};
use crate::features::FutureFeatureScheme;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tree_math::BoostingParams;

/// Prefix of the environment variables read by [`PipelineConfig::from_env`]
pub const ENV_PREFIX: &str = "TEMP_FORECAST_";

/// Chart canvas size in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Settings for one forecast pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub boosting: BoostingParams,
    /// Share of observations held out for evaluation
    pub test_ratio: f64,
    /// Seed of the train/test shuffle
    pub split_seed: u64,
    /// Time budget for model fitting in milliseconds, 0 disables it
    pub fit_timeout_ms: u64,
    /// Horizons longer than this are logged as a warning
    pub horizon_warn_days: u32,
    /// Horizons longer than this are rejected when set
    pub max_horizon_days: Option<u32>,
    pub future_features: FutureFeatureScheme,
    pub chart: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            boosting: BoostingParams::default(),
            test_ratio: 0.2,
            split_seed: 42,
            fit_timeout_ms: 10_000,
            horizon_warn_days: 14,
            max_horizon_days: None,
            future_features: FutureFeatureScheme::Calendar,
            chart: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ForecastError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `TEMP_FORECAST_*` environment variables on the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_parse("SPLIT_SEED")? {
            config.split_seed = v;
        }
        if let Some(v) = env_parse("TEST_RATIO")? {
            config.test_ratio = v;
        }
        if let Some(v) = env_parse("FIT_TIMEOUT_MS")? {
            config.fit_timeout_ms = v;
        }
        if let Some(v) = env_parse("HORIZON_WARN_DAYS")? {
            config.horizon_warn_days = v;
        }
        if let Some(v) = env_parse("MAX_HORIZON_DAYS")? {
            config.max_horizon_days = Some(v);
        }
        if let Some(v) = env_parse("BOOST_ROUNDS")? {
            config.boosting.n_rounds = v;
        }
        if let Some(v) = env_parse("BOOST_SEED")? {
            config.boosting.seed = v;
        }
        if let Some(v) = env_optional("FUTURE_FEATURES") {
            config.future_features = match v.as_str() {
                "calendar" => FutureFeatureScheme::Calendar,
                "positional" => FutureFeatureScheme::Positional,
                other => {
                    return Err(ForecastError::InvalidConfig(format!(
                        "{}FUTURE_FEATURES must be `calendar` or `positional`, got {:?}",
                        ENV_PREFIX, other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check ranges of every setting
    pub fn validate(&self) -> Result<()> {
        self.boosting.validate()?;
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ForecastError::InvalidConfig(
                "chart dimensions must be non-zero".to_string(),
            ));
        }
        if self.max_horizon_days == Some(0) {
            return Err(ForecastError::InvalidConfig(
                "max_horizon_days must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Fitting budget, `None` when disabled
    pub fn fit_timeout(&self) -> Option<Duration> {
        (self.fit_timeout_ms > 0).then(|| Duration::from_millis(self.fit_timeout_ms))
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, key))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env_optional(key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            ForecastError::InvalidConfig(format!("invalid {}{}: {:?}", ENV_PREFIX, key, raw))
        }),
    }
}
