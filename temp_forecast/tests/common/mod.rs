#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::f64::consts::PI;

/// Monday 2024-01-01 00:00 UTC
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Payload with `n` hourly entries starting at `start`, temperature `f(i)`
pub fn hourly_payload(start: DateTime<Utc>, n: usize, f: impl Fn(usize) -> f64) -> Value {
    let list: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "dt": start.timestamp() + 3600 * i as i64,
                "main": {"temp": f(i) - 1.0, "temp_max": f(i), "temp_min": f(i) - 2.0},
                "weather": [{"main": "Clouds"}]
            })
        })
        .collect();
    json!({"cod": "200", "cnt": n, "list": list, "city": {"name": "Somewhere"}})
}

/// Daily sine wave around 25 °C
pub fn sine(i: usize) -> f64 {
    25.0 + 5.0 * (2.0 * PI * (i % 24) as f64 / 24.0).sin()
}

pub fn sine_payload(n: usize) -> Value {
    hourly_payload(start(), n, sine)
}
