use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde_json::{json, Value};
use std::f64::consts::PI;
use std::path::PathBuf;
use temp_forecast::{ForecastPipeline, ForecastRequest, Horizon, PipelineConfig};

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,temp_forecast=debug".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}

/// Five days of 3-hourly entries shaped like an OpenWeather forecast response
fn synthetic_payload() -> Value {
    let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let noise = Normal::new(0.0, 0.4).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let list: Vec<Value> = (0..40)
        .map(|i| {
            let ts = start + Duration::hours(3 * i);
            let hour = (3 * i % 24) as f64;
            let temp = 29.0 + 4.0 * (2.0 * PI * (hour - 9.0) / 24.0).sin() + noise.sample(&mut rng);
            json!({"dt": ts.timestamp(), "main": {"temp_max": temp}})
        })
        .collect();

    json!({"cod": "200", "cnt": list.len(), "list": list})
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    // Optional arguments: city label and day count
    let mut args = std::env::args().skip(1);
    let city = args.next().unwrap_or_else(|| "Jakarta".to_string());
    let days = args.next().unwrap_or_else(|| "2".to_string());

    let config = PipelineConfig::from_env()?;
    let pipeline = ForecastPipeline::new(config)?;
    let payload = synthetic_payload();

    let report = pipeline.fit_and_evaluate(&payload)?;
    println!("{}", report);

    let request = ForecastRequest::new(city, Horizon::parse(&days)?.days().into());
    let artifact = pipeline.run(&payload, &request)?;

    println!(
        "Forecast for {} over {} day(s), {} hourly points:",
        artifact.city,
        artifact.horizon_days,
        artifact.forecast.len()
    );
    for point in artifact.forecast.iter().step_by(6) {
        println!(
            "  {}  {:.2} °C",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.temperature
        );
    }

    let chart_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("synthetic_forecast.svg");
    if let Some(dir) = chart_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&chart_path, artifact.chart.decode()?)?;
    println!("Chart written to {}", chart_path.display());

    Ok(())
}
