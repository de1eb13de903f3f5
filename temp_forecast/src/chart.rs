//! Chart rendering for forecast artifacts
//!
//! Charts are drawn with the SVG backend into a string owned by the call and
//! then base64 encoded, so no files or shared drawing state are involved.

use crate::config::ChartConfig;
use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::pipeline::ForecastPoint;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use plotters::coord::types::RangedDateTime;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

/// Media type of every rendered chart
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

type DrawResult<T> = std::result::Result<T, DrawingAreaErrorKind<std::io::Error>>;

/// A rendered chart in transport encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedChart {
    pub media_type: String,
    /// Base64 (standard alphabet, padded) image bytes
    pub base64: String,
}

impl EncodedChart {
    fn svg(document: &str) -> Self {
        Self {
            media_type: SVG_MEDIA_TYPE.to_string(),
            base64: STANDARD.encode(document.as_bytes()),
        }
    }

    /// `data:` URI suitable for embedding in HTML
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }

    /// Decode the payload back into image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.base64)
            .map_err(|e| ForecastError::RenderFailure(format!("invalid base64 payload: {}", e)))
    }
}

/// Chart caption for a city
pub fn chart_title(city: &str) -> String {
    format!("Future Forecast of Maximum Temperature in {}", city)
}

/// Render historical and forecast temperatures on one time axis.
///
/// The historical line is solid blue, the forecast line dashed red.
pub fn render_chart(
    city: &str,
    historical: &[Observation],
    forecast: &[ForecastPoint],
    config: &ChartConfig,
) -> Result<EncodedChart> {
    if historical.is_empty() || forecast.is_empty() {
        return Err(ForecastError::RenderFailure(
            "cannot draw a chart without historical and forecast points".to_string(),
        ));
    }

    let actual: Vec<_> = historical
        .iter()
        .map(|o| (o.timestamp, o.temperature))
        .collect();
    let predicted: Vec<_> = forecast
        .iter()
        .map(|p| (p.timestamp, p.temperature))
        .collect();

    let mut document = String::new();
    draw(&mut document, &chart_title(city), &actual, &predicted, config)
        .map_err(|e| ForecastError::RenderFailure(e.to_string()))?;

    tracing::debug!(
        bytes = document.len(),
        historical = actual.len(),
        forecast = predicted.len(),
        "rendered chart"
    );

    Ok(EncodedChart::svg(&document))
}

fn draw(
    document: &mut String,
    title: &str,
    actual: &[(DateTime<Utc>, f64)],
    predicted: &[(DateTime<Utc>, f64)],
    config: &ChartConfig,
) -> DrawResult<()> {
    let all = || actual.iter().chain(predicted.iter());

    let (min_dt, max_dt) = all().fold((actual[0].0, actual[0].0), |(lo, hi), (dt, _)| {
        (lo.min(*dt), hi.max(*dt))
    });
    let (min_temp, max_temp) = all().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), (_, t)| (lo.min(*t), hi.max(*t)),
    );
    let y_padding = if (max_temp - min_temp).abs() > 1e-6 {
        (max_temp - min_temp) * 0.1
    } else {
        1.0
    };

    let root = SVGBackend::with_string(document, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            RangedDateTime::from(min_dt..max_dt),
            (min_temp - y_padding)..(max_temp + y_padding),
        )?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Maximum Temperature (°C)")
        .x_label_formatter(&|dt: &DateTime<Utc>| dt.format("%Y-%m-%d %H:%M").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    chart
        .draw_series(LineSeries::new(actual.iter().copied(), BLUE.stroke_width(2)))?
        .label("Actual Data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(DashedLineSeries::new(
            predicted.iter().copied(),
            6,
            4,
            RED.stroke_width(2),
        ))?
        .label("Future Forecast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
