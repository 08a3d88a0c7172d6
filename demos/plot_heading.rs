//! Heading smoothing visualisation
//!
//! Replays the recorded sensor samples through a `CompassSession` and plots
//! the raw declination-corrected heading against the smoothed output, so the
//! effect of the filter (and of the 0°/360° wraparound handling) is visible.
//!
//! Run with: `cargo run --example plot_heading`

use compass_heading::{CompassSession, CompassSettings, adjust, estimate, parse_declination};
use nalgebra::Vector3;
use plotters::prelude::*;
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct SensorSample {
    #[serde(rename = "Time (s)")]
    time: f32,
    #[serde(rename = "Sensor")]
    sensor: String,
    #[serde(rename = "X")]
    x: f32,
    #[serde(rename = "Y")]
    y: f32,
    #[serde(rename = "Z")]
    z: f32,
}

const DECLINATION: &str = "0";

fn main() -> Result<(), Box<dyn Error>> {
    println!("Heading smoothing example");

    let mut reader = csv::Reader::from_path("testdata/compass_samples.csv")?;
    let mut samples = Vec::new();
    for result in reader.deserialize() {
        let record: SensorSample = result?;
        samples.push(record);
    }

    let settings = CompassSettings::default();
    let declination = parse_declination(DECLINATION)?;
    let mut session = CompassSession::with_settings(settings);

    let mut raw = Vec::new();
    let mut smoothed = Vec::new();
    let mut skipped = 0;

    println!("Processing {} sensor samples...", samples.len());

    for sample in &samples {
        let vector = Vector3::new(sample.x, sample.y, sample.z);
        let result = match sample.sensor.as_str() {
            "accelerometer" => session.on_gravity_sample(vector, DECLINATION),
            "magnetometer" => session.on_geomagnetic_sample(vector, DECLINATION),
            other => return Err(format!("unknown sensor {:?}", other).into()),
        };

        match result {
            Ok(Some(heading)) => {
                smoothed.push((sample.time, heading.degrees()));

                // Unfiltered heading from the same pair, for comparison
                let latest = (session.gravity(), session.geomagnetic());
                if let (Some(gravity), Some(geomagnetic)) = latest {
                    let angles = estimate(gravity, geomagnetic, &settings)?;
                    raw.push((sample.time, adjust(angles.azimuth, declination).degrees()));
                }
            }
            Ok(None) => {}
            Err(err) => {
                skipped += 1;
                println!("t={:.2}s: sample skipped ({})", sample.time, err);
            }
        }
    }

    println!("{} headings, {} samples skipped", smoothed.len(), skipped);

    create_plot(&raw, &smoothed)?;

    println!("✓ Plot saved to heading_plot.png");
    Ok(())
}

/// Plot raw and smoothed headings
///
/// Headings are shown in `[-180, 180)` so the turn across north reads as one
/// continuous line rather than a jump between the top and bottom of the chart.
fn create_plot(raw: &[(f32, f32)], smoothed: &[(f32, f32)]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("heading_plot.png", (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let start = smoothed.first().map(|(time, _)| *time).unwrap_or(0.0);
    let end = smoothed.last().map(|(time, _)| *time).unwrap_or(1.0);
    let centered = |degrees: f32| if degrees >= 180.0 { degrees - 360.0 } else { degrees };

    let mut chart = ChartBuilder::on(&root)
        .caption("Raw vs smoothed heading", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(start..end, -30f32..30f32)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Heading (degrees)")
        .draw()?;

    chart
        .draw_series(
            raw.iter()
                .map(|(time, heading)| Circle::new((*time, centered(*heading)), 1, RED.filled())),
        )?
        .label("Raw")
        .legend(|(x, y)| Circle::new((x + 5, y), 2, RED.filled()));

    chart
        .draw_series(LineSeries::new(
            smoothed
                .iter()
                .map(|(time, heading)| (*time, centered(*heading))),
            &BLUE,
        ))?
        .label("Smoothed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
