//! Compass service demonstration
//!
//! Two producer threads stand in for the accelerometer and magnetometer
//! callbacks, each running at its own rate. Both feed one `CompassService`,
//! which serializes their samples onto a single worker.
//!
//! Run with: `cargo run --example service`

use compass_heading::{CompassService, CompassSettings};
use nalgebra::Vector3;
use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    let (service, headings) = CompassService::spawn(CompassSettings {
        smoothing_factor: 0.05,
        ..Default::default()
    });
    let service = Arc::new(service);
    service.set_declination("-3.0")?;

    // Accelerometer at 50 Hz
    let gravity_producer = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for _ in 0..100 {
                if service.send_gravity(Vector3::new(0.05, 0.1, 9.8)).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(20));
            }
        })
    };

    // Magnetometer at 25 Hz, turning slowly clockwise
    let field_producer = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for i in 0..50 {
                let heading = (i as f32 * 3.0).to_radians();
                let field = Vector3::new(-22.0 * heading.sin(), 22.0 * heading.cos(), -40.0);
                if service.send_geomagnetic(field).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(40));
            }
        })
    };

    gravity_producer.join().map_err(|_| "gravity producer panicked")?;
    field_producer.join().map_err(|_| "field producer panicked")?;

    let received: Vec<_> = headings.try_iter().collect();
    println!("Received {} headings", received.len());
    for heading in received.iter().step_by(10) {
        println!("  {}", heading);
    }

    if let Some(latest) = service.latest_heading() {
        println!("Latest heading: {} ({:.2})", latest, latest.degrees());
    }

    Ok(())
}
