use compass_heading::{CompassSession, FixedLocation, LocationProvider, Position};
use nalgebra::Vector3;

fn main() {
    let mut session = CompassSession::new();
    let declination = "2.5"; // replace this with the user's declination in degrees

    // Position is a one-shot lookup, independent of the heading
    let mut location = FixedLocation::new(Position::new(47.6205, -122.3493, 56.0));
    match location.last_known_position() {
        Some(position) => println!("Position: {}", position),
        None => println!("Position unavailable"),
    }

    for _ in 0..10 {
        // these calls should happen each time the corresponding sensor reports
        let gravity = Vector3::new(0.0, 0.0, 9.81); // replace this with actual accelerometer data
        // replace this with actual magnetometer data
        let geomagnetic = Vector3::new(-15.0, 16.0, -40.0);

        let _ = session.on_gravity_sample(gravity, declination);

        match session.on_geomagnetic_sample(geomagnetic, declination) {
            Ok(Some(heading)) => println!(
                "Heading: {} ({:.2}), dial rotation: {:.2}",
                heading,
                heading.degrees(),
                heading.dial_rotation()
            ),
            Ok(None) => println!("Waiting for both sensors"),
            Err(err) => println!("Sample skipped: {}", err),
        }
    }
}
