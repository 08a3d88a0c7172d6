//! Device position from an external location provider
//!
//! Position is independent of the heading pipeline: a one-shot lookup that
//! either yields coordinates or nothing.

use core::fmt;

/// Geographic position of the device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
    /// Altitude in meters above the WGS84 ellipsoid
    pub altitude: f64,
}

impl Position {
    /// Create a position
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

impl fmt::Display for Position {
    /// Six decimal places per field, the precision of a platform fix readout
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:.6}, lon {:.6}, alt {:.6}",
            self.latitude, self.longitude, self.altitude
        )
    }
}

/// Source of the device's last known position
///
/// Implemented over whatever the platform offers (a GNSS receiver, an OS
/// location service). Permission handling belongs to the implementation.
pub trait LocationProvider {
    /// Last known position, or `None` when no fix is available
    fn last_known_position(&mut self) -> Option<Position>;
}

/// Provider that always reports the same position (or none)
///
/// # Example
/// ```
/// use compass_heading::{FixedLocation, LocationProvider, Position};
///
/// let mut provider = FixedLocation::new(Position::new(51.4779, -0.0015, 46.0));
/// assert_eq!(provider.last_known_position().unwrap().latitude, 51.4779);
///
/// let mut unavailable = FixedLocation::unavailable();
/// assert!(unavailable.last_known_position().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedLocation(Option<Position>);

impl FixedLocation {
    /// Provider reporting `position`
    pub fn new(position: Position) -> Self {
        FixedLocation(Some(position))
    }

    /// Provider that never has a fix
    pub fn unavailable() -> Self {
        FixedLocation(None)
    }
}

impl LocationProvider for FixedLocation {
    fn last_known_position(&mut self) -> Option<Position> {
        self.0
    }
}
