//! Core value types and settings for the compass heading library

use core::fmt;

use crate::math::normalize_degrees;

/// Compass heading in degrees
///
/// Always lies in `[0, 360)`, with 0° at north and angles increasing
/// clockwise when viewed from above. Construction wraps any finite input
/// into that range; infinite and NaN inputs become north.
///
/// # Example
/// ```
/// use compass_heading::Heading;
///
/// let heading = Heading::new(-90.0);
/// assert_eq!(heading.degrees(), 270.0);
/// assert_eq!(heading.to_string(), "270°");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Heading(f32);

impl Heading {
    /// North
    pub const NORTH: Heading = Heading(0.0);

    /// Create a heading, wrapping `degrees` into `[0, 360)`
    pub fn new(degrees: f32) -> Self {
        if !degrees.is_finite() {
            return Heading::NORTH;
        }
        Heading(normalize_degrees(degrees))
    }

    /// Heading in degrees, `[0, 360)`
    pub fn degrees(self) -> f32 {
        self.0
    }

    /// Heading truncated to whole degrees, as shown on a compass readout
    pub fn whole_degrees(self) -> u16 {
        self.0 as u16
    }

    /// Rotation to apply to a dial image so that north stays up
    ///
    /// A compass rose turns against the device, so this is the negated heading.
    pub fn dial_rotation(self) -> f32 {
        -self.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.whole_degrees())
    }
}

impl From<Heading> for f32 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

/// Device orientation angles in radians
///
/// Extracted from a rotation matrix. Azimuth lies in `(-π, π]`, with 0 when
/// the device's y axis points to magnetic north and positive angles turning
/// clockwise. Pitch and roll are provided for diagnostics; the heading
/// pipeline only consumes azimuth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationAngles {
    /// Rotation about the down axis, radians
    pub azimuth: f32,
    /// Rotation about the device x axis, radians
    pub pitch: f32,
    /// Rotation about the device y axis, radians
    pub roll: f32,
}

/// What a session does with declination text that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclinationPolicy {
    /// Fail the update cycle and leave the heading untouched
    #[default]
    Strict,
    /// Log a warning and carry on with a declination of zero
    TreatAsZero,
}

/// Compass settings
///
/// Configuration parameters for a [`CompassSession`](crate::CompassSession).
///
/// # Example
/// ```
/// use compass_heading::{CompassSettings, DeclinationPolicy};
///
/// let settings = CompassSettings {
///     smoothing_factor: 0.05,                          // faster response
///     declination_policy: DeclinationPolicy::TreatAsZero,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassSettings {
    /// Weight given to each new heading by the low-pass filter (typically 0.01)
    ///
    /// Lower values suppress more jitter but make the needle slower to settle.
    /// Values above 1 are clamped to 1; zero, negative and non-finite values
    /// are replaced by the default.
    pub smoothing_factor: f32,
    /// Minimum magnitude for a gravity or geomagnetic vector to be usable
    ///
    /// Expressed in the sensor's own units. Anything shorter is treated as a
    /// zero reading.
    pub min_vector_magnitude: f32,
    /// Minimum sine of the angle between gravity and the magnetic field
    ///
    /// Below this the horizontal field component vanishes and east cannot be
    /// determined.
    pub min_field_inclination_sine: f32,
    /// Handling of unparseable declination text
    pub declination_policy: DeclinationPolicy,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.01,
            min_vector_magnitude: 1e-3,
            min_field_inclination_sine: 1e-3,
            declination_policy: DeclinationPolicy::default(),
        }
    }
}
