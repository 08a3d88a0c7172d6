//! Two-vector orientation estimation
//!
//! Builds a device-to-Earth rotation matrix from one gravity reading and one
//! geomagnetic reading, then extracts azimuth, pitch and roll from it.
//!
//! Device axes follow the usual handheld layout: x to the right of the
//! screen, y towards the top of the screen, z out of the screen. The gravity
//! vector is the accelerometer reading at rest, which points *up* (a device
//! lying flat reads roughly `(0, 0, 9.81)`).

use core::f32::consts::PI;

use nalgebra::{Matrix3, Vector3};

use crate::error::{CompassError, Degeneracy, Result};
use crate::math::Vector3Ext;
use crate::types::{CompassSettings, OrientationAngles};

/// Rotation from device coordinates to Earth coordinates
///
/// Rows are the device-frame components of East, North and Up, so multiplying
/// a device-frame vector by this matrix yields its (east, north, up) components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(Matrix3<f32>);

impl RotationMatrix {
    /// Underlying 3x3 matrix
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.0
    }

    /// Matrix entries in row-major order
    #[rustfmt::skip]
    pub fn to_row_major(&self) -> [f32; 9] {
        let m = &self.0;
        [
            m[(0, 0)], m[(0, 1)], m[(0, 2)],
            m[(1, 0)], m[(1, 1)], m[(1, 2)],
            m[(2, 0)], m[(2, 1)], m[(2, 2)],
        ]
    }

    /// Extract azimuth, pitch and roll
    ///
    /// Azimuth is reported in `(-π, π]`; an `atan2` result of exactly `-π`
    /// is folded to `π`.
    pub fn orientation(&self) -> OrientationAngles {
        let m = &self.0;

        let mut azimuth = m[(0, 1)].atan2(m[(1, 1)]);
        if azimuth <= -PI {
            azimuth = PI;
        }

        // Rounding can push |sin| fractionally past 1
        let pitch = (-m[(2, 1)]).clamp(-1.0, 1.0).asin();
        let roll = (-m[(2, 0)]).atan2(m[(2, 2)]);

        OrientationAngles {
            azimuth,
            pitch,
            roll,
        }
    }
}

/// Build the device-to-Earth rotation matrix
///
/// Gravity gives the up axis. The cross product of the geomagnetic field with
/// gravity gives east, and up × east completes the basis with north.
///
/// # Errors
/// [`CompassError::InvalidVector`] when either vector is shorter than
/// `settings.min_vector_magnitude`, contains a non-finite component, or when
/// the two vectors are too close to parallel for east to be defined.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{CompassSettings, orientation::rotation_matrix};
///
/// let gravity = Vector3::new(0.0, 0.0, 9.81);       // lying flat
/// let geomagnetic = Vector3::new(0.0, 22.0, -40.0); // top edge towards north
/// let rotation = rotation_matrix(gravity, geomagnetic, &CompassSettings::default()).unwrap();
/// assert!(rotation.orientation().azimuth.abs() < 1e-6);
/// ```
pub fn rotation_matrix(
    gravity: Vector3<f32>,
    geomagnetic: Vector3<f32>,
    settings: &CompassSettings,
) -> Result<RotationMatrix> {
    if !gravity.is_finite() {
        return Err(CompassError::InvalidVector(Degeneracy::Gravity));
    }
    if !geomagnetic.is_finite() {
        return Err(CompassError::InvalidVector(Degeneracy::Geomagnetic));
    }

    let up = gravity
        .checked_normalize(settings.min_vector_magnitude)
        .ok_or(CompassError::InvalidVector(Degeneracy::Gravity))?;
    let field = geomagnetic
        .checked_normalize(settings.min_vector_magnitude)
        .ok_or(CompassError::InvalidVector(Degeneracy::Geomagnetic))?;

    // |field × up| is the sine of the angle between the two unit vectors
    let east = field
        .cross(&up)
        .checked_normalize(settings.min_field_inclination_sine)
        .ok_or(CompassError::InvalidVector(Degeneracy::Collinear))?;
    let north = up.cross(&east);

    Ok(RotationMatrix(Matrix3::from_rows(&[
        east.transpose(),
        north.transpose(),
        up.transpose(),
    ])))
}

/// Estimate device orientation from the latest gravity and geomagnetic readings
///
/// Pure function of its inputs: calling it again with a stale reading for one
/// of the vectors is always safe.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{CompassSettings, orientation::estimate};
///
/// let gravity = Vector3::new(0.0, 0.0, 9.81);
/// let geomagnetic = Vector3::new(-22.0, 0.0, -40.0); // top edge towards east
/// let angles = estimate(gravity, geomagnetic, &CompassSettings::default()).unwrap();
/// assert!((angles.azimuth.to_degrees() - 90.0).abs() < 1e-3);
/// ```
pub fn estimate(
    gravity: Vector3<f32>,
    geomagnetic: Vector3<f32>,
    settings: &CompassSettings,
) -> Result<OrientationAngles> {
    rotation_matrix(gravity, geomagnetic, settings).map(|rotation| rotation.orientation())
}
