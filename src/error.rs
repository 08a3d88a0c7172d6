//! Error types for heading computation

use core::num::ParseFloatError;
use thiserror::Error;

/// Result type for compass operations
pub type Result<T> = core::result::Result<T, CompassError>;

/// Which input made the orientation indeterminate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Gravity vector is near zero or not finite
    Gravity,
    /// Geomagnetic vector is near zero or not finite
    Geomagnetic,
    /// Gravity and geomagnetic field are (nearly) parallel, so east is undefined
    Collinear,
}

impl core::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Degeneracy::Gravity => f.write_str("gravity vector is degenerate"),
            Degeneracy::Geomagnetic => f.write_str("geomagnetic vector is degenerate"),
            Degeneracy::Collinear => {
                f.write_str("gravity and geomagnetic vectors are collinear")
            }
        }
    }
}

/// Errors produced while turning sensor samples into a heading
///
/// None of these are fatal: a failed cycle leaves the smoothed heading as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompassError {
    /// Rotation matrix cannot be built from the current vectors
    #[error("invalid vector: {0}")]
    InvalidVector(Degeneracy),

    /// Declination text is not a number
    #[error("invalid declination: {0}")]
    InvalidDeclination(#[from] ParseFloatError),

    /// Declination text parsed to infinity or NaN
    #[error("declination must be finite, got {0}")]
    NonFiniteDeclination(f32),

    /// The background compass service is no longer running
    #[error("compass service stopped")]
    ServiceStopped,
}
