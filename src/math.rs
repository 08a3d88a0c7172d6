//! Angle helpers and nalgebra extensions shared by the compass modules

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Full turn in degrees
pub const FULL_TURN: f32 = 360.0;

/// Half turn in degrees
pub const HALF_TURN: f32 = 180.0;

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Values already in range come back bit-for-bit unchanged. Tiny negative
/// inputs whose wrapped value rounds up to 360 fold to 0.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % FULL_TURN;
    // + 0.0 turns -0.0 into 0.0
    let wrapped = if wrapped < 0.0 { wrapped + FULL_TURN } else { wrapped + 0.0 };
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Shortest signed distance from `from` to `to`, in degrees
pub fn angular_difference(from: f32, to: f32) -> f32 {
    let difference = normalize_degrees(to - from);
    if difference > HALF_TURN {
        difference - FULL_TURN
    } else {
        difference
    }
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, or `None` when its magnitude is below `min_magnitude`
    fn checked_normalize(&self, min_magnitude: f32) -> Option<Vector3<f32>>;

    /// True when every component is finite
    fn is_finite(&self) -> bool;
}

impl Vector3Ext for Vector3<f32> {
    fn checked_normalize(&self, min_magnitude: f32) -> Option<Vector3<f32>> {
        let magnitude = self.norm();
        if magnitude.is_finite() && magnitude >= min_magnitude && magnitude > 0.0 {
            Some(*self / magnitude)
        } else {
            None
        }
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|component| component.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!((normalize_degrees(450.0) - 90.0).abs() < 1e-4);
        assert!((normalize_degrees(-725.0) - 355.0).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_degrees_tiny_negative() {
        // -1e-6 + 360 rounds to 360 in f32
        let wrapped = normalize_degrees(-1e-6);
        assert!((0.0..360.0).contains(&wrapped), "got {}", wrapped);
        assert!(normalize_degrees(-0.0).is_sign_positive());
    }

    #[test]
    fn test_normalize_degrees_keeps_in_range_values() {
        for degrees in [0.1f32, 179.99, 271.123_45, 359.999] {
            assert_eq!(normalize_degrees(degrees), degrees);
        }
    }

    #[test]
    fn test_angular_difference() {
        assert!((angular_difference(359.0, 1.0) - 2.0).abs() < 1e-4);
        assert!((angular_difference(1.0, 359.0) + 2.0).abs() < 1e-4);
        assert!((angular_difference(90.0, 180.0) - 90.0).abs() < 1e-4);
        assert_eq!(angular_difference(42.0, 42.0), 0.0);
    }

    #[test]
    fn test_vector_extensions() {
        let v = Vector3::new(3.0f32, 4.0, 0.0);
        let normalized = v.checked_normalize(1e-3).unwrap();
        assert!((normalized.magnitude() - 1.0).abs() < 1e-6);

        assert!(Vector3::<f32>::zeros().checked_normalize(1e-3).is_none());
        assert!(Vector3::new(1e-4f32, 0.0, 0.0).checked_normalize(1e-3).is_none());
        assert!(!Vector3::new(f32::NAN, 0.0, 1.0).is_finite());
        assert!(Vector3::new(0.0f32, 9.8, 0.0).is_finite());
    }
}
