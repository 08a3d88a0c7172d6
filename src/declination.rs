//! Magnetic declination parsing and correction

use crate::error::{CompassError, Result};
use crate::math::RAD_TO_DEG;
use crate::types::Heading;

/// Parse user-entered declination text into degrees
///
/// Surrounding whitespace is ignored. Empty text and a lone sign (`"-"` or
/// `"+"`, what a user has typed halfway through entering a number) mean zero.
///
/// # Errors
/// - [`CompassError::InvalidDeclination`] if the text is not a number
/// - [`CompassError::NonFiniteDeclination`] if it parses to infinity or NaN
///
/// # Example
/// ```
/// use compass_heading::parse_declination;
///
/// assert_eq!(parse_declination("").unwrap(), 0.0);
/// assert_eq!(parse_declination("-").unwrap(), 0.0);
/// assert_eq!(parse_declination("5.5").unwrap(), 5.5);
/// assert!(parse_declination("abc").is_err());
/// ```
pub fn parse_declination(text: &str) -> Result<f32> {
    let text = text.trim();
    if text.is_empty() || text == "-" || text == "+" {
        return Ok(0.0);
    }

    let declination: f32 = text.parse()?;
    if !declination.is_finite() {
        return Err(CompassError::NonFiniteDeclination(declination));
    }

    Ok(declination)
}

/// Apply a declination offset to a magnetic azimuth
///
/// Converts the azimuth to degrees, adds the declination and wraps the sum
/// into `[0, 360)`.
///
/// # Arguments
/// * `azimuth` - Magnetic azimuth in radians
/// * `declination` - Declination in degrees, east positive
///
/// # Example
/// ```
/// use compass_heading::adjust;
///
/// let heading = adjust(core::f32::consts::FRAC_PI_2, -100.0);
/// assert!((heading.degrees() - 350.0).abs() < 1e-3);
/// ```
pub fn adjust(azimuth: f32, declination: f32) -> Heading {
    Heading::new(azimuth * RAD_TO_DEG + declination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DEG_TO_RAD;

    /// Circular distance, so 359.9999 and 0.0 compare as close
    fn circular_error(actual: f32, expected: f32) -> f32 {
        let diff = (actual - expected).abs() % 360.0;
        diff.min(360.0 - diff)
    }

    #[test]
    fn test_parse_accepted_blanks() {
        assert_eq!(parse_declination(""), Ok(0.0));
        assert_eq!(parse_declination("-"), Ok(0.0));
        assert_eq!(parse_declination("+"), Ok(0.0));
        assert_eq!(parse_declination("   "), Ok(0.0));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_declination("5.5"), Ok(5.5));
        assert_eq!(parse_declination("-12.25"), Ok(-12.25));
        assert_eq!(parse_declination(" 3 "), Ok(3.0));
        assert_eq!(parse_declination("0"), Ok(0.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_declination("abc"),
            Err(CompassError::InvalidDeclination(_))
        ));
        assert!(matches!(
            parse_declination("--5"),
            Err(CompassError::InvalidDeclination(_))
        ));
        assert!(matches!(
            parse_declination("5°"),
            Err(CompassError::InvalidDeclination(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(
            parse_declination("inf"),
            Err(CompassError::NonFiniteDeclination(_))
        ));
        assert!(matches!(
            parse_declination("NaN"),
            Err(CompassError::NonFiniteDeclination(_))
        ));
    }

    #[test]
    fn test_adjust_without_declination() {
        let heading = adjust(45.0 * DEG_TO_RAD, 0.0);
        assert!((heading.degrees() - 45.0).abs() < 1e-4);

        // Negative azimuths land in the western half
        let heading = adjust(-90.0 * DEG_TO_RAD, 0.0);
        assert!((heading.degrees() - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_adjust_with_declination() {
        let heading = adjust(10.0 * DEG_TO_RAD, 5.5);
        assert!((heading.degrees() - 15.5).abs() < 1e-4);

        let heading = adjust(170.0 * DEG_TO_RAD, 20.0);
        assert!((heading.degrees() - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_adjust_large_negative_declination() {
        // 10° - 370° = -360°, which wraps to 0°
        let heading = adjust(10.0 * DEG_TO_RAD, -370.0);
        assert!((0.0..360.0).contains(&heading.degrees()));
        assert!(
            circular_error(heading.degrees(), 0.0) < 1e-3,
            "expected ~0°, got {}",
            heading.degrees()
        );
    }

    #[test]
    fn test_adjust_range() {
        for azimuth_deg in (-179..=180).step_by(7) {
            for declination in [-725.0, -180.0, -0.5, 0.0, 12.0, 359.9, 1000.0] {
                let heading = adjust(azimuth_deg as f32 * DEG_TO_RAD, declination);
                assert!(
                    (0.0..360.0).contains(&heading.degrees()),
                    "azimuth {}° declination {} gave {}",
                    azimuth_deg,
                    declination,
                    heading.degrees()
                );
            }
        }
    }
}
