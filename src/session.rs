//! Compass session: latest sensor vectors plus the heading filter
//!
//! Gravity and geomagnetic samples arrive on independent streams at their own
//! rates. Every sample from either stream triggers a full update using the
//! latest value of the other one, however old that value is:
//!
//! ```text
//! sample -> estimate(gravity, geomagnetic) -> adjust(declination) -> smooth -> heading
//! ```
//!
//! The session owns all mutable state and takes `&mut self` for updates, so a
//! caller with several producers must funnel them through one owner (see
//! [`CompassService`](crate::CompassService) with the `std` feature).

use log::{debug, trace, warn};
use nalgebra::Vector3;

use crate::declination::{adjust, parse_declination};
use crate::error::Result;
use crate::orientation::estimate;
use crate::smoother::HeadingSmoother;
use crate::types::{CompassSettings, DeclinationPolicy, Heading, OrientationAngles};

/// A raw sample from one of the two vector streams
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Accelerometer-derived gravity vector (device frame)
    Gravity(Vector3<f32>),
    /// Magnetometer reading (device frame)
    Geomagnetic(Vector3<f32>),
}

/// Heading computation state for one sensing session
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::CompassSession;
///
/// let mut session = CompassSession::new();
///
/// // Nothing to report until both streams have delivered a sample
/// let heading = session.on_gravity_sample(Vector3::new(0.0, 0.0, 9.81), "").unwrap();
/// assert!(heading.is_none());
///
/// let heading = session
///     .on_geomagnetic_sample(Vector3::new(-22.0, 0.0, -40.0), "")
///     .unwrap()
///     .unwrap();
///
/// // The filter starts at north and moves 1% towards east per sample
/// assert!((heading.degrees() - 0.9).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct CompassSession {
    settings: CompassSettings,
    gravity: Option<Vector3<f32>>,
    geomagnetic: Option<Vector3<f32>>,
    orientation: Option<OrientationAngles>,
    smoother: HeadingSmoother,
}

impl CompassSession {
    /// Create a session with default settings
    pub fn new() -> Self {
        Self::with_settings(CompassSettings::default())
    }

    /// Create a session with the given settings
    ///
    /// An unusable `smoothing_factor` is replaced as described in
    /// [`HeadingSmoother::new`].
    pub fn with_settings(settings: CompassSettings) -> Self {
        let smoother = HeadingSmoother::new(settings.smoothing_factor);
        Self {
            settings: CompassSettings {
                smoothing_factor: smoother.smoothing_factor(),
                ..settings
            },
            gravity: None,
            geomagnetic: None,
            orientation: None,
            smoother,
        }
    }

    /// Settings in use, after processing
    pub fn settings(&self) -> CompassSettings {
        self.settings
    }

    /// Handle a new gravity vector
    ///
    /// See [`update`](Self::update) for the return value.
    pub fn on_gravity_sample(
        &mut self,
        gravity: Vector3<f32>,
        declination_text: &str,
    ) -> Result<Option<Heading>> {
        self.update(SensorEvent::Gravity(gravity), declination_text)
    }

    /// Handle a new geomagnetic vector
    ///
    /// See [`update`](Self::update) for the return value.
    pub fn on_geomagnetic_sample(
        &mut self,
        geomagnetic: Vector3<f32>,
        declination_text: &str,
    ) -> Result<Option<Heading>> {
        self.update(SensorEvent::Geomagnetic(geomagnetic), declination_text)
    }

    /// Store a sample and run one update cycle
    ///
    /// The sample replaces the previous value of its stream before anything
    /// else happens, so it is kept even when this cycle fails.
    ///
    /// # Returns
    /// - `Ok(Some(heading))` with the new smoothed heading
    /// - `Ok(None)` while the other stream has not delivered anything yet
    ///
    /// # Errors
    /// Degenerate vectors or unusable declination text. The smoothed heading
    /// is left untouched and the next sample is processed normally.
    pub fn update(
        &mut self,
        event: SensorEvent,
        declination_text: &str,
    ) -> Result<Option<Heading>> {
        match event {
            SensorEvent::Gravity(gravity) => self.gravity = Some(gravity),
            SensorEvent::Geomagnetic(geomagnetic) => self.geomagnetic = Some(geomagnetic),
        }

        let (Some(gravity), Some(geomagnetic)) = (self.gravity, self.geomagnetic) else {
            debug!("Waiting for both sensor streams before reporting a heading");
            return Ok(None);
        };

        let orientation = estimate(gravity, geomagnetic, &self.settings).inspect_err(|err| {
            warn!("Dropping sample: {}", err);
        })?;
        self.orientation = Some(orientation);

        let declination = self.declination(declination_text)?;
        let heading = self.smoother.update(adjust(orientation.azimuth, declination));

        trace!(
            "azimuth={:.4} rad declination={} heading={:.3}",
            orientation.azimuth,
            declination,
            heading.degrees()
        );

        Ok(Some(heading))
    }

    /// Current smoothed heading (0° until the first successful update)
    pub fn heading(&self) -> Heading {
        self.smoother.heading()
    }

    /// Orientation from the most recent successful estimate
    pub fn latest_orientation(&self) -> Option<OrientationAngles> {
        self.orientation
    }

    /// Latest gravity vector, if one has arrived
    pub fn gravity(&self) -> Option<Vector3<f32>> {
        self.gravity
    }

    /// Latest geomagnetic vector, if one has arrived
    pub fn geomagnetic(&self) -> Option<Vector3<f32>> {
        self.geomagnetic
    }

    /// Start a new session: forget both vectors and reset the heading to 0°
    pub fn reset(&mut self) {
        self.gravity = None;
        self.geomagnetic = None;
        self.orientation = None;
        self.smoother.reset();
    }

    fn declination(&self, text: &str) -> Result<f32> {
        match parse_declination(text) {
            Ok(declination) => Ok(declination),
            Err(err) => match self.settings.declination_policy {
                DeclinationPolicy::Strict => {
                    warn!("Dropping sample: {}", err);
                    Err(err)
                }
                DeclinationPolicy::TreatAsZero => {
                    warn!("Ignoring declination {:?}: {}", text, err);
                    Ok(0.0)
                }
            },
        }
    }
}

impl Default for CompassSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompassError, Degeneracy};

    const EPSILON: f32 = 1e-3;

    fn flat() -> Vector3<f32> {
        Vector3::new(0.0, 0.0, 9.81)
    }

    fn field_for_heading(heading_deg: f32) -> Vector3<f32> {
        let heading = heading_deg.to_radians();
        Vector3::new(-22.0 * heading.sin(), 22.0 * heading.cos(), -40.0)
    }

    #[test]
    fn test_suppressed_until_both_streams_arrive() {
        let mut session = CompassSession::new();

        assert_eq!(session.on_geomagnetic_sample(field_for_heading(90.0), ""), Ok(None));
        assert_eq!(session.on_geomagnetic_sample(field_for_heading(80.0), ""), Ok(None));
        assert_eq!(session.heading(), Heading::NORTH);
        assert!(session.latest_orientation().is_none());

        let heading = session.on_gravity_sample(flat(), "").unwrap().unwrap();
        // Uses the latest field (80°), not the first one
        assert!((heading.degrees() - 0.8).abs() < EPSILON, "got {}", heading);
    }

    #[test]
    fn test_stale_operand_is_reused() {
        let mut session = CompassSession::new();
        session.on_gravity_sample(flat(), "").unwrap();

        let mut last = Heading::NORTH;
        for _ in 0..10 {
            last = session
                .on_geomagnetic_sample(field_for_heading(90.0), "")
                .unwrap()
                .unwrap();
        }
        assert!(last.degrees() > 8.0 && last.degrees() < 9.0, "got {}", last);
        assert_eq!(session.gravity(), Some(flat()));
    }

    #[test]
    fn test_declination_is_applied_every_cycle() {
        let mut session = CompassSession::with_settings(CompassSettings {
            smoothing_factor: 1.0,
            ..Default::default()
        });
        session.on_gravity_sample(flat(), "").unwrap();

        let heading = session
            .on_geomagnetic_sample(field_for_heading(90.0), "10")
            .unwrap()
            .unwrap();
        assert!((heading.degrees() - 100.0).abs() < EPSILON);

        let heading = session.on_gravity_sample(flat(), "-95").unwrap().unwrap();
        assert!((heading.degrees() - 355.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_sample_leaves_heading_unchanged() {
        let mut session = CompassSession::new();
        session.on_gravity_sample(flat(), "").unwrap();
        let before = session
            .on_geomagnetic_sample(field_for_heading(45.0), "")
            .unwrap()
            .unwrap();
        let orientation = session.latest_orientation();

        assert_eq!(
            session.on_gravity_sample(Vector3::zeros(), ""),
            Err(CompassError::InvalidVector(Degeneracy::Gravity))
        );
        assert_eq!(session.heading(), before);
        assert_eq!(session.latest_orientation(), orientation);

        // The zero vector is still the latest gravity, so magnetometer
        // samples fail too until a usable gravity sample arrives
        assert!(session.on_geomagnetic_sample(field_for_heading(45.0), "").is_err());
        assert_eq!(session.heading(), before);

        let after = session.on_gravity_sample(flat(), "").unwrap().unwrap();
        assert!(after.degrees() > before.degrees());
    }

    #[test]
    fn test_strict_declination_policy() {
        let mut session = CompassSession::new();
        session.on_gravity_sample(flat(), "").unwrap();
        let before = session
            .on_geomagnetic_sample(field_for_heading(45.0), "")
            .unwrap()
            .unwrap();

        let result = session.on_geomagnetic_sample(field_for_heading(45.0), "abc");
        assert!(matches!(result, Err(CompassError::InvalidDeclination(_))));
        assert_eq!(session.heading(), before);
    }

    #[test]
    fn test_lenient_declination_policy() {
        let mut strict = CompassSession::new();
        let mut lenient = CompassSession::with_settings(CompassSettings {
            declination_policy: DeclinationPolicy::TreatAsZero,
            ..Default::default()
        });

        for session in [&mut strict, &mut lenient] {
            session.on_gravity_sample(flat(), "").unwrap();
        }

        let expected = strict
            .on_geomagnetic_sample(field_for_heading(45.0), "0")
            .unwrap();
        let actual = lenient
            .on_geomagnetic_sample(field_for_heading(45.0), "east-ish")
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut session = CompassSession::new();
        session.on_gravity_sample(flat(), "").unwrap();
        session.on_geomagnetic_sample(field_for_heading(45.0), "").unwrap();
        assert!(session.heading().degrees() > 0.0);

        session.reset();
        assert_eq!(session.heading(), Heading::NORTH);
        assert!(session.gravity().is_none());
        assert!(session.geomagnetic().is_none());
        assert_eq!(session.on_gravity_sample(flat(), ""), Ok(None));
    }

    #[test]
    fn test_nan_smoothing_factor_keeps_heading_in_range() {
        let mut session = CompassSession::with_settings(CompassSettings {
            smoothing_factor: f32::NAN,
            ..Default::default()
        });
        assert_eq!(session.settings().smoothing_factor, 0.01);

        session.on_gravity_sample(flat(), "").unwrap();
        for _ in 0..10 {
            let heading = session
                .on_geomagnetic_sample(field_for_heading(90.0), "")
                .unwrap()
                .unwrap();
            assert!((0.0..360.0).contains(&heading.degrees()), "got {}", heading.degrees());
        }
        assert!(session.heading().degrees() > 0.0);
    }

    #[test]
    fn test_repeated_pair_converges_without_drift() {
        let mut session = CompassSession::with_settings(CompassSettings {
            smoothing_factor: 1.0,
            ..Default::default()
        });
        let gravity = Vector3::new(0.0, 9.8, 0.0);
        let geomagnetic = Vector3::new(0.0, 0.0, -50.0);

        session.on_gravity_sample(gravity, "0").unwrap();
        let first = session.on_geomagnetic_sample(geomagnetic, "0").unwrap().unwrap();
        let second = session.on_geomagnetic_sample(geomagnetic, "0").unwrap().unwrap();
        assert_eq!(first, second);
    }
}
