//! Wraparound-aware heading smoothing

use log::warn;

use crate::math::{FULL_TURN, HALF_TURN, normalize_degrees};
use crate::types::Heading;

/// Default smoothing factor: each update moves 1% of the way to the new reading
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.01;

/// Low-pass filter one heading sample against the previous output
///
/// Headings are circular, so `current` is first shifted by a full turn when
/// that brings it within 180° of `previous`. The filter then always moves
/// along the shorter arc: going from 359° towards 1° passes through 0°
/// instead of sweeping back through 180°.
///
/// The returned value is wrapped into `[0, 360)`.
///
/// # Arguments
/// * `current` - New heading in degrees
/// * `previous` - Previous filter output in degrees
/// * `smoothing_factor` - Weight of the new heading, `0..=1`
///
/// # Example
/// ```
/// use compass_heading::smoother::smooth;
///
/// let filtered = smooth(1.0, 359.0, 0.01);
/// assert!((filtered - 359.02).abs() < 1e-3);
/// ```
pub fn smooth(current: f32, previous: f32, smoothing_factor: f32) -> f32 {
    let mut current = current;
    if current - previous > HALF_TURN {
        current -= FULL_TURN;
    } else if previous - current > HALF_TURN {
        current += FULL_TURN;
    }

    let filtered = previous + smoothing_factor * (current - previous);
    normalize_degrees(filtered)
}

/// Stateful heading smoother
///
/// Single-pole low-pass filter over headings. Holds the last output, which is
/// both the displayed heading and the reference for the next update. Starts
/// at 0° (north).
///
/// # Example
/// ```
/// use compass_heading::{Heading, HeadingSmoother};
///
/// let mut smoother = HeadingSmoother::new(0.01);
/// for _ in 0..2000 {
///     smoother.update(Heading::new(90.0));
/// }
/// assert!((smoother.heading().degrees() - 90.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSmoother {
    smoothing_factor: f32,
    previous: Heading,
}

impl HeadingSmoother {
    /// Create a smoother with the given smoothing factor, starting at north
    ///
    /// Factors above 1 are clamped to 1. Zero, negative and non-finite
    /// factors fall back to [`DEFAULT_SMOOTHING_FACTOR`].
    pub fn new(smoothing_factor: f32) -> Self {
        Self {
            smoothing_factor: process_smoothing_factor(smoothing_factor),
            previous: Heading::NORTH,
        }
    }

    /// Feed one heading and return the new smoothed heading
    pub fn update(&mut self, current: Heading) -> Heading {
        let filtered = smooth(
            current.degrees(),
            self.previous.degrees(),
            self.smoothing_factor,
        );
        self.previous = Heading::new(filtered);
        self.previous
    }

    /// Last smoothed heading
    pub fn heading(&self) -> Heading {
        self.previous
    }

    /// Smoothing factor in use
    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    /// Return to the initial state (heading 0°)
    pub fn reset(&mut self) {
        self.previous = Heading::NORTH;
    }
}

/// Bring a user-supplied smoothing factor into `(0, 1]`
fn process_smoothing_factor(smoothing_factor: f32) -> f32 {
    if smoothing_factor.is_finite() && smoothing_factor > 0.0 {
        smoothing_factor.min(1.0)
    } else {
        warn!(
            "Smoothing factor {} is unusable, using {}",
            smoothing_factor, DEFAULT_SMOOTHING_FACTOR
        );
        DEFAULT_SMOOTHING_FACTOR
    }
}

impl Default for HeadingSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}
