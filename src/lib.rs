#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! [![github]](https://github.com/wboayue/compass-heading)&ensp;[![crates-io]](https://crates.io/crates/compass-heading)&ensp;[![license]](https://opensource.org/licenses/MIT)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [license]: https://img.shields.io/badge/License-MIT-blue.svg?style=for-the-badge&labelColor=555555
//!
//! Compass Heading - a stable compass heading from accelerometer and magnetometer readings
//!
//! The library turns two independent 3-axis streams (gravity from an
//! accelerometer, the geomagnetic field from a magnetometer) into one heading:
//!
//! 1. Build a device-to-Earth rotation matrix from the latest pair of vectors
//!    and take its azimuth
//! 2. Add the user's magnetic declination and wrap into `[0, 360)`
//! 3. Low-pass filter the result along the shorter arc, so crossing north does
//!    not swing the needle through south
//!
//! Either stream may update at any rate; each sample is combined with the
//! most recent sample of the other stream.
//!
//! # Features
//!
//! - Tilt-compensated azimuth from the two-vector rotation matrix method
//! - Declination text parsing that tolerates partially typed input
//! - Wraparound-aware exponential smoothing
//! - Background service funnelling concurrent producers through one queue (`std`)
//! - `no_std` compatible core (disable default features)
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use compass_heading::CompassSession;
//!
//! let mut session = CompassSession::new();
//! let declination = "-1.5"; // degrees, as typed by the user
//!
//! // Call these from the sensor callbacks
//! session.on_gravity_sample(Vector3::new(0.1, 0.2, 9.8), declination).unwrap();
//! let heading = session
//!     .on_geomagnetic_sample(Vector3::new(3.0, 21.0, -41.0), declination)
//!     .unwrap();
//!
//! if let Some(heading) = heading {
//!     println!("{} (dial rotation {:.1})", heading, heading.dial_rotation());
//! }
//! ```
//!
//! For more documentation and examples, see: <https://github.com/wboayue/compass-heading>

pub mod declination;
mod error;
pub mod location;
mod math;
pub mod orientation;
#[cfg(feature = "std")]
pub mod service;
pub mod session;
pub mod smoother;
mod types;

// Re-export all public types and functions
pub use declination::{adjust, parse_declination};
pub use error::{CompassError, Degeneracy, Result};
pub use location::{FixedLocation, LocationProvider, Position};
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext, angular_difference, normalize_degrees};
pub use orientation::{RotationMatrix, estimate, rotation_matrix};
#[cfg(feature = "std")]
pub use service::{COMMAND_QUEUE_CAPACITY, CompassCommand, CompassService};
pub use session::{CompassSession, SensorEvent};
pub use smoother::{HeadingSmoother, smooth};
pub use types::*;
