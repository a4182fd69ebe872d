//! Stellargeom: angle, sky position and clock value types for amateur astronomy
//!
//! Every angular quantity is an [`Angle`] holding one canonical value in
//! radians, readable as degrees, radians or hour angle and formatted or parsed
//! in decimal and sexagesimal notations. Composite types build on it:
//!
//! - [`GeoCoordinate`]: an observer's latitude and longitude
//! - [`SkyPosition`]: a target in the horizontal or equatorial frame
//! - [`MountPosition`]: the hour angle / declination pointing of an
//!   equatorial mount, with a motor-angle mapping
//! - [`Clock`]: one instant read as universal, local civil or sidereal time
//!
//! ```rust
//! use stellargeom::{Angle, AngleUnit, Clock, GeoCoordinate, SkyPosition};
//!
//! let observer = GeoCoordinate::from_degrees(52.0, 0.0).unwrap();
//! let target = SkyPosition::equatorial(
//!     Angle::parse("06:00:00", AngleUnit::Hours).unwrap(),
//!     Angle::from_degrees(20.0).unwrap(),
//! )
//! .unwrap();
//!
//! let at = Clock::from_julian_date(2_460_000.5).unwrap();
//! let horizontal = target.to_horizontal(&observer, &at);
//! assert!(horizontal.altitude().degrees().abs() <= 90.0);
//! ```

use thiserror::Error;

pub mod constants;
pub mod coordinates;
pub mod framelib;
pub mod time;

// Re-export commonly used types
pub use coordinates::{
    Angle, AngleRange, AngleUnit, ComponentStyle, FormatOptions, GeoCoordinate, Sexagesimal,
    SignStyle,
};
pub use framelib::{
    AxisCalibration, Equatorial, Horizontal, MotorAngles, MountCalibration, MountPosition,
    SkyPosition,
};
pub use time::{Clock, TimeScale};

/// Main error type for the stellargeom library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    #[error("Invalid angle: {0} is not a finite number")]
    InvalidAngle(f64),

    #[error("Parse error at '{input}': {reason}")]
    ParseError { input: String, reason: String },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Undefined transform: {0}")]
    UndefinedTransform(String),

    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Invalid mount calibration: {0}")]
    InvalidCalibration(String),
}

impl GeomError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        GeomError::ParseError {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for stellargeom operations
pub type Result<T> = std::result::Result<T, GeomError>;
