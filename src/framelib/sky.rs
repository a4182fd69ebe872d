//! Sky positions in the horizontal and equatorial frames
//!
//! Conversion between the frames goes through the local hour angle
//! `H = LST − α`. Positions are turned into unit vectors and rotated by
//!
//! ```text
//!     | −sin φ   0   cos φ |
//! M = |    0    −1     0   |
//!     |  cos φ   0   sin φ |
//! ```
//!
//! which maps (hour angle, declination) components onto (north, east, up)
//! components for an observer at latitude φ. `M` is symmetric and orthogonal,
//! so the same matrix performs the inverse rotation. Angles are recovered with
//! `atan2` only, which keeps the transform free of divisions at every latitude.
//!
//! Azimuth is measured from north through east. On a geographic pole, and for
//! a target exactly at the zenith or nadir, azimuth is undefined; the
//! conversion then reports azimuth 0 (north). [`Equatorial::try_to_horizontal`]
//! reports an error instead.

use std::fmt;

use log::{debug, trace};
use nalgebra::{Matrix3, Vector3};

use crate::constants::HALF_PI;
use crate::coordinates::angle::{Angle, AngleRange, AngleUnit};
use crate::coordinates::format::{FormatOptions, SignStyle};
use crate::coordinates::geo::GeoCoordinate;
use crate::time::Clock;
use crate::{GeomError, Result};

/// Horizontal components shorter than this leave the azimuth undefined
const AZIMUTH_SINGULARITY: f64 = 1e-12;

/// Rotation between (hour angle, declination) and (north, east, up) vectors
fn horizon_rotation(latitude: &Angle) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    Matrix3::new(
        -sin_lat, 0.0, cos_lat, //
        0.0, -1.0, 0.0, //
        cos_lat, 0.0, sin_lat,
    )
}

/// Unit vector for a longitude-like and a latitude-like spherical angle
fn unit_vector(longitude: &Angle, latitude: &Angle) -> Vector3<f64> {
    let (sin_lon, cos_lon) = longitude.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Inverse of [`unit_vector`]: (longitude-like, latitude-like) radians and
/// the length of the vector's horizontal part
fn spherical_angles(v: &Vector3<f64>) -> (f64, f64, f64) {
    let horizontal = v.x.hypot(v.y);
    (v.y.atan2(v.x), v.z.atan2(horizontal), horizontal)
}

/// Altitude and azimuth of a target seen by an observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    altitude: Angle,
    azimuth: Angle,
}

/// Right ascension and declination of a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    right_ascension: Angle,
    declination: Angle,
}

/// A target position in one of the two supported frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyPosition {
    Horizontal(Horizontal),
    Equatorial(Equatorial),
}

impl Horizontal {
    /// Creates a horizontal position; azimuth is wrapped into [0°, 360°)
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidCoordinate`] when |altitude| exceeds 90°.
    pub fn new(altitude: Angle, azimuth: Angle) -> Result<Self> {
        Ok(Horizontal {
            altitude: altitude.quarter_turn("altitude")?,
            azimuth: azimuth.normalized(AngleRange::FullTurn),
        })
    }

    pub fn altitude(&self) -> Angle {
        self.altitude
    }

    /// Azimuth from north through east, in [0, 2π)
    pub fn azimuth(&self) -> Angle {
        self.azimuth
    }

    /// Angular distance from the zenith
    pub fn zenith_distance(&self) -> Angle {
        Angle::from_parts(
            HALF_PI - self.altitude.radians(),
            AngleUnit::Degrees,
            AngleRange::Unbounded,
        )
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude.radians() > 0.0
    }

    /// Equatorial position of this target for `observer` at instant `at`
    pub fn to_equatorial(&self, observer: &GeoCoordinate, at: &Clock) -> Equatorial {
        let lst = at.local_sidereal_time(observer.longitude());
        self.to_equatorial_at_lst(observer, lst)
    }

    /// Equatorial position given the local sidereal time directly
    pub fn to_equatorial_at_lst(&self, observer: &GeoCoordinate, lst: Angle) -> Equatorial {
        let (hour_angle, declination) = self.to_hour_angle(observer);
        let right_ascension = lst.radians() - hour_angle;
        trace!(
            "alt {:.9} az {:.9} -> HA {:.9} dec {:.9} (LST {:.9})",
            self.altitude.radians(),
            self.azimuth.radians(),
            hour_angle,
            declination,
            lst.radians()
        );
        Equatorial {
            right_ascension: Angle::from_parts(
                right_ascension,
                AngleUnit::Hours,
                AngleRange::FullTurn,
            ),
            declination: Angle::from_parts(declination, AngleUnit::Degrees, AngleRange::HalfTurn),
        }
    }

    /// Hour angle and declination in radians
    fn to_hour_angle(&self, observer: &GeoCoordinate) -> (f64, f64) {
        // North/east/up components from azimuth (from north) and altitude
        let neu = unit_vector(&self.azimuth, &self.altitude);
        let equatorial = horizon_rotation(&observer.latitude()) * neu;
        let (hour_angle, declination, _) = spherical_angles(&equatorial);
        (hour_angle, declination)
    }
}

impl Equatorial {
    /// Creates an equatorial position; right ascension is wrapped into [0h, 24h)
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidCoordinate`] when |declination| exceeds 90°.
    pub fn new(right_ascension: Angle, declination: Angle) -> Result<Self> {
        Ok(Equatorial {
            right_ascension: right_ascension.normalized(AngleRange::FullTurn),
            declination: declination.quarter_turn("declination")?,
        })
    }

    /// Right ascension in [0, 2π)
    pub fn right_ascension(&self) -> Angle {
        self.right_ascension
    }

    pub fn declination(&self) -> Angle {
        self.declination
    }

    /// Horizontal position of this target for `observer` at instant `at`
    ///
    /// Where azimuth is undefined it is reported as 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::{Angle, Equatorial, GeoCoordinate};
    ///
    /// let (ra, dec) = (Angle::from_hours(6.0).unwrap(), Angle::from_degrees(20.0).unwrap());
    /// let target = Equatorial::new(ra, dec).unwrap();
    /// let observer = GeoCoordinate::from_degrees(52.0, 0.0).unwrap();
    ///
    /// // On the meridian: culminating due south
    /// let horizontal = target.to_horizontal_at_lst(&observer, Angle::from_hours(6.0).unwrap());
    /// assert!((horizontal.altitude().degrees() - 58.0).abs() < 1e-9);
    /// assert!((horizontal.azimuth().degrees() - 180.0).abs() < 1e-9);
    /// ```
    pub fn to_horizontal(&self, observer: &GeoCoordinate, at: &Clock) -> Horizontal {
        let lst = at.local_sidereal_time(observer.longitude());
        self.to_horizontal_at_lst(observer, lst)
    }

    /// Horizontal position given the local sidereal time directly
    pub fn to_horizontal_at_lst(&self, observer: &GeoCoordinate, lst: Angle) -> Horizontal {
        let (horizontal, defined) = self.horizontal_at_lst(observer, lst);
        if !defined {
            debug!(
                "azimuth undefined for dec {:.9} at latitude {:.9}, using north",
                self.declination.radians(),
                observer.latitude().radians()
            );
        }
        horizontal
    }

    /// Like [`Equatorial::to_horizontal`], but fails where azimuth is undefined
    ///
    /// # Errors
    ///
    /// [`GeomError::UndefinedTransform`] when the observer stands on a pole or
    /// the target is at the zenith or nadir.
    pub fn try_to_horizontal(&self, observer: &GeoCoordinate, at: &Clock) -> Result<Horizontal> {
        let lst = at.local_sidereal_time(observer.longitude());
        match self.horizontal_at_lst(observer, lst) {
            (horizontal, true) => Ok(horizontal),
            (horizontal, false) => Err(GeomError::UndefinedTransform(format!(
                "azimuth is undefined at altitude {:.6}° for latitude {:.6}°",
                horizontal.altitude.degrees(),
                observer.latitude().degrees()
            ))),
        }
    }

    /// Great-circle distance to another equatorial position
    pub fn separation(&self, other: &Equatorial) -> Angle {
        let a = unit_vector(&self.right_ascension, &self.declination);
        let b = unit_vector(&other.right_ascension, &other.declination);
        let radians = a.cross(&b).norm().atan2(a.dot(&b));
        Angle::from_parts(radians, AngleUnit::Degrees, AngleRange::Unbounded)
    }

    /// Horizontal position and whether its azimuth is defined
    fn horizontal_at_lst(&self, observer: &GeoCoordinate, lst: Angle) -> (Horizontal, bool) {
        let hour_angle = Angle::from_parts(
            lst.radians() - self.right_ascension.radians(),
            AngleUnit::Hours,
            AngleRange::HalfTurn,
        );
        let neu =
            horizon_rotation(&observer.latitude()) * unit_vector(&hour_angle, &self.declination);
        let (east_of_north, altitude, horizontal) = spherical_angles(&neu);

        let defined = !observer.is_polar() && horizontal >= AZIMUTH_SINGULARITY;
        let azimuth = if defined { east_of_north } else { 0.0 };
        trace!(
            "HA {:.9} dec {:.9} -> alt {:.9} az {:.9}",
            hour_angle.radians(),
            self.declination.radians(),
            altitude,
            azimuth
        );

        let horizontal = Horizontal {
            altitude: Angle::from_parts(altitude, AngleUnit::Degrees, AngleRange::HalfTurn),
            azimuth: Angle::from_parts(azimuth, AngleUnit::Degrees, AngleRange::FullTurn),
        };
        (horizontal, defined)
    }
}

impl SkyPosition {
    /// Equatorial position from right ascension and declination
    pub fn equatorial(right_ascension: Angle, declination: Angle) -> Result<Self> {
        Ok(SkyPosition::Equatorial(Equatorial::new(
            right_ascension,
            declination,
        )?))
    }

    /// Horizontal position from altitude and azimuth
    pub fn horizontal(altitude: Angle, azimuth: Angle) -> Result<Self> {
        Ok(SkyPosition::Horizontal(Horizontal::new(altitude, azimuth)?))
    }

    /// This position in the horizontal frame; a horizontal position is
    /// returned unchanged
    pub fn to_horizontal(&self, observer: &GeoCoordinate, at: &Clock) -> Horizontal {
        match self {
            SkyPosition::Horizontal(horizontal) => *horizontal,
            SkyPosition::Equatorial(equatorial) => equatorial.to_horizontal(observer, at),
        }
    }

    /// This position in the equatorial frame; an equatorial position is
    /// returned unchanged
    pub fn to_equatorial(&self, observer: &GeoCoordinate, at: &Clock) -> Equatorial {
        match self {
            SkyPosition::Horizontal(horizontal) => horizontal.to_equatorial(observer, at),
            SkyPosition::Equatorial(equatorial) => *equatorial,
        }
    }

    pub fn as_equatorial(&self) -> Option<&Equatorial> {
        match self {
            SkyPosition::Equatorial(equatorial) => Some(equatorial),
            SkyPosition::Horizontal(_) => None,
        }
    }

    pub fn as_horizontal(&self) -> Option<&Horizontal> {
        match self {
            SkyPosition::Horizontal(horizontal) => Some(horizontal),
            SkyPosition::Equatorial(_) => None,
        }
    }
}

impl From<Horizontal> for SkyPosition {
    fn from(horizontal: Horizontal) -> Self {
        SkyPosition::Horizontal(horizontal)
    }
}

impl From<Equatorial> for SkyPosition {
    fn from(equatorial: Equatorial) -> Self {
        SkyPosition::Equatorial(equatorial)
    }
}

impl fmt::Display for Horizontal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(1);
        let options = FormatOptions::sexagesimal(AngleUnit::Degrees, precision);
        write!(
            f,
            "Alt {}, Az {}",
            self.altitude.format(&options),
            self.azimuth.format(&options)
        )
    }
}

impl fmt::Display for Equatorial {
    /// `RA 06:00:00.00, Dec +20°0'0.0"`; `{:.N}` sets the declination seconds
    /// precision, right ascension gets one digit more
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(1);
        let ra = FormatOptions::sexagesimal(AngleUnit::Hours, precision + 1);
        let dec =
            FormatOptions::sexagesimal(AngleUnit::Degrees, precision).with_sign(SignStyle::Always);
        write!(
            f,
            "RA {}, Dec {}",
            self.right_ascension.format(&ra),
            self.declination.format(&dec)
        )
    }
}

impl fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkyPosition::Horizontal(horizontal) => fmt::Display::fmt(horizontal, f),
            SkyPosition::Equatorial(equatorial) => fmt::Display::fmt(equatorial, f),
        }
    }
}
