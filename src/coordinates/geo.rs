//! Observer location on the Earth's surface

use std::fmt;

use log::debug;

use super::angle::{Angle, AngleRange, AngleUnit};
use super::format::{render_sexagesimal, SignStyle};
use crate::{GeomError, Result};

/// Geographic latitude and longitude of an observer
///
/// Latitude lies in [−90°, 90°] and is never wrapped: a value beyond the poles
/// is an error, not a different place. Longitude is east positive and kept in
/// [−180°, 180°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    latitude: Angle,
    longitude: Angle,
}

impl GeoCoordinate {
    /// Creates a coordinate from latitude and longitude angles
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidCoordinate`] when |latitude| exceeds 90°.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::{Angle, GeoCoordinate};
    ///
    /// let greenwich = GeoCoordinate::new(
    ///     Angle::from_degrees(51.4769).unwrap(),
    ///     Angle::from_degrees(360.0).unwrap(),
    /// )
    /// .unwrap();
    /// assert!(greenwich.longitude().degrees().abs() < 1e-9);
    ///
    /// let beyond_pole = Angle::from_degrees(91.0).unwrap();
    /// assert!(GeoCoordinate::new(beyond_pole, Angle::from_degrees(0.0).unwrap()).is_err());
    /// ```
    pub fn new(latitude: Angle, longitude: Angle) -> Result<Self> {
        Ok(GeoCoordinate {
            latitude: latitude.quarter_turn("latitude")?,
            longitude: longitude.normalized(AngleRange::HalfTurn),
        })
    }

    /// Creates a coordinate from decimal degrees (longitude east positive)
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        Self::new(Angle::from_degrees(latitude)?, Angle::from_degrees(longitude)?)
    }

    /// Parses latitude and longitude text
    ///
    /// Each part accepts any notation of [`Angle::parse`] in degrees, optionally
    /// followed by a hemisphere letter: `N`/`S` for latitude, `E`/`W` for
    /// longitude. A hemisphere letter together with a sign is rejected.
    ///
    /// ```rust
    /// use stellargeom::GeoCoordinate;
    ///
    /// let london = GeoCoordinate::parse("51°30'N", "0°7'40\"W").unwrap();
    /// assert!((london.latitude().degrees() - 51.5).abs() < 1e-9);
    /// assert!(london.longitude().degrees() < 0.0);
    /// ```
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = parse_hemisphere(latitude, 'N', 'S')?;
        let lon = parse_hemisphere(longitude, 'E', 'W')?;
        Self::new(lat, lon)
    }

    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    /// Longitude in [−π, π), east positive
    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    /// True when the observer stands on a geographic pole
    pub fn is_polar(&self) -> bool {
        self.latitude.radians().cos().abs() < 1e-12
    }
}

/// Parses one angle with an optional trailing hemisphere letter.
fn parse_hemisphere(text: &str, positive: char, negative: char) -> Result<Angle> {
    let trimmed = text.trim();
    let last = trimmed.chars().last().map(|c| c.to_ascii_uppercase());

    let hemisphere = match last {
        Some(c) if c == positive => Some(1.0),
        Some(c) if c == negative => Some(-1.0),
        _ => None,
    };

    if let Some(sign) = hemisphere {
        let body = trimmed[..trimmed.len() - 1].trim_end();
        if body.starts_with('-') || body.starts_with('+') {
            return Err(GeomError::parse(trimmed, "ambiguous sign placement"));
        }
        // A trailing 's' may be a seconds marker rather than south
        match Angle::parse(body, AngleUnit::Degrees) {
            Ok(angle) => {
                return if sign < 0.0 { Ok(-angle) } else { Ok(angle) };
            }
            Err(err) => {
                debug!("'{}' is not a hemisphere-tagged angle: {}", trimmed, err);
            }
        }
    }
    Angle::parse(trimmed, AngleUnit::Degrees)
}

fn render_component(
    angle: &Angle,
    positive: char,
    negative: char,
    precision: usize,
) -> String {
    let letter = if angle.radians() < 0.0 { negative } else { positive };
    let text = render_sexagesimal(
        angle.degrees().abs(),
        AngleUnit::Degrees,
        precision,
        SignStyle::NegativeOnly,
        false,
    );
    format!("{}{}", text, letter)
}

impl fmt::Display for GeoCoordinate {
    /// Renders `51°30'0.0"N, 0°7'40.1"W`; `{:.N}` sets the seconds precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(1);
        write!(
            f,
            "{}, {}",
            render_component(&self.latitude, 'N', 'S', precision),
            render_component(&self.longitude, 'E', 'W', precision)
        )
    }
}
