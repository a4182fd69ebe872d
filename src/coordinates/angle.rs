//! # Angle Representation Module
//!
//! This module provides the angle value type shared by every coordinate and
//! clock in the crate.
//!
//! ## Design Philosophy
//!
//! An `Angle` holds exactly one canonical number, the angle in radians. The
//! degree, radian and hour-angle views are computed from it each time they are
//! asked for, so a caller never needs to know which unit the value was first
//! supplied in.
//!
//! Two pieces of metadata travel with the canonical value:
//!
//! - [`AngleUnit`]: the "natural" unit the angle was built from. It only
//!   steers default formatting.
//! - [`AngleRange`]: the normalization range the value was last reduced to.
//!   Normalization happens when the angle is constructed with a range or when
//!   [`Angle::normalized`] is called, never silently on conversion. An
//!   unbounded angle can therefore carry a cumulative rotation of several turns.
//!
//! ## Examples
//!
//! ```rust
//! use stellargeom::coordinates::angle::{Angle, AngleRange, AngleUnit};
//!
//! let ra = Angle::from_hours(6.0).unwrap();
//! assert!((ra.degrees() - 90.0).abs() < 1e-12);
//!
//! let wrapped = Angle::with_range(-90.0, AngleUnit::Degrees, AngleRange::FullTurn).unwrap();
//! assert!((wrapped.degrees() - 270.0).abs() < 1e-12);
//! ```

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::ops::{Add, Neg, Sub};

use crate::constants::{DEG2RAD, HALF_PI, HOUR2RAD, POLAR_LIMIT_SLACK, RAD2DEG, RAD2HOUR, TAU};
use crate::{GeomError, Result};

/// Unit an angle is expressed in
///
/// `Hours` is the sexagesimal hour angle used for right ascension and
/// sidereal time: 24 hours make a full turn, so one hour is 15 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    /// Degrees, 360 per turn
    Degrees,
    /// Radians, 2π per turn
    Radians,
    /// Hour angle, 24 per turn
    Hours,
}

impl AngleUnit {
    /// Converts a value in this unit to radians
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value * DEG2RAD,
            AngleUnit::Radians => value,
            AngleUnit::Hours => value * HOUR2RAD,
        }
    }

    /// Converts radians to a value in this unit
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Degrees => radians * RAD2DEG,
            AngleUnit::Radians => radians,
            AngleUnit::Hours => radians * RAD2HOUR,
        }
    }

    /// Size of one full turn in this unit
    pub fn full_turn(self) -> f64 {
        match self {
            AngleUnit::Degrees => 360.0,
            AngleUnit::Radians => TAU,
            AngleUnit::Hours => 24.0,
        }
    }

    /// Suffix used by decimal formatting
    pub fn symbol(self) -> &'static str {
        match self {
            AngleUnit::Degrees => "°",
            AngleUnit::Radians => "rad",
            AngleUnit::Hours => "h",
        }
    }
}

/// Normalization range of an angle
///
/// Ranges are ordered by strictness: `Unbounded` < `FullTurn` < `HalfTurn`.
/// When two angles are added or subtracted the result is reduced to the
/// stricter of the two ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleRange {
    /// No reduction; cumulative rotations and deltas keep their full value
    #[default]
    Unbounded,
    /// Reduced to [0, 2π): right ascension, azimuth, sidereal time
    FullTurn,
    /// Reduced to [−π, π): longitude, hour angle, latitude-like angles
    HalfTurn,
}

impl AngleRange {
    /// Reduces a radian value into this range
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::coordinates::angle::AngleRange;
    /// use std::f64::consts::PI;
    ///
    /// assert!((AngleRange::FullTurn.apply(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
    /// assert!((AngleRange::HalfTurn.apply(1.5 * PI) + PI / 2.0).abs() < 1e-12);
    /// assert_eq!(AngleRange::HalfTurn.apply(PI), -PI);
    /// ```
    pub fn apply(self, radians: f64) -> f64 {
        match self {
            AngleRange::Unbounded => radians,
            AngleRange::FullTurn => {
                let wrapped = radians.rem_euclid(TAU);
                // rem_euclid can round up to exactly TAU for tiny negative inputs
                if wrapped >= TAU {
                    0.0
                } else {
                    wrapped
                }
            }
            AngleRange::HalfTurn => {
                let wrapped = (radians + PI).rem_euclid(TAU) - PI;
                if wrapped >= PI {
                    wrapped - TAU
                } else {
                    wrapped
                }
            }
        }
    }

    /// Returns true when the radian value already lies inside this range
    pub fn contains(self, radians: f64) -> bool {
        match self {
            AngleRange::Unbounded => radians.is_finite(),
            AngleRange::FullTurn => (0.0..TAU).contains(&radians),
            AngleRange::HalfTurn => (-PI..PI).contains(&radians),
        }
    }

    /// The stricter of two ranges
    pub fn stricter(self, other: AngleRange) -> AngleRange {
        if other.strictness() > self.strictness() {
            other
        } else {
            self
        }
    }

    fn strictness(self) -> u8 {
        match self {
            AngleRange::Unbounded => 0,
            AngleRange::FullTurn => 1,
            AngleRange::HalfTurn => 2,
        }
    }
}

/// An angular quantity with one canonical value in radians
///
/// Angles are immutable `Copy` values. Conversions to other units are pure
/// arithmetic on the canonical value performed at the moment of the call.
///
/// Equality and ordering compare the canonical value only; the natural unit
/// and range tags do not take part. Use [`Angle::approx_eq`] when comparing
/// values that went through unit conversions.
#[derive(Debug, Clone, Copy)]
pub struct Angle {
    radians: f64,
    unit: AngleUnit,
    range: AngleRange,
}

impl Angle {
    /// Creates an unbounded angle from a value in the given unit
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidAngle`] if `value` is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::coordinates::angle::{Angle, AngleUnit};
    ///
    /// let angle = Angle::new(90.0, AngleUnit::Degrees).unwrap();
    /// assert!((angle.radians() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    ///
    /// assert!(Angle::new(f64::NAN, AngleUnit::Degrees).is_err());
    /// ```
    pub fn new(value: f64, unit: AngleUnit) -> Result<Self> {
        if !value.is_finite() {
            return Err(GeomError::InvalidAngle(value));
        }
        let radians = unit.to_radians(value);
        if !radians.is_finite() {
            return Err(GeomError::InvalidAngle(value));
        }
        Ok(Angle {
            radians,
            unit,
            range: AngleRange::Unbounded,
        })
    }

    /// Creates an angle and reduces it into `range`
    pub fn with_range(value: f64, unit: AngleUnit, range: AngleRange) -> Result<Self> {
        Ok(Self::new(value, unit)?.normalized(range))
    }

    /// Creates an angle from a value in degrees
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::coordinates::angle::Angle;
    ///
    /// let right_angle = Angle::from_degrees(90.0).unwrap();
    /// assert!((right_angle.hours() - 6.0).abs() < 1e-12);
    /// ```
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        Self::new(degrees, AngleUnit::Degrees)
    }

    /// Creates an angle from a value in radians
    pub fn from_radians(radians: f64) -> Result<Self> {
        Self::new(radians, AngleUnit::Radians)
    }

    /// Creates an angle from an hour angle (1 hour = 15 degrees)
    pub fn from_hours(hours: f64) -> Result<Self> {
        Self::new(hours, AngleUnit::Hours)
    }

    /// Builds an angle from a radian value already known to be finite.
    pub(crate) fn from_parts(radians: f64, unit: AngleUnit, range: AngleRange) -> Self {
        debug_assert!(radians.is_finite(), "non-finite canonical value {}", radians);
        Angle {
            radians: range.apply(radians),
            unit,
            range,
        }
    }

    /// Checks a latitude-like angle against ±90° and tags it half-turn
    ///
    /// Values within rounding slack beyond a pole are clamped onto it.
    pub(crate) fn quarter_turn(self, what: &str) -> Result<Angle> {
        if self.radians.abs() > HALF_PI + POLAR_LIMIT_SLACK {
            return Err(GeomError::InvalidCoordinate(format!(
                "{} {:.6}° is beyond ±90°",
                what,
                self.degrees()
            )));
        }
        Ok(Angle::from_parts(
            self.radians.clamp(-HALF_PI, HALF_PI),
            self.unit,
            AngleRange::HalfTurn,
        ))
    }

    /// Returns the canonical value in radians
    pub fn radians(&self) -> f64 {
        self.radians
    }

    /// Returns the angle in degrees
    pub fn degrees(&self) -> f64 {
        self.radians * RAD2DEG
    }

    /// Returns the angle as a decimal hour angle
    pub fn hours(&self) -> f64 {
        self.radians * RAD2HOUR
    }

    /// Returns the angle expressed in `unit`
    pub fn value_in(&self, unit: AngleUnit) -> f64 {
        unit.from_radians(self.radians)
    }

    /// Splits the angle into degrees, arcminutes and arcseconds
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::coordinates::angle::Angle;
    ///
    /// let dms = Angle::from_degrees(51.5).unwrap().to_dms();
    /// assert_eq!((dms.whole, dms.minutes), (51, 30));
    /// assert_eq!(dms.to_string(), "51°30'0.0\"");
    /// ```
    pub fn to_dms(&self) -> Sexagesimal {
        Sexagesimal::split(self.degrees(), AngleUnit::Degrees)
    }

    /// Splits the angle into hours, minutes and seconds of time
    pub fn to_hms(&self) -> Sexagesimal {
        Sexagesimal::split(self.hours(), AngleUnit::Hours)
    }

    /// The unit this angle was built from, used for default formatting
    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    /// The normalization range this angle was last reduced to
    pub fn range(&self) -> AngleRange {
        self.range
    }

    /// Returns the same angle tagged with a different natural unit
    pub fn in_unit(self, unit: AngleUnit) -> Self {
        Angle { unit, ..self }
    }

    /// Returns a copy reduced into `range`
    ///
    /// The returned angle records `range`, and later sums involving it are
    /// normalized at least that strictly.
    pub fn normalized(self, range: AngleRange) -> Self {
        Angle::from_parts(self.radians, self.unit, range)
    }

    /// Multiplies the angle by a scalar, keeping its unit and range
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidAngle`] if the product is not finite.
    pub fn scaled(self, factor: f64) -> Result<Self> {
        let radians = self.radians * factor;
        if !radians.is_finite() {
            return Err(GeomError::InvalidAngle(radians));
        }
        Ok(Angle::from_parts(radians, self.unit, self.range))
    }

    /// Sum that fails instead of saturating
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidAngle`] when the sum overflows `f64`.
    pub fn checked_add(self, rhs: Angle) -> Result<Self> {
        check_sum(self.radians + rhs.radians)?;
        Ok(self + rhs)
    }

    /// Difference that fails instead of saturating, see [`Angle::checked_add`]
    pub fn checked_sub(self, rhs: Angle) -> Result<Self> {
        check_sum(self.radians - rhs.radians)?;
        Ok(self - rhs)
    }

    /// Absolute value, unbounded
    pub fn abs(self) -> Self {
        Angle {
            radians: self.radians.abs(),
            range: AngleRange::Unbounded,
            ..self
        }
    }

    /// Sine and cosine of the angle
    pub fn sin_cos(&self) -> (f64, f64) {
        self.radians.sin_cos()
    }

    /// Returns true when both angles are within `epsilon` radians
    ///
    /// Unit conversions and parse/format cycles introduce rounding, so exact
    /// equality is rarely the right test between angles from different sources.
    pub fn approx_eq(&self, other: &Angle, epsilon: f64) -> bool {
        (self.radians - other.radians).abs() <= epsilon
    }

    /// Like [`Angle::approx_eq`], but treats values a whole turn apart as equal
    pub fn approx_eq_wrapped(&self, other: &Angle, epsilon: f64) -> bool {
        AngleRange::HalfTurn
            .apply(self.radians - other.radians)
            .abs()
            <= epsilon
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.radians == other.radians
    }
}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.radians.partial_cmp(&other.radians)
    }
}

/// Sum of two finite radian values, saturating at `±f64::MAX`
fn saturating_sum(lhs: f64, rhs: f64) -> f64 {
    (lhs + rhs).clamp(f64::MIN, f64::MAX)
}

fn check_sum(sum: f64) -> Result<()> {
    if !sum.is_finite() {
        return Err(GeomError::InvalidAngle(sum));
    }
    Ok(())
}

/// Normalized into the stricter range of both operands
///
/// An unbounded sum beyond `f64::MAX` saturates; [`Angle::checked_add`]
/// reports it instead.
impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        let range = self.range.stricter(rhs.range);
        Angle::from_parts(saturating_sum(self.radians, rhs.radians), self.unit, range)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        let range = self.range.stricter(rhs.range);
        Angle::from_parts(saturating_sum(self.radians, -rhs.radians), self.unit, range)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_parts(-self.radians, self.unit, self.range)
    }
}

/// Sexagesimal components of an angle: whole units, minutes and seconds
///
/// Produced by [`Angle::to_dms`] (whole degrees, arcminutes, arcseconds) and
/// [`Angle::to_hms`] (whole hours, minutes and seconds of time). The
/// components hold the exact split; rounding only happens when displaying.
///
/// `Display` renders DMS as `51°30'0.0"` and HMS as `12:34:56.7`, with one
/// decimal on the seconds unless a precision is given (`{:.3}`).
///
/// The split is meant for angles of everyday size. Beyond `u64::MAX` whole
/// units the `whole` field saturates; use [`Angle::format`] for such values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sexagesimal {
    /// True for angles below zero
    pub negative: bool,
    /// Whole degrees or hours, saturating at `u64::MAX`
    pub whole: u64,
    /// Minutes, 0..60
    pub minutes: u32,
    /// Seconds including the fractional part, 0.0..60.0
    pub seconds: f64,
    unit: AngleUnit,
}

impl Sexagesimal {
    fn split(value: f64, unit: AngleUnit) -> Self {
        let magnitude = value.abs();
        let whole = magnitude.trunc();
        let rest = (magnitude - whole) * 60.0;
        let minutes = rest.trunc();
        let seconds = (rest - minutes) * 60.0;
        Sexagesimal {
            negative: value < 0.0,
            whole: whole as u64,
            minutes: minutes as u32,
            seconds,
            unit,
        }
    }

    /// Unit of the whole component: degrees or hours
    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    /// Recombines the components into a signed decimal value
    pub fn value(&self) -> f64 {
        let magnitude = self.whole as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}
