//! Pointing of an equatorial mount and its motor-shaft angles

use log::trace;

use super::sky::{Equatorial, SkyPosition};
use crate::coordinates::angle::{Angle, AngleRange, AngleUnit};
use crate::time::Clock;
use crate::{GeomError, Result};

/// Gear ratios beyond this magnitude are rejected
const MAX_GEAR_RATIO: f64 = 1e12;

/// Gear ratios below this magnitude are rejected
const MIN_GEAR_RATIO: f64 = 1e-12;

/// Affine calibration of one mount axis
///
/// `motor = zero_offset + gear_ratio × axis`. Motor angles are unbounded so
/// that cumulative shaft rotation over several turns is preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCalibration {
    zero_offset: Angle,
    gear_ratio: f64,
}

impl AxisCalibration {
    /// # Errors
    ///
    /// [`GeomError::InvalidCalibration`] when the gear ratio is not finite or
    /// its magnitude lies outside [1e-12, 1e12].
    pub fn new(zero_offset: Angle, gear_ratio: f64) -> Result<Self> {
        if !(MIN_GEAR_RATIO..=MAX_GEAR_RATIO).contains(&gear_ratio.abs()) {
            return Err(GeomError::InvalidCalibration(format!(
                "gear ratio {} must lie between {:e} and {:e} in magnitude",
                gear_ratio, MIN_GEAR_RATIO, MAX_GEAR_RATIO
            )));
        }
        Ok(AxisCalibration {
            zero_offset: zero_offset.normalized(AngleRange::Unbounded),
            gear_ratio,
        })
    }

    /// Motor angle equal to the axis angle
    pub fn identity() -> Self {
        AxisCalibration {
            zero_offset: Angle::from_parts(0.0, AngleUnit::Degrees, AngleRange::Unbounded),
            gear_ratio: 1.0,
        }
    }

    pub fn zero_offset(&self) -> Angle {
        self.zero_offset
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    /// Motor-shaft angle for an axis angle
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidAngle`] when the motor angle overflows `f64`.
    pub fn motor_angle(&self, axis: Angle) -> Result<Angle> {
        let radians = self.zero_offset.radians() + self.gear_ratio * axis.radians();
        shaft_angle(radians, self.zero_offset.unit())
    }

    /// Axis angle for a motor-shaft angle, unbounded
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidAngle`] when the axis angle overflows `f64`.
    pub fn axis_angle(&self, motor: Angle) -> Result<Angle> {
        let radians = (motor.radians() - self.zero_offset.radians()) / self.gear_ratio;
        shaft_angle(radians, motor.unit())
    }
}

fn shaft_angle(radians: f64, unit: AngleUnit) -> Result<Angle> {
    if !radians.is_finite() {
        return Err(GeomError::InvalidAngle(radians));
    }
    Ok(Angle::from_parts(radians, unit, AngleRange::Unbounded))
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self::identity()
    }
}

/// Calibration of both axes of an equatorial mount
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MountCalibration {
    pub hour_axis: AxisCalibration,
    pub declination_axis: AxisCalibration,
}

impl MountCalibration {
    pub fn new(hour_axis: AxisCalibration, declination_axis: AxisCalibration) -> Self {
        MountCalibration {
            hour_axis,
            declination_axis,
        }
    }
}

/// Raw motor-shaft angles of the two axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorAngles {
    pub hour_axis: Angle,
    pub declination_axis: Angle,
}

/// Hour angle and declination an equatorial mount points at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountPosition {
    hour_angle: Angle,
    declination: Angle,
}

impl MountPosition {
    /// Hour angle is wrapped into [−12h, 12h)
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidCoordinate`] when |declination| exceeds 90°.
    pub fn new(hour_angle: Angle, declination: Angle) -> Result<Self> {
        Ok(MountPosition {
            hour_angle: hour_angle.in_unit(AngleUnit::Hours).normalized(AngleRange::HalfTurn),
            declination: declination.quarter_turn("declination")?,
        })
    }

    /// Mount pointing for an equatorial target: `HA = LST − RA`
    ///
    /// The clock must carry an observer longitude (sidereal or local civil)
    /// so the local sidereal time is known.
    ///
    /// # Errors
    ///
    /// [`GeomError::UndefinedTransform`] for a horizontal position or a
    /// universal clock.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::{Angle, Clock, MountPosition, SkyPosition};
    ///
    /// let (ra, dec) = (Angle::from_hours(15.0).unwrap(), Angle::from_degrees(20.0).unwrap());
    /// let target = SkyPosition::equatorial(ra, dec).unwrap();
    /// // LST 18h41m50.5s at J2000.0 on the Greenwich meridian
    /// let clock = Clock::universal(0.0).unwrap().to_sidereal(Angle::from_degrees(0.0).unwrap());
    ///
    /// let mount = MountPosition::from_sky(&target, &clock).unwrap();
    /// let expected = clock.reading().hours() - 15.0;
    /// assert!((mount.hour_angle().hours() - expected).abs() < 1e-9);
    /// ```
    pub fn from_sky(position: &SkyPosition, lst: &Clock) -> Result<Self> {
        let equatorial = position.as_equatorial().ok_or_else(|| {
            GeomError::UndefinedTransform(
                "mount pointing needs an equatorial position".to_string(),
            )
        })?;
        let sidereal = sidereal_time(lst)?;
        let hour_angle = Angle::from_parts(
            sidereal.radians() - equatorial.right_ascension().radians(),
            AngleUnit::Hours,
            AngleRange::HalfTurn,
        );
        trace!(
            "LST {:.9} RA {:.9} -> HA {:.9}",
            sidereal.radians(),
            equatorial.right_ascension().radians(),
            hour_angle.radians()
        );
        Ok(MountPosition {
            hour_angle,
            declination: equatorial.declination(),
        })
    }

    /// Equatorial position this mount points at: `RA = LST − HA`
    ///
    /// # Errors
    ///
    /// [`GeomError::UndefinedTransform`] for a universal clock.
    pub fn to_sky(&self, lst: &Clock) -> Result<Equatorial> {
        let sidereal = sidereal_time(lst)?;
        Equatorial::new(
            Angle::from_parts(
                sidereal.radians() - self.hour_angle.radians(),
                AngleUnit::Hours,
                AngleRange::FullTurn,
            ),
            self.declination,
        )
    }

    /// Hour angle in [−π, π)
    pub fn hour_angle(&self) -> Angle {
        self.hour_angle
    }

    pub fn declination(&self) -> Angle {
        self.declination
    }

    /// Motor-shaft angles of both axes under `calibration`
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidAngle`] when a motor angle overflows `f64`.
    pub fn to_motor_angles(&self, calibration: &MountCalibration) -> Result<MotorAngles> {
        Ok(MotorAngles {
            hour_axis: calibration.hour_axis.motor_angle(self.hour_angle)?,
            declination_axis: calibration.declination_axis.motor_angle(self.declination)?,
        })
    }

    /// Inverse of [`MountPosition::to_motor_angles`]
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidAngle`] when an axis angle overflows `f64`, and
    /// [`GeomError::InvalidCoordinate`] when the motor angles imply a
    /// declination beyond ±90°.
    pub fn from_motor_angles(motors: &MotorAngles, calibration: &MountCalibration) -> Result<Self> {
        let hour_angle = calibration.hour_axis.axis_angle(motors.hour_axis)?;
        let declination = calibration
            .declination_axis
            .axis_angle(motors.declination_axis)?
            .in_unit(AngleUnit::Degrees);
        Self::new(hour_angle, declination)
    }
}

/// Local sidereal time of a clock that knows its observer longitude
fn sidereal_time(clock: &Clock) -> Result<Angle> {
    clock
        .longitude()
        .map(|longitude| clock.local_sidereal_time(longitude))
        .ok_or_else(|| {
            GeomError::UndefinedTransform(
                "a universal clock carries no observer longitude for sidereal time".to_string(),
            )
        })
}
