//! Clock readings in universal, local civil and sidereal time
//!
//! A [`Clock`] stores exactly one instant, Universal Time in seconds since
//! J2000.0 (2000-01-01T12:00:00 UT), plus the [`TimeScale`] it is read in.
//! Sidereal and civil readings are derived from that anchor every time they
//! are requested, so converting a clock between scales never changes the
//! instant it refers to.
//!
//! Sidereal time uses the linear mean-sidereal model
//!
//! ```text
//! GMST [h] = 18.697374558 + 24 × 1.002737909350795 × D
//! ```
//!
//! where `D` is the number of UT days since J2000.0. Nutation and the
//! equation of the equinoxes are not modelled.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;

use crate::constants::{
    DAY_S, GMST_AT_J2000_H, HOUR_S, J2000, J2000_UNIX_S, SIDEREAL_RATE,
};
use crate::coordinates::angle::{Angle, AngleRange, AngleUnit};
use crate::coordinates::format::FormatOptions;
use crate::{GeomError, Result};

/// Largest accepted magnitude of a UTC offset, in hours
const MAX_UTC_OFFSET_H: f64 = 24.0;

/// The scale a [`Clock`] is read in
///
/// Longitudes are east positive and kept in [−180°, 180°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeScale {
    /// Universal Time, the anchor every other scale derives from
    Universal,
    /// Local mean sidereal time at `longitude`
    Sidereal { longitude: Angle },
    /// Civil time shifted from UT by a fixed offset
    ///
    /// The observer longitude is kept so that a civil clock can drive
    /// sidereal conversions without extra arguments.
    LocalCivil { longitude: Angle, utc_offset_hours: f64 },
}

impl TimeScale {
    /// Observer longitude, absent for universal time
    pub fn longitude(&self) -> Option<Angle> {
        match self {
            TimeScale::Universal => None,
            TimeScale::Sidereal { longitude } | TimeScale::LocalCivil { longitude, .. } => {
                Some(*longitude)
            }
        }
    }

    fn validated(self) -> Result<Self> {
        Ok(match self {
            TimeScale::Universal => self,
            TimeScale::Sidereal { longitude } => TimeScale::Sidereal {
                longitude: longitude.normalized(AngleRange::HalfTurn),
            },
            TimeScale::LocalCivil {
                longitude,
                utc_offset_hours,
            } => {
                check_utc_offset(utc_offset_hours)?;
                TimeScale::LocalCivil {
                    longitude: longitude.normalized(AngleRange::HalfTurn),
                    utc_offset_hours,
                }
            }
        })
    }
}

/// One instant read in a particular time scale
///
/// Equality and ordering compare the instant only, so a universal clock and
/// its sidereal conversion are equal. Compare [`Clock::scale`] to tell the
/// readings apart.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    ut_seconds: f64,
    scale: TimeScale,
}

impl Clock {
    /// Universal clock at `seconds` after J2000.0
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidInstant`] for a non-finite value.
    pub fn universal(seconds_since_j2000: f64) -> Result<Self> {
        if !seconds_since_j2000.is_finite() {
            return Err(GeomError::InvalidInstant(format!(
                "{} seconds since J2000.0 is not a finite instant",
                seconds_since_j2000
            )));
        }
        Ok(Clock {
            ut_seconds: seconds_since_j2000,
            scale: TimeScale::Universal,
        })
    }

    /// Universal clock at a Julian date (UT)
    ///
    /// ```rust
    /// use stellargeom::Clock;
    ///
    /// let j2000 = Clock::from_julian_date(2_451_545.0).unwrap();
    /// assert_eq!(j2000.seconds_since_j2000(), 0.0);
    /// ```
    pub fn from_julian_date(jd: f64) -> Result<Self> {
        if !jd.is_finite() {
            return Err(GeomError::InvalidInstant(format!(
                "Julian date {} is not finite",
                jd
            )));
        }
        Self::universal((jd - J2000) * DAY_S)
    }

    /// Universal clock at a chrono UTC timestamp
    ///
    /// UTC is taken as UT; the sub-second UT1−UTC difference is ignored.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let seconds = datetime.timestamp() as f64 - J2000_UNIX_S
            + datetime.timestamp_subsec_nanos() as f64 * 1e-9;
        Clock {
            ut_seconds: seconds,
            scale: TimeScale::Universal,
        }
    }

    /// The instant at which a clock in `scale` shows `reading` on `date`
    ///
    /// `date` is the UT date for universal and sidereal scales and the civil
    /// date for a local civil scale. The reading is wrapped into [0h, 24h).
    /// A sidereal reading can occur twice within one UT date; the earlier
    /// instant is returned.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stellargeom::{Angle, Clock, TimeScale};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    /// let longitude = Angle::from_degrees(-75.0).unwrap();
    /// let lst = Angle::from_hours(6.5).unwrap();
    ///
    /// let clock = Clock::from_reading(lst, TimeScale::Sidereal { longitude }, date).unwrap();
    /// assert!((clock.reading().hours() - 6.5).abs() < 1e-9);
    /// ```
    pub fn from_reading(reading: Angle, scale: TimeScale, date: NaiveDate) -> Result<Self> {
        let scale = scale.validated()?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Clock::from_datetime(naive.and_utc()))
            .ok_or_else(|| GeomError::InvalidInstant(format!("no midnight on {}", date)))?;
        let hours = reading.normalized(AngleRange::FullTurn).hours();

        let offset_hours = match scale {
            TimeScale::Universal => hours,
            TimeScale::LocalCivil {
                utc_offset_hours, ..
            } => hours - utc_offset_hours,
            TimeScale::Sidereal { longitude } => {
                let lst_at_midnight = midnight.local_sidereal_time(longitude).hours();
                let sidereal_hours = (hours - lst_at_midnight).rem_euclid(24.0);
                debug!(
                    "LST {:.6}h on {} is {:.6} sidereal hours after 0h UT",
                    hours, date, sidereal_hours
                );
                sidereal_hours / SIDEREAL_RATE
            }
        };

        Ok(Clock {
            ut_seconds: midnight.ut_seconds + offset_hours * HOUR_S,
            scale,
        })
    }

    /// Parses a `HH:MM:SS.s` reading in `scale` on `date`
    ///
    /// Accepts every hour-angle notation of [`Angle::parse`]; the reading
    /// must lie in [0h, 24h).
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stellargeom::{Clock, TimeScale};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    /// let clock = Clock::parse("21:30:00", TimeScale::Universal, date).unwrap();
    /// assert_eq!(clock.to_string(), "UT 21:30:00.00");
    /// ```
    pub fn parse(text: &str, scale: TimeScale, date: NaiveDate) -> Result<Self> {
        let reading = Angle::parse(text, AngleUnit::Hours)?;
        if !(0.0..24.0).contains(&reading.hours()) {
            return Err(GeomError::parse(
                text.trim(),
                "clock reading must lie in [00:00:00, 24:00:00)",
            ));
        }
        Self::from_reading(reading, scale, date)
    }

    /// The same instant read as universal time
    pub fn to_universal(&self) -> Clock {
        Clock {
            ut_seconds: self.ut_seconds,
            scale: TimeScale::Universal,
        }
    }

    /// The same instant read as local sidereal time at `longitude`
    pub fn to_sidereal(&self, longitude: Angle) -> Clock {
        Clock {
            ut_seconds: self.ut_seconds,
            scale: TimeScale::Sidereal {
                longitude: longitude.normalized(AngleRange::HalfTurn),
            },
        }
    }

    /// The same instant read as local civil time
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidInstant`] when the offset is non-finite or its
    /// magnitude exceeds 24 hours.
    pub fn to_local_civil(&self, longitude: Angle, utc_offset_hours: f64) -> Result<Clock> {
        let scale = TimeScale::LocalCivil {
            longitude,
            utc_offset_hours,
        }
        .validated()?;
        Ok(Clock {
            ut_seconds: self.ut_seconds,
            scale,
        })
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    /// Observer longitude carried by sidereal and civil clocks
    pub fn longitude(&self) -> Option<Angle> {
        self.scale.longitude()
    }

    pub fn seconds_since_j2000(&self) -> f64 {
        self.ut_seconds
    }

    pub fn days_since_j2000(&self) -> f64 {
        self.ut_seconds / DAY_S
    }

    /// Julian date (UT)
    pub fn julian_date(&self) -> f64 {
        J2000 + self.days_since_j2000()
    }

    /// Converts to a chrono UTC timestamp, rounded to the microsecond
    ///
    /// # Errors
    ///
    /// [`GeomError::InvalidInstant`] when the instant is outside chrono's
    /// representable range.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let out_of_range = || {
            GeomError::InvalidInstant(format!(
                "{} seconds since J2000.0 is out of calendar range",
                self.ut_seconds
            ))
        };
        // Resolution of an f64 offset from J2000 is far coarser than a nanosecond
        let micros = ((self.ut_seconds + J2000_UNIX_S) * 1e6).round();
        if micros.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let micros = micros as i64;
        let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
        DateTime::from_timestamp(micros.div_euclid(1_000_000), nanos).ok_or_else(out_of_range)
    }

    /// Greenwich mean sidereal time as an hour angle in [0h, 24h)
    pub fn greenwich_sidereal_time(&self) -> Angle {
        let days = self.days_since_j2000();
        // 24 × D is split off exactly so large offsets from J2000 keep precision
        let hours = GMST_AT_J2000_H
            + (self.ut_seconds / HOUR_S).rem_euclid(24.0)
            + 24.0 * (SIDEREAL_RATE - 1.0) * days;
        Angle::from_parts(
            AngleUnit::Hours.to_radians(hours),
            AngleUnit::Hours,
            AngleRange::FullTurn,
        )
    }

    /// Local mean sidereal time at `longitude` (east positive), in [0h, 24h)
    pub fn local_sidereal_time(&self, longitude: Angle) -> Angle {
        Angle::from_parts(
            self.greenwich_sidereal_time().radians() + longitude.radians(),
            AngleUnit::Hours,
            AngleRange::FullTurn,
        )
    }

    /// Time of day shown by this clock, as an hour angle in [0h, 24h)
    pub fn reading(&self) -> Angle {
        let seconds_of_day = match self.scale {
            TimeScale::Sidereal { longitude } => return self.local_sidereal_time(longitude),
            TimeScale::Universal => self.ut_seconds + DAY_S / 2.0,
            TimeScale::LocalCivil {
                utc_offset_hours, ..
            } => self.ut_seconds + DAY_S / 2.0 + utc_offset_hours * HOUR_S,
        };
        Angle::from_parts(
            AngleUnit::Hours.to_radians(seconds_of_day.rem_euclid(DAY_S) / HOUR_S),
            AngleUnit::Hours,
            AngleRange::FullTurn,
        )
    }
}

fn check_utc_offset(utc_offset_hours: f64) -> Result<()> {
    if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > MAX_UTC_OFFSET_H {
        return Err(GeomError::InvalidInstant(format!(
            "UTC offset {} h is outside ±{} h",
            utc_offset_hours, MAX_UTC_OFFSET_H
        )));
    }
    Ok(())
}

fn duration_seconds(duration: Duration) -> f64 {
    duration.num_seconds() as f64 + duration.subsec_nanos() as f64 * 1e-9
}

impl fmt::Display for Clock {
    /// `UT 12:00:00.00`, `LST 06:41:50.55` or `LCT+01:00 13:00:00.00`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        let reading = self
            .reading()
            .format(&FormatOptions::sexagesimal(AngleUnit::Hours, precision));
        match self.scale {
            TimeScale::Universal => write!(f, "UT {}", reading),
            TimeScale::Sidereal { .. } => write!(f, "LST {}", reading),
            TimeScale::LocalCivil {
                utc_offset_hours, ..
            } => {
                let minutes = (utc_offset_hours * 60.0).round() as i64;
                let sign = if minutes < 0 { '-' } else { '+' };
                write!(
                    f,
                    "LCT{}{:02}:{:02} {}",
                    sign,
                    minutes.abs() / 60,
                    minutes.abs() % 60,
                    reading
                )
            }
        }
    }
}

impl From<DateTime<Utc>> for Clock {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl Add<Duration> for Clock {
    type Output = Clock;

    fn add(self, duration: Duration) -> Clock {
        Clock {
            ut_seconds: self.ut_seconds + duration_seconds(duration),
            ..self
        }
    }
}

impl Sub<Duration> for Clock {
    type Output = Clock;

    fn sub(self, duration: Duration) -> Clock {
        Clock {
            ut_seconds: self.ut_seconds - duration_seconds(duration),
            ..self
        }
    }
}

impl Sub<Clock> for Clock {
    type Output = f64;

    /// Elapsed seconds from `other` to `self`
    fn sub(self, other: Clock) -> f64 {
        self.ut_seconds - other.ut_seconds
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        self.ut_seconds == other.ut_seconds
    }
}

impl PartialOrd for Clock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.ut_seconds.partial_cmp(&other.ut_seconds)
    }
}
