//! Constants module for angle and clock calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Seconds in an hour
pub const HOUR_S: f64 = 3_600.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// J2000.0 epoch (2000-01-01T12:00:00 UT) as a Unix timestamp in seconds
pub const J2000_UNIX_S: f64 = 946_728_000.0;

// Sidereal time
/// Sidereal days elapsed per mean solar day.
///
/// Every sidereal computation in the crate goes through this single value.
pub const SIDEREAL_RATE: f64 = 1.002_737_909_350_795;
/// Greenwich mean sidereal time at J2000.0, in hours
pub const GMST_AT_J2000_H: f64 = 18.697_374_558;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Hours to radians conversion factor
pub const HOUR2RAD: f64 = PI / 12.0;
/// Radians to hours conversion factor
pub const RAD2HOUR: f64 = 12.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;
/// Quarter turn, the magnitude limit of latitudes, declinations and altitudes
pub const HALF_PI: f64 = PI / 2.0;

/// Slack allowed when checking a latitude-like angle against +/-90 degrees,
/// so that values produced by unit conversion of exactly 90 degrees pass.
pub const POLAR_LIMIT_SLACK: f64 = 1e-12;
