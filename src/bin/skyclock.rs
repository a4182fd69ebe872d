//! Sky Clock Tool
//!
//! Prints universal, local civil and local sidereal time for an observer and,
//! when a target is given, where it stands in the sky and how an equatorial
//! mount has to point at it.
//!
//! Usage:
//!   cargo run --bin skyclock -- --lat 51d28m40sN --lon 0d0m5sW --utc-offset 1
//!   cargo run --bin skyclock -- --lat 52 --lon 0 --ra 06:45:08.9 --dec=-16d42m58s

use chrono::{DateTime, Utc};
use clap::Parser;
use stellargeom::{
    Angle, AngleUnit, AxisCalibration, Clock, FormatOptions, GeoCoordinate,
    MountCalibration, MountPosition, SkyPosition,
};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Sky Clock Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Shows UT, local civil and sidereal time and converts RA/Dec targets",
    long_about = None
)]
struct Args {
    /// Observer latitude, e.g. 51.5, 51d30m or 51°30'N
    #[arg(long, allow_hyphen_values = true)]
    lat: String,

    /// Observer longitude, east positive, e.g. -0.12 or 0°7'W
    #[arg(long, allow_hyphen_values = true)]
    lon: String,

    /// Civil time offset from UTC in hours
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    utc_offset: f64,

    /// Instant to show as RFC 3339 (defaults to now)
    #[arg(long)]
    time: Option<String>,

    /// Target right ascension in hours, e.g. 06:45:08.9
    #[arg(long, requires = "dec")]
    ra: Option<String>,

    /// Target declination in degrees, e.g. -16d42m58s
    #[arg(long, requires = "ra", allow_hyphen_values = true)]
    dec: Option<String>,

    /// Digits after the decimal point on seconds
    #[arg(long, default_value_t = 1)]
    precision: usize,

    /// Hour-axis motor turns per axis turn
    #[arg(long, default_value_t = 1.0)]
    hour_gear: f64,

    /// Declination-axis motor turns per axis turn
    #[arg(long, default_value_t = 1.0)]
    dec_gear: f64,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{:>16}: {}", name, value);
}

fn parse_instant(time: Option<&str>) -> Result<Clock> {
    let instant = match time {
        Some(text) => DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc),
        None => Utc::now(),
    };
    Ok(Clock::from_datetime(instant))
}

fn display_clocks(observer: &GeoCoordinate, at: &Clock, args: &Args) -> Result<()> {
    let precision = args.precision + 1;
    let civil = at.to_local_civil(observer.longitude(), args.utc_offset)?;
    let sidereal = at.to_sidereal(observer.longitude());

    print_section_header("Clocks");
    print_named_value("Observer", format!("{:.*}", args.precision, observer));
    print_named_value("Date (UTC)", at.to_datetime()?.format("%Y-%m-%d"));
    print_named_value("Julian date", format!("{:.6}", at.julian_date()));
    print_named_value("Universal", format!("{:.*}", precision, at));
    print_named_value("Local civil", format!("{:.*}", precision, civil));
    print_named_value("Local sidereal", format!("{:.*}", precision, sidereal));
    print_named_value(
        "Greenwich sidereal",
        at.greenwich_sidereal_time()
            .format(&FormatOptions::sexagesimal(AngleUnit::Hours, precision)),
    );
    Ok(())
}

fn display_target(
    observer: &GeoCoordinate,
    at: &Clock,
    args: &Args,
    ra: &str,
    dec: &str,
) -> Result<()> {
    let target = SkyPosition::equatorial(
        Angle::parse(ra, AngleUnit::Hours)?,
        Angle::parse(dec, AngleUnit::Degrees)?,
    )?;
    let horizontal = target.to_horizontal(observer, at);
    let sidereal = at.to_sidereal(observer.longitude());
    let mount = MountPosition::from_sky(&target, &sidereal)?;
    let calibration = MountCalibration::new(
        AxisCalibration::new(Angle::from_degrees(0.0)?, args.hour_gear)?,
        AxisCalibration::new(Angle::from_degrees(0.0)?, args.dec_gear)?,
    );
    let motors = mount.to_motor_angles(&calibration)?;
    let degrees = FormatOptions::decimal(AngleUnit::Degrees, args.precision + 3);

    print_section_header("Target");
    print_named_value("Equatorial", format!("{:.*}", args.precision, target));
    print_named_value("Horizontal", format!("{:.*}", args.precision, horizontal));
    print_named_value(
        "Zenith distance",
        horizontal.zenith_distance().format(&degrees),
    );
    print_named_value(
        "Visible",
        if horizontal.is_above_horizon() { "yes" } else { "no (below horizon)" },
    );
    print_named_value(
        "Hour angle",
        mount
            .hour_angle()
            .format(&FormatOptions::sexagesimal(AngleUnit::Hours, args.precision + 1)),
    );
    print_named_value("Motor HA axis", motors.hour_axis.format(&degrees));
    print_named_value("Motor Dec axis", motors.declination_axis.format(&degrees));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let observer = GeoCoordinate::parse(&args.lat, &args.lon)?;
    let at = parse_instant(args.time.as_deref())?;

    display_clocks(&observer, &at, &args)?;

    if let (Some(ra), Some(dec)) = (args.ra.as_deref(), args.dec.as_deref()) {
        display_target(&observer, &at, &args, ra, dec)?;
    }

    Ok(())
}
