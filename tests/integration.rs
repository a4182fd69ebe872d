//! End-to-end checks across angles, frames, mounts and clocks

use std::f64::consts::PI;

use approx::assert_relative_eq;
use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use stellargeom::constants::{GMST_AT_J2000_H, SIDEREAL_RATE};
use stellargeom::{
    Angle, AngleRange, AngleUnit, AxisCalibration, Clock, ComponentStyle, Equatorial,
    FormatOptions, GeoCoordinate, GeomError, MountCalibration, MountPosition, SignStyle,
    SkyPosition, TimeScale,
};

fn deg(value: f64) -> Angle {
    Angle::from_degrees(value).unwrap()
}

fn hours(value: f64) -> Angle {
    Angle::from_hours(value).unwrap()
}

#[rstest]
#[case(12.345, AngleUnit::Degrees)]
#[case(-0.000_123, AngleUnit::Degrees)]
#[case(23.999, AngleUnit::Hours)]
#[case(-7.25, AngleUnit::Hours)]
#[case(6.283, AngleUnit::Radians)]
#[case(1.0e6, AngleUnit::Degrees)]
fn value_round_trips_in_its_unit(#[case] value: f64, #[case] unit: AngleUnit) {
    let angle = Angle::new(value, unit).unwrap();
    assert_relative_eq!(angle.value_in(unit), value, max_relative = 1e-9);
}

#[test]
fn normalized_values_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(20_240_320);
    for _ in 0..1000 {
        let value = rng.gen_range(-1.0e4..1.0e4);
        let full = Angle::with_range(value, AngleUnit::Degrees, AngleRange::FullTurn).unwrap();
        assert!((0.0..2.0 * PI).contains(&full.radians()), "{}", value);

        let half = Angle::with_range(value, AngleUnit::Degrees, AngleRange::HalfTurn).unwrap();
        assert!((-PI..PI).contains(&half.radians()), "{}", value);

        assert!(full.approx_eq_wrapped(&half, 1e-9));
    }
}

#[test]
fn format_then_parse_recovers_angle() {
    let mut rng = StdRng::seed_from_u64(424_242);
    let units = [AngleUnit::Degrees, AngleUnit::Hours, AngleUnit::Radians];
    let styles = [ComponentStyle::Decimal, ComponentStyle::Sexagesimal];
    let signs = [SignStyle::Always, SignStyle::NegativeOnly];

    for _ in 0..2000 {
        // Below one turn so that sexagesimal hours stay under 24
        let angle = deg(rng.gen_range(-359.99..359.99));
        let options = FormatOptions {
            unit: units[rng.gen_range(0..units.len())],
            precision: rng.gen_range(0..7),
            style: styles[rng.gen_range(0..styles.len())],
            sign: signs[rng.gen_range(0..signs.len())],
        };

        let text = angle.format(&options);
        let parsed = Angle::parse(&text, options.unit)
            .unwrap_or_else(|e| panic!("{} did not parse: {}", text, e));

        // Half a unit in the last printed place, with margin
        let last_place = 10f64.powi(-(options.precision as i32));
        let tolerance = match (options.style, options.unit) {
            (ComponentStyle::Sexagesimal, AngleUnit::Degrees) => {
                AngleUnit::Degrees.to_radians(last_place / 3600.0)
            }
            (ComponentStyle::Sexagesimal, AngleUnit::Hours) => {
                AngleUnit::Hours.to_radians(last_place / 3600.0)
            }
            (_, unit) => unit.to_radians(last_place),
        };
        assert!(
            parsed.approx_eq(&angle, tolerance),
            "{:?} formatted as {} parsed back as {:?}",
            angle,
            text,
            parsed
        );
    }
}

#[rstest]
#[case("12:34:56.7", AngleUnit::Hours, 188.736_25)]
#[case("12h34m56.7s", AngleUnit::Degrees, 188.736_25)]
#[case("-12°34'56.7\"", AngleUnit::Hours, -12.582_416_666_666_667)]
#[case("-12d34m56.7s", AngleUnit::Degrees, -12.582_416_666_666_667)]
#[case("-12.345", AngleUnit::Degrees, -12.345)]
#[case("1.5rad", AngleUnit::Degrees, 85.943_669_269_623_49)]
#[case("1.5", AngleUnit::Radians, 85.943_669_269_623_49)]
fn parses_documented_notations(
    #[case] text: &str,
    #[case] unit: AngleUnit,
    #[case] degrees: f64,
) {
    let angle = Angle::parse(text, unit).unwrap();
    assert_relative_eq!(angle.degrees(), degrees, epsilon = 1e-9);
}

#[rstest]
#[case("12:60:00", AngleUnit::Hours, "60")]
#[case("12:30:60", AngleUnit::Hours, "60")]
#[case("24:00:00", AngleUnit::Hours, "24")]
#[case("12:-30:00", AngleUnit::Hours, "-30")]
#[case("12°-30'", AngleUnit::Degrees, "-30")]
#[case("twelve", AngleUnit::Degrees, "twelve")]
fn rejects_malformed_text(
    #[case] text: &str,
    #[case] unit: AngleUnit,
    #[case] offending: &str,
) {
    match Angle::parse(text, unit) {
        Err(GeomError::ParseError { input, .. }) => assert_eq!(input, offending),
        other => panic!("{} gave {:?}", text, other),
    }
}

#[test]
fn scenario_dms_display() {
    assert_eq!(deg(51.5).to_dms().to_string(), "51°30'0.0\"");
}

#[test]
fn scenario_hour_angle_parse() {
    let angle = Angle::parse("12:34:56.7", AngleUnit::Hours).unwrap();
    assert_relative_eq!(angle.hours(), 12.582_416_666_666_667, epsilon = 1e-12);
    assert_relative_eq!(angle.radians(), 188.736_25_f64.to_radians(), epsilon = 1e-12);
}

#[test]
fn scenario_latitude_out_of_range() {
    let result = GeoCoordinate::new(deg(91.0), deg(0.0));
    assert!(matches!(result, Err(GeomError::InvalidCoordinate(_))));
}

#[rstest]
#[case(6.0, 58.0, 180.0)]
#[case(0.0, 15.635_441_348_757_157, 77.369_664_794_798_35)]
#[case(12.0, 15.635_441_348_757_157, 282.630_335_205_201_6)]
fn scenario_known_altitude_azimuth(
    #[case] lst_hours: f64,
    #[case] altitude: f64,
    #[case] azimuth: f64,
) {
    let target = SkyPosition::equatorial(hours(6.0), deg(20.0)).unwrap();
    let observer = GeoCoordinate::from_degrees(52.0, 0.0).unwrap();
    let equatorial = target.as_equatorial().unwrap();

    let horizontal = equatorial.to_horizontal_at_lst(&observer, hours(lst_hours));
    assert_relative_eq!(horizontal.altitude().radians(), altitude.to_radians(), epsilon = 1e-6);
    assert_relative_eq!(horizontal.azimuth().radians(), azimuth.to_radians(), epsilon = 1e-6);
}

#[test]
fn scenario_sidereal_round_trip() {
    let t0 = Clock::universal(7.77e8).unwrap();
    let back = t0.to_sidereal(deg(0.0)).to_universal();
    assert_relative_eq!(back.seconds_since_j2000(), t0.seconds_since_j2000(), epsilon = 1e-9);
    assert_eq!(back.scale(), TimeScale::Universal);
}

#[test]
fn pinned_sidereal_conventions() {
    assert_eq!(SIDEREAL_RATE, 1.002_737_909_350_795);
    assert_eq!(GMST_AT_J2000_H, 18.697_374_558);

    // 2024-03-20 00:00 UT: GMST = 18.697374558 + 24 × rate × D, D = 8844.5
    let clock = Clock::from_datetime(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap());
    assert_relative_eq!(clock.days_since_j2000(), 8844.5, epsilon = 1e-12);
    let expected = (18.697_374_558 + 24.0 * 1.002_737_909_350_795 * 8844.5_f64).rem_euclid(24.0);
    assert_relative_eq!(clock.greenwich_sidereal_time().hours(), expected, epsilon = 1e-8);
}

#[test]
fn pinned_pole_azimuth_is_north() {
    let at = Clock::universal(0.0).unwrap();
    for latitude in [90.0_f64, -90.0] {
        let observer = GeoCoordinate::from_degrees(latitude, 0.0).unwrap();
        for ra in [0.0, 5.0, 13.0] {
            let target = Equatorial::new(hours(ra), deg(latitude.signum() * 30.0)).unwrap();
            let horizontal = target.to_horizontal(&observer, &at);
            assert_eq!(horizontal.azimuth().radians(), 0.0);
            assert_relative_eq!(horizontal.altitude().degrees(), 30.0, epsilon = 1e-9);
            assert!(target.try_to_horizontal(&observer, &at).is_err());
        }
    }
}

#[test]
fn frame_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(424_243);
    for _ in 0..1000 {
        let observer =
            GeoCoordinate::from_degrees(rng.gen_range(-89.0..89.0), rng.gen_range(-180.0..180.0))
                .unwrap();
        let at = Clock::universal(rng.gen_range(-3.0e9..3.0e9)).unwrap();
        let target = SkyPosition::equatorial(
            hours(rng.gen_range(0.0..24.0)),
            deg(rng.gen_range(-89.9..89.9)),
        )
        .unwrap();

        let horizontal = target.to_horizontal(&observer, &at);
        let back = SkyPosition::from(horizontal).to_equatorial(&observer, &at);
        let start = target.as_equatorial().unwrap();

        assert!(back.right_ascension().approx_eq_wrapped(&start.right_ascension(), 1e-9));
        assert!(back.declination().approx_eq(&start.declination(), 1e-9));
        assert_eq!(back.right_ascension().range(), AngleRange::FullTurn);
    }
}

#[test]
fn horizontal_round_trip_through_civil_clock() {
    let observer = GeoCoordinate::parse("51°28'40\"N", "0°0'5\"W").unwrap();
    let at = Clock::from_datetime(Utc.with_ymd_and_hms(2024, 12, 21, 22, 0, 0).unwrap())
        .to_local_civil(observer.longitude(), 0.0)
        .unwrap();
    let horizontal = SkyPosition::horizontal(deg(35.0), deg(210.0)).unwrap();

    let equatorial = horizontal.to_equatorial(&observer, &at);
    let again = equatorial.to_horizontal(&observer, &at);
    assert_relative_eq!(again.altitude().degrees(), 35.0, epsilon = 1e-9);
    assert_relative_eq!(again.azimuth().degrees(), 210.0, epsilon = 1e-9);
}

#[test]
fn motor_mapping_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(424_244);
    for _ in 0..500 {
        let mount =
            MountPosition::new(hours(rng.gen_range(-12.0..12.0)), deg(rng.gen_range(-90.0..90.0)))
                .unwrap();
        let mut ratio = || {
            let magnitude = rng.gen_range(0.01..720.0);
            if rng.gen::<bool>() {
                magnitude
            } else {
                -magnitude
            }
        };
        let (hour_ratio, dec_ratio) = (ratio(), ratio());
        let calibration = MountCalibration::new(
            AxisCalibration::new(deg(rng.gen_range(-720.0..720.0)), hour_ratio).unwrap(),
            AxisCalibration::new(deg(rng.gen_range(-720.0..720.0)), dec_ratio).unwrap(),
        );

        let motors = mount.to_motor_angles(&calibration).unwrap();
        let back = MountPosition::from_motor_angles(&motors, &calibration).unwrap();
        assert!(back.hour_angle().approx_eq_wrapped(&mount.hour_angle(), 1e-9));
        assert!(back.declination().approx_eq(&mount.declination(), 1e-9));
    }
}

#[test]
fn mount_follows_sidereal_clock() {
    let observer = GeoCoordinate::from_degrees(52.0, -1.5).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let lst = Clock::parse(
        "10:00:00",
        TimeScale::Sidereal {
            longitude: observer.longitude(),
        },
        date,
    )
    .unwrap();

    let target = SkyPosition::equatorial(hours(8.0), deg(45.0)).unwrap();
    let mount = MountPosition::from_sky(&target, &lst).unwrap();
    assert_relative_eq!(mount.hour_angle().hours(), 2.0, epsilon = 1e-8);

    // An hour of solar time later the hour angle has grown by one sidereal hour
    let later = lst + chrono::Duration::hours(1);
    let mount = MountPosition::from_sky(&target, &later).unwrap();
    assert_relative_eq!(mount.hour_angle().hours(), 2.0 + SIDEREAL_RATE, epsilon = 1e-8);

    let back = mount.to_sky(&later).unwrap();
    assert_relative_eq!(back.right_ascension().hours(), 8.0, epsilon = 1e-9);
}

#[test]
fn clock_text_round_trip() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
    let scale = TimeScale::LocalCivil {
        longitude: deg(-122.4),
        utc_offset_hours: -7.0,
    };
    let clock = Clock::parse("21:45:30.25", scale, date).unwrap();
    assert_eq!(clock.to_string(), "LCT-07:00 21:45:30.25");

    let reading = clock.to_string();
    let (_, text) = reading.split_once(' ').unwrap();
    let again = Clock::parse(text, scale, date).unwrap();
    assert_relative_eq!(again - clock, 0.0, epsilon = 1e-6);
}
