pub mod angle;
pub mod format;
pub mod geo;
pub mod parse;

pub use angle::{Angle, AngleRange, AngleUnit, Sexagesimal};
pub use format::{ComponentStyle, FormatOptions, SignStyle};
pub use geo::GeoCoordinate;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_format_then_parse_recovers_angle() {
        let angles = [
            Angle::from_degrees(51.5).unwrap(),
            Angle::from_degrees(-12.582_416_666).unwrap(),
            Angle::from_hours(12.582_416_666).unwrap(),
            Angle::from_hours(-3.0).unwrap(),
            Angle::from_radians(0.898_855).unwrap(),
        ];
        let options = [
            FormatOptions::sexagesimal(AngleUnit::Degrees, 4),
            FormatOptions::sexagesimal(AngleUnit::Hours, 4),
            FormatOptions::decimal(AngleUnit::Degrees, 9),
            FormatOptions::decimal(AngleUnit::Hours, 9).with_sign(SignStyle::Always),
            FormatOptions::decimal(AngleUnit::Radians, 9),
        ];

        for angle in angles {
            for option in options {
                let text = angle.format(&option);
                let parsed = Angle::parse(&text, option.unit).unwrap();
                // Tolerance is one unit in the last printed digit
                assert!(
                    parsed.approx_eq(&angle, 1e-6),
                    "{:?} -> {} -> {:?}",
                    angle,
                    text,
                    parsed
                );
            }
        }
    }

    #[test]
    fn test_display_parses_back_in_natural_unit() {
        let ra = Angle::from_hours(6.75).unwrap();
        let parsed = Angle::parse(&ra.to_string(), ra.unit()).unwrap();
        assert_relative_eq!(parsed.hours(), 6.75, epsilon = 1e-9);

        let lat = Angle::from_degrees(-33.8688).unwrap();
        let parsed: Angle = lat.to_string().parse().unwrap();
        assert_relative_eq!(parsed.degrees(), -33.8688, epsilon = 1e-4);
    }
}
