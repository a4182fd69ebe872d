//! Text formatting for angles.
//!
//! All formatting goes through one routine keyed by [`FormatOptions`]:
//!
//! | unit    | decimal       | sexagesimal     |
//! |---------|---------------|-----------------|
//! | degrees | `51.500°`     | `51°30'0.0"`    |
//! | hours   | `12.583h`     | `12:34:56.7`    |
//! | radians | `0.898855rad` | (decimal)       |
//!
//! Radians have no sexagesimal notation, so a sexagesimal request in radians
//! falls back to decimal. Seconds are rounded to the requested precision with
//! carry into minutes and whole units, so `59.96"` at one decimal becomes the
//! next whole minute rather than `60.0"`.
//!
//! Values too large for the seconds field to hold the requested precision
//! (2^53 ticks of the last digit) are rendered decimal whatever the style.
//!
//! Every string produced here is accepted back by [`Angle::parse`] with the
//! same unit, except sexagesimal hour values of 24h and beyond.

use std::fmt;

use super::angle::{Angle, AngleRange, AngleUnit, Sexagesimal};

const MAX_PRECISION: usize = 9;

/// Largest tick count that still resolves the last seconds digit, 2^53
const MAX_EXACT_TICKS: f64 = 9_007_199_254_740_992.0;

/// Whether to render one decimal number or whole/minutes/seconds components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentStyle {
    Decimal,
    Sexagesimal,
}

/// When to print a sign character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignStyle {
    /// `+` for zero and positive values, `-` for negative ones
    Always,
    /// Only negative values carry a sign
    NegativeOnly,
}

/// Formatting configuration for [`Angle::format`]
///
/// `precision` is the number of digits after the decimal point: on the value
/// itself for decimal output, on the seconds component for sexagesimal output.
/// It is capped at 9.
///
/// # Examples
///
/// ```rust
/// use stellargeom::coordinates::angle::{Angle, AngleUnit};
/// use stellargeom::coordinates::format::{FormatOptions, SignStyle};
///
/// let dec = Angle::from_degrees(20.0).unwrap();
/// let options = FormatOptions::sexagesimal(AngleUnit::Degrees, 0).with_sign(SignStyle::Always);
/// assert_eq!(dec.format(&options), "+20°0'0\"");
///
/// let ra = Angle::from_hours(6.5).unwrap();
/// assert_eq!(ra.format(&FormatOptions::decimal(AngleUnit::Hours, 2)), "6.50h");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    pub unit: AngleUnit,
    pub precision: usize,
    pub style: ComponentStyle,
    pub sign: SignStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::natural(AngleUnit::Degrees)
    }
}

impl FormatOptions {
    /// Default options for an angle whose natural unit is `unit`
    ///
    /// Degrees and hours render sexagesimal with one decimal on the seconds;
    /// radians render decimal with six places.
    pub fn natural(unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::Radians => Self::decimal(unit, 6),
            AngleUnit::Degrees | AngleUnit::Hours => Self::sexagesimal(unit, 1),
        }
    }

    pub fn decimal(unit: AngleUnit, precision: usize) -> Self {
        FormatOptions {
            unit,
            precision,
            style: ComponentStyle::Decimal,
            sign: SignStyle::NegativeOnly,
        }
    }

    pub fn sexagesimal(unit: AngleUnit, precision: usize) -> Self {
        FormatOptions {
            unit,
            precision,
            style: ComponentStyle::Sexagesimal,
            sign: SignStyle::NegativeOnly,
        }
    }

    pub fn with_unit(mut self, unit: AngleUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_style(mut self, style: ComponentStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_sign(mut self, sign: SignStyle) -> Self {
        self.sign = sign;
        self
    }
}

impl Angle {
    /// Formats the angle according to `options`
    pub fn format(&self, options: &FormatOptions) -> String {
        let value = self.value_in(options.unit);
        let precision = options.precision.min(MAX_PRECISION);
        // A full-turn angle that rounds up to 360° / 24h is shown as zero
        let wrap = self.range() == AngleRange::FullTurn;

        match (options.style, options.unit) {
            (ComponentStyle::Sexagesimal, AngleUnit::Degrees | AngleUnit::Hours) => {
                render_sexagesimal(value, options.unit, precision, options.sign, wrap)
            }
            _ => render_decimal(value, options.unit, precision, options.sign),
        }
    }
}

impl fmt::Display for Angle {
    /// Formats with the natural options of the angle's unit.
    ///
    /// A precision in the format string (`{:.3}`) overrides the default.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut options = FormatOptions::natural(self.unit());
        if let Some(precision) = f.precision() {
            options.precision = precision;
        }
        f.write_str(&self.format(&options))
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(1).min(MAX_PRECISION);
        f.write_str(&render_sexagesimal(
            self.value(),
            self.unit(),
            precision,
            SignStyle::NegativeOnly,
            false,
        ))
    }
}

fn sign_prefix(negative: bool, sign: SignStyle) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, SignStyle::Always) => "+",
        (false, SignStyle::NegativeOnly) => "",
    }
}

fn render_decimal(value: f64, unit: AngleUnit, precision: usize, sign: SignStyle) -> String {
    let scale = 10f64.powi(precision as i32);
    let negative = value < 0.0 && (value.abs() * scale).round() != 0.0;
    format!(
        "{}{:.*}{}",
        sign_prefix(negative, sign),
        precision,
        value.abs(),
        unit.symbol()
    )
}

/// Renders `value` (degrees or hours) as whole/minutes/seconds.
///
/// Rounding is done once on the total number of seconds, then split, so the
/// seconds and minutes fields never show 60.
pub(crate) fn render_sexagesimal(
    value: f64,
    unit: AngleUnit,
    precision: usize,
    sign: SignStyle,
    wrap_full_turn: bool,
) -> String {
    let scale = 10f64.powi(precision as i32);
    let ticks_per_minute = 60.0 * scale;
    let ticks_per_whole = 3600.0 * scale;

    let total = (value.abs() * ticks_per_whole).round();
    if total >= MAX_EXACT_TICKS {
        return render_decimal(value, unit, precision, sign);
    }
    let mut whole = (total / ticks_per_whole).floor();
    let rest = total - whole * ticks_per_whole;
    let minutes = (rest / ticks_per_minute).floor();
    let seconds = (rest - minutes * ticks_per_minute) / scale;

    if wrap_full_turn && whole >= unit.full_turn() && minutes == 0.0 && seconds == 0.0 {
        whole -= unit.full_turn();
    }
    let negative = value < 0.0 && total != 0.0;
    let prefix = sign_prefix(negative, sign);

    match unit {
        AngleUnit::Hours => {
            let width = if precision > 0 { precision + 3 } else { 2 };
            format!(
                "{}{:02}:{:02}:{:0width$.prec$}",
                prefix,
                whole as u64,
                minutes as u32,
                seconds,
                width = width,
                prec = precision
            )
        }
        _ => format!(
            "{}{}°{}'{:.*}\"",
            prefix, whole as u64, minutes as u32, precision, seconds
        ),
    }
}
