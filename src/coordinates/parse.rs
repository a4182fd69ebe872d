//! Angle parsing from text.
//!
//! Accepted notations:
//!
//! ```text
//! Decimal in the hinted unit:   -12.345
//! Decimal with a unit marker:   12.5°   12.5d   3.25h   0.25rad   0.25r
//! Degrees-minutes-seconds:      12°34'56.7"   12d34m56.7s   12°34'
//! Hours-minutes-seconds:        12h34m56.7s
//! Colon sexagesimal:            12:34:56.7    12:34
//! ```
//!
//! A unit marker in the text wins over the unit hint. Colon notation takes its
//! unit from the hint, which must be degrees or hours. Radians are only read
//! when tagged, either by marker or by an explicit radians hint.
//!
//! A sign is only valid as the first character: `-12:34:56` parses,
//! `12:-34:56` is rejected as an ambiguous sign.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::angle::{Angle, AngleUnit};
use crate::{GeomError, Result};

lazy_static! {
    static ref COLON_RE: Regex =
        Regex::new(r"^(\d+)\s*:\s*(\d+)(?:\s*:\s*(\d+(?:\.\d*)?))?$").unwrap();

    static ref MARKED_RE: Regex = Regex::new(
        r#"(?x)
        ^(\d+(?:\.\d*)?)\s*([°dDhH])              # whole units and marker
        (?:\s*(\d+(?:\.\d*)?)\s*['′mM])?          # optional minutes
        (?:\s*(\d+(?:\.\d*)?)\s*(?:''|["″sS]))?   # optional seconds
        $"#
    )
    .unwrap();

    static ref RADIANS_RE: Regex = Regex::new(
        r"^(\d+(?:\.\d*)?(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)\s*(?:rad|r)$"
    )
    .unwrap();

    static ref DECIMAL_RE: Regex =
        Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").unwrap();
}

impl Angle {
    /// Parses an angle, reading unmarked numbers in `unit`
    ///
    /// The result is unbounded and tagged with the unit the text was
    /// actually read in.
    ///
    /// # Errors
    ///
    /// [`GeomError::ParseError`] carrying the offending part of the text when
    /// the notation is malformed, minutes or seconds reach 60, a sexagesimal
    /// hour value reaches 24, a non-final component has a fraction, or a sign
    /// appears anywhere but at the start.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stellargeom::coordinates::angle::{Angle, AngleUnit};
    ///
    /// let ra = Angle::parse("12:34:56.7", AngleUnit::Hours).unwrap();
    /// assert!((ra.degrees() - 188.73625).abs() < 1e-9);
    ///
    /// let dec = Angle::parse("-12d34m56.7s", AngleUnit::Degrees).unwrap();
    /// assert!((dec.degrees() + 12.582416666).abs() < 1e-8);
    ///
    /// assert!(Angle::parse("12:60:00", AngleUnit::Hours).is_err());
    /// ```
    pub fn parse(text: &str, unit: AngleUnit) -> Result<Angle> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GeomError::parse(text, "empty angle text"));
        }

        let (negative, body) = match trimmed.chars().next() {
            Some('-') => (true, trimmed[1..].trim_start()),
            Some('+') => (false, trimmed[1..].trim_start()),
            _ => (false, trimmed),
        };
        check_sign_placement(body)?;
        if body.is_empty() {
            return Err(GeomError::parse(trimmed, "sign without a value"));
        }

        let (magnitude, unit) = if let Some(caps) = COLON_RE.captures(body) {
            parse_colon(&caps, unit, trimmed)?
        } else if let Some(caps) = MARKED_RE.captures(body) {
            parse_marked(&caps)?
        } else if let Some(caps) = RADIANS_RE.captures(body) {
            (number(&caps[1])?, AngleUnit::Radians)
        } else if DECIMAL_RE.is_match(body) {
            (number(body)?, unit)
        } else {
            return Err(GeomError::parse(body, "unrecognised angle notation"));
        };

        let value = if negative { -magnitude } else { magnitude };
        Angle::new(value, unit).map_err(|_| GeomError::parse(body, "value out of range"))
    }
}

impl FromStr for Angle {
    type Err = GeomError;

    /// Parses with a degrees hint; see [`Angle::parse`].
    fn from_str(s: &str) -> Result<Self> {
        Angle::parse(s, AngleUnit::Degrees)
    }
}

/// Rejects any `+`/`-` after the leading sign, except inside an exponent.
fn check_sign_placement(body: &str) -> Result<()> {
    let mut previous = None;
    for (index, c) in body.char_indices() {
        if (c == '+' || c == '-') && !matches!(previous, Some('e') | Some('E')) {
            let tail = &body[index..];
            let end = tail[1..]
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .map_or(tail.len(), |pos| pos + 1);
            return Err(GeomError::parse(&tail[..end], "ambiguous sign placement"));
        }
        previous = Some(c);
    }
    Ok(())
}

fn number(text: &str) -> Result<f64> {
    let value = text
        .parse::<f64>()
        .map_err(|_| GeomError::parse(text, "not a number"))?;
    if !value.is_finite() {
        return Err(GeomError::parse(text, "value out of range"));
    }
    Ok(value)
}

fn parse_colon(caps: &Captures, unit: AngleUnit, trimmed: &str) -> Result<(f64, AngleUnit)> {
    if unit == AngleUnit::Radians {
        return Err(GeomError::parse(
            trimmed,
            "sexagesimal notation needs a degrees or hours unit",
        ));
    }
    let whole = &caps[1];
    let minutes = &caps[2];
    let seconds = caps.get(3).map(|m| m.as_str());
    let value = combine(whole, Some(minutes), seconds, unit)?;
    Ok((value, unit))
}

fn parse_marked(caps: &Captures) -> Result<(f64, AngleUnit)> {
    let unit = match &caps[2] {
        "h" | "H" => AngleUnit::Hours,
        _ => AngleUnit::Degrees,
    };
    let minutes = caps.get(3).map(|m| m.as_str());
    let seconds = caps.get(4).map(|m| m.as_str());
    let value = combine(&caps[1], minutes, seconds, unit)?;
    Ok((value, unit))
}

/// Combines whole/minutes/seconds text into one decimal value.
///
/// Only the last component present may carry a fraction.
fn combine(
    whole: &str,
    minutes: Option<&str>,
    seconds: Option<&str>,
    unit: AngleUnit,
) -> Result<f64> {
    let sexagesimal = minutes.is_some() || seconds.is_some();
    if sexagesimal && whole.contains('.') {
        return Err(GeomError::parse(
            whole,
            "only the last component may have a fraction",
        ));
    }
    if seconds.is_some() && minutes.is_some_and(|m| m.contains('.')) {
        return Err(GeomError::parse(
            minutes.unwrap_or_default(),
            "only the last component may have a fraction",
        ));
    }

    let whole_value = number(whole)?;
    if sexagesimal && unit == AngleUnit::Hours && whole_value >= 24.0 {
        return Err(GeomError::parse(whole, "hours must be below 24"));
    }

    let minutes_value = match minutes {
        Some(text) => {
            let value = number(text)?;
            if value >= 60.0 {
                return Err(GeomError::parse(text, "minutes must be below 60"));
            }
            value
        }
        None => 0.0,
    };

    let seconds_value = match seconds {
        Some(text) => {
            let value = number(text)?;
            if value >= 60.0 {
                return Err(GeomError::parse(text, "seconds must be below 60"));
            }
            value
        }
        None => 0.0,
    };

    Ok(whole_value + minutes_value / 60.0 + seconds_value / 3600.0)
}
