//! Measurement parsing for tape-measure style input
//!
//! Installers write widths the way they read them off a tape: `36`, `35.75`,
//! `3/8` or `35 3/4`. Everything here works in inches.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a piece of text is not a usable measurement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    #[error("measurement is empty")]
    Empty,

    #[error("'{0}' is not a measurement (use 12.5, 3/8 or 12 3/8)")]
    Malformed(String),

    #[error("'{0}' has a zero denominator")]
    ZeroDenominator(String),
}

/// Parse a decimal, simple fraction or mixed fraction into inches.
///
/// The fractional part of a mixed fraction takes the sign of the whole
/// number, so `-2 1/4` is `-2.25`. A zero whole number counts as positive.
pub fn parse_measurement(raw: &str) -> Result<f64, MeasurementError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(MeasurementError::Empty);
    }

    if is_decimal(text) {
        return text
            .parse::<f64>()
            .map_err(|_| MeasurementError::Malformed(text.to_string()));
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [whole, fraction] if is_integer(whole, true) => {
            let (num, den) = split_fraction(fraction, false, text)?;
            let whole: f64 = whole
                .parse()
                .map_err(|_| MeasurementError::Malformed(text.to_string()))?;
            let sign = if whole == 0.0 { 1.0 } else { whole.signum() };
            Ok(whole + sign * (num / den))
        }
        [fraction] if fraction.contains('/') => {
            let (num, den) = split_fraction(fraction, true, text)?;
            Ok(num / den)
        }
        _ => Err(MeasurementError::Malformed(text.to_string())),
    }
}

/// Format inches with three decimals, rounding ties away from zero
pub fn format_inches(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{:.3}", rounded)
}

/// Format inches as a tape reading to the nearest `1/denominator`
///
/// `12.375` with denominator 16 becomes `12 3/8`.
pub fn format_fraction(value: f64, denominator: u32) -> String {
    let denominator = denominator.max(1);
    let ticks = (value.abs() * f64::from(denominator)).round() as u64;
    let den = u64::from(denominator);
    let whole = ticks / den;
    let mut num = ticks % den;
    let mut den = den;

    if num > 0 {
        let divisor = gcd(num, den);
        num /= divisor;
        den /= divisor;
    }

    let sign = if value < 0.0 && ticks > 0 { "-" } else { "" };
    match (whole, num) {
        (w, 0) => format!("{}{}", sign, w),
        (0, n) => format!("{}{}/{}", sign, n, den),
        (w, n) => format!("{}{} {}/{}", sign, w, n, den),
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn is_integer(s: &str, signed: bool) -> bool {
    let digits = if signed {
        s.strip_prefix('-').unwrap_or(s)
    } else {
        s
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => is_integer(int, true) && is_integer(frac, false),
        None => is_integer(s, true),
    }
}

fn split_fraction(s: &str, signed: bool, text: &str) -> Result<(f64, f64), MeasurementError> {
    let malformed = || MeasurementError::Malformed(text.to_string());

    let (num, den) = s.split_once('/').ok_or_else(malformed)?;
    if !is_integer(num, signed) || !is_integer(den, false) {
        return Err(malformed());
    }

    let num: f64 = num.parse().map_err(|_| malformed())?;
    let den: f64 = den.parse().map_err(|_| malformed())?;
    if den == 0.0 {
        return Err(MeasurementError::ZeroDenominator(text.to_string()));
    }
    Ok((num, den))
}

/// A parsed measurement in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Measurement(f64);

impl Measurement {
    pub fn inches(self) -> f64 {
        self.0
    }
}

impl FromStr for Measurement {
    type Err = MeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_measurement(s).map(Measurement)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_inches(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_parse_decimal() {
        assert!(approx(parse_measurement("12.5").unwrap(), 12.5));
        assert!(approx(parse_measurement("  36 ").unwrap(), 36.0));
        assert!(approx(parse_measurement("-0.25").unwrap(), -0.25));
    }

    #[test]
    fn test_parse_simple_fraction() {
        assert!(approx(parse_measurement("3/8").unwrap(), 0.375));
        assert!(approx(parse_measurement("-1/4").unwrap(), -0.25));
    }

    #[test]
    fn test_parse_mixed_fraction() {
        assert!(approx(parse_measurement("12 3/8").unwrap(), 12.375));
        assert!(approx(parse_measurement("12\t 3/8").unwrap(), 12.375));
    }

    #[test]
    fn test_mixed_fraction_follows_whole_sign() {
        assert!(approx(parse_measurement("-2 1/4").unwrap(), -2.25));
        assert!(approx(parse_measurement("0 1/4").unwrap(), 0.25));
        assert!(approx(parse_measurement("-0 1/4").unwrap(), 0.25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_measurement("abc"),
            Err(MeasurementError::Malformed("abc".to_string()))
        );
        assert_eq!(parse_measurement(""), Err(MeasurementError::Empty));
        assert_eq!(parse_measurement("   "), Err(MeasurementError::Empty));
        for bad in ["12.", ".5", "+3", "1/2/3", "12 3", "12 -3/8", "3/-8", "1 2 3/4", "12 3/8in"] {
            assert!(parse_measurement(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_parse_zero_denominator() {
        assert_eq!(
            parse_measurement("5/0"),
            Err(MeasurementError::ZeroDenominator("5/0".to_string()))
        );
        assert_eq!(
            parse_measurement("12 3/00"),
            Err(MeasurementError::ZeroDenominator("12 3/00".to_string()))
        );
    }

    #[test]
    fn test_measurement_from_str() {
        let m: Measurement = "35 3/4".parse().unwrap();
        assert!(approx(m.inches(), 35.75));
        assert_eq!(m.to_string(), "35.750");
        assert!("wide".parse::<Measurement>().is_err());
    }

    #[test]
    fn test_format_inches_rounds_ties_away_from_zero() {
        assert_eq!(format_inches(0.0625), "0.063");
        assert_eq!(format_inches(-0.0625), "-0.063");
        assert_eq!(format_inches(50.0), "50.000");
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(12.375, 16), "12 3/8");
        assert_eq!(format_fraction(0.25, 16), "1/4");
        assert_eq!(format_fraction(-2.25, 16), "-2 1/4");
        assert_eq!(format_fraction(36.0, 16), "36");
        assert_eq!(format_fraction(0.999, 16), "1");
    }
}
