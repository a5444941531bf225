//! EXIF GPS coordinate normalization.
//!
//! EXIF stores latitude and longitude as three unsigned rationals
//! (degrees, minutes, seconds) plus a one-letter hemisphere reference in a
//! separate tag. Metadata readers hand these over either as integer pairs
//! or in the textual `"num/den"` form; both decode through [`Rational`].
//!
//! Decoding is lenient throughout: missing entries, unparsable text, zero
//! denominators and unknown references all fall back to a neutral value
//! (`0` or positive sign) instead of failing. A photo with broken GPS tags
//! should still import.

/// One EXIF rational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rational {
    pub numerator: f64,
    pub denominator: f64,
}

impl Rational {
    pub fn new(numerator: f64, denominator: f64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A plain number, as written without a `/`.
    pub fn whole(value: f64) -> Self {
        Self::new(value, 1.0)
    }

    /// Parse `"num/den"` or a bare number. Never fails.
    ///
    /// Only the first `/` separates; unparsable parts read as `0`, and a
    /// leading numeric prefix is honored (`"40 deg"` reads as `40`).
    pub fn parse_lenient(text: &str) -> Self {
        match text.split_once('/') {
            Some((num, den)) => Self::new(parse_number(num), parse_number(den)),
            None => Self::whole(parse_number(text)),
        }
    }

    /// Decimal value; `0.0` for a zero denominator or any non-finite result.
    pub fn to_f64(self) -> f64 {
        if self.denominator == 0.0 {
            return 0.0;
        }
        let value = self.numerator / self.denominator;
        if value.is_finite() { value } else { 0.0 }
    }
}

impl From<(u32, u32)> for Rational {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Self::new(f64::from(numerator), f64::from(denominator))
    }
}

impl From<&str> for Rational {
    fn from(text: &str) -> Self {
        Self::parse_lenient(text)
    }
}

/// Longest numeric prefix of `text`, or `0`.
fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// GPS hemisphere reference (`GPSLatitudeRef` / `GPSLongitudeRef`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Recognize `N`, `S`, `E` or `W`, ignoring surrounding whitespace and
    /// NUL padding. Case-sensitive, as EXIF writes them upper case.
    pub fn from_reference(reference: &str) -> Option<Self> {
        match reference.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0') {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    /// `-1` for the southern and western hemispheres, `1` otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Self::South | Self::West => -1.0,
            Self::North | Self::East => 1.0,
        }
    }
}

/// Convert a degrees/minutes/seconds triple to signed decimal degrees.
///
/// Entries past the third are ignored; missing ones count as `0`. An
/// unrecognized reference keeps the value positive.
///
/// ```
/// # use lighttable::gps::{Rational, to_decimal_degrees};
/// let triple = [Rational::from((40, 1)), Rational::from((30, 1)), Rational::from((0, 1))];
/// assert_eq!(to_decimal_degrees(&triple, "N"), 40.5);
/// assert_eq!(to_decimal_degrees(&triple, "S"), -40.5);
/// ```
pub fn to_decimal_degrees(triple: &[Rational], reference: &str) -> f64 {
    let part = |i: usize| triple.get(i).map_or(0.0, |r| r.to_f64());
    let degrees = part(0) + part(1) / 60.0 + part(2) / 3600.0;
    let sign = Hemisphere::from_reference(reference).map_or(1.0, Hemisphere::sign);
    sign * degrees
}

/// [`to_decimal_degrees`] over the textual `"num/den"` form.
pub fn to_decimal_degrees_from_strs(triple: &[&str], reference: &str) -> f64 {
    let parsed: Vec<Rational> = triple.iter().map(|s| Rational::parse_lenient(s)).collect();
    to_decimal_degrees(&parsed, reference)
}
