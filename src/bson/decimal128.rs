//! Module containing functionality related to BSON decimal128 values.

use std::{fmt, str::FromStr};

use crate::{
    bson::numeric::Numeric,
    error::{Error, Result},
};

const EXPONENT_BIAS: i32 = 6176;
const MIN_EXPONENT: i32 = -6176;
const MAX_EXPONENT: i32 = 6111;
const MAX_DIGITS: usize = 34;
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

const SIGN_BIT: u128 = 1 << 127;
const COEFFICIENT_MASK: u128 = (1 << 113) - 1;
const INFINITY_BITS: u128 = 0x7800_0000_0000_0000_0000_0000_0000_0000;
const NAN_BITS: u128 = 0x7c00_0000_0000_0000_0000_0000_0000_0000;

/// A BSON decimal128 value: an IEEE 754-2008 128-bit decimal floating point number, stored in
/// the binary integer decimal encoding.
///
/// Values are parsed from and rendered to strings; arithmetic is left to dedicated decimal
/// libraries.
///
/// ```
/// # use mongodb_core::bson::Decimal128;
/// let d: Decimal128 = "1.618".parse()?;
/// assert_eq!(d.to_string(), "1.618");
/// assert!("123.4.5".parse::<Decimal128>().is_err());
/// # Ok::<(), mongodb_core::error::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Decoded {
    Finite {
        negative: bool,
        coefficient: u128,
        exponent: i32,
    },
    Infinity {
        negative: bool,
    },
    NaN,
}

impl Decimal128 {
    /// Constructs a new `Decimal128` from its little-endian binary representation.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Returns the little-endian binary representation of this value.
    pub const fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    /// Whether this value is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.decode(), Decoded::NaN)
    }

    /// Whether this value is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self.decode(), Decoded::Infinity { .. })
    }

    pub(crate) fn from_i64(value: i64) -> Self {
        Self::encode(value < 0, u128::from(value.unsigned_abs()), 0)
    }

    pub(crate) fn to_numeric(self) -> Numeric {
        match self.decode() {
            Decoded::Finite {
                negative,
                coefficient,
                exponent,
            } => Numeric::from_decimal(negative, coefficient, exponent),
            Decoded::Infinity { negative } => Numeric::Infinity { negative },
            Decoded::NaN => Numeric::NaN,
        }
    }

    fn encode(negative: bool, coefficient: u128, exponent: i32) -> Self {
        let mut bits = ((exponent + EXPONENT_BIAS) as u128) << 113 | coefficient;
        if negative {
            bits |= SIGN_BIT;
        }
        Self::from_bytes(bits.to_le_bytes())
    }

    fn special(negative: bool, bits: u128) -> Self {
        let bits = if negative { bits | SIGN_BIT } else { bits };
        Self::from_bytes(bits.to_le_bytes())
    }

    fn decode(&self) -> Decoded {
        let bits = u128::from_le_bytes(self.bytes);
        let negative = bits & SIGN_BIT != 0;

        let (exponent, coefficient) = if (bits >> 125) & 0b11 == 0b11 {
            match (bits >> 122) & 0b1_1111 {
                0b1_1110 => return Decoded::Infinity { negative },
                0b1_1111 => return Decoded::NaN,
                // The implicit `100` prefix always puts the coefficient out of range, which makes
                // the value a non-canonical zero.
                _ => ((bits >> 111) & 0x3fff, 0),
            }
        } else {
            ((bits >> 113) & 0x3fff, bits & COEFFICIENT_MASK)
        };

        Decoded::Finite {
            negative,
            coefficient: if coefficient > MAX_COEFFICIENT {
                0
            } else {
                coefficient
            },
            exponent: exponent as i32 - EXPONENT_BIAS,
        }
    }

    fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            Error::invalid_argument(format!("invalid decimal128 string {s:?}: {reason}"))
        };

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        if body.eq_ignore_ascii_case("infinity") || body.eq_ignore_ascii_case("inf") {
            return Ok(Self::special(negative, INFINITY_BITS));
        }
        if body.eq_ignore_ascii_case("nan") {
            return Ok(Self::special(false, NAN_BITS));
        }

        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(index) => {
                let exponent: i64 = body[index + 1..]
                    .parse()
                    .map_err(|_| invalid("malformed exponent"))?;
                (&body[..index], exponent)
            }
            None => (body, 0),
        };

        let mut digits = String::with_capacity(mantissa.len());
        let mut seen_point = false;
        let mut fraction_digits: i64 = 0;
        for c in mantissa.chars() {
            match c {
                '0'..='9' => {
                    digits.push(c);
                    if seen_point {
                        fraction_digits += 1;
                    }
                }
                '.' if !seen_point => seen_point = true,
                _ => return Err(invalid("unexpected character")),
            }
        }
        if digits.is_empty() {
            return Err(invalid("no digits"));
        }

        let mut exponent = exponent
            .checked_sub(fraction_digits)
            .ok_or_else(|| invalid("exponent out of range"))?;
        let mut significant = digits.trim_start_matches('0');

        if significant.is_empty() {
            let exponent = exponent.clamp(i64::from(MIN_EXPONENT), i64::from(MAX_EXPONENT));
            return Ok(Self::encode(negative, 0, exponent as i32));
        }

        while significant.len() > MAX_DIGITS {
            match significant.strip_suffix('0') {
                Some(rest) => {
                    significant = rest;
                    exponent += 1;
                }
                None => return Err(invalid("too many significant digits")),
            }
        }

        let mut coefficient: u128 = significant
            .parse()
            .map_err(|_| invalid("malformed coefficient"))?;

        while exponent > i64::from(MAX_EXPONENT) {
            match coefficient.checked_mul(10) {
                Some(padded) if padded <= MAX_COEFFICIENT => {
                    coefficient = padded;
                    exponent -= 1;
                }
                _ => return Err(invalid("exponent overflow")),
            }
        }
        while exponent < i64::from(MIN_EXPONENT) {
            if coefficient % 10 != 0 {
                return Err(invalid("exponent underflow"));
            }
            coefficient /= 10;
            exponent += 1;
        }

        Ok(Self::encode(negative, coefficient, exponent as i32))
    }
}

impl FromStr for Decimal128 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, coefficient, exponent) = match self.decode() {
            Decoded::NaN => return f.write_str("NaN"),
            Decoded::Infinity { negative } => {
                return f.write_str(if negative { "-Infinity" } else { "Infinity" })
            }
            Decoded::Finite {
                negative,
                coefficient,
                exponent,
            } => (negative, coefficient, exponent),
        };

        if negative {
            f.write_str("-")?;
        }

        let digits = coefficient.to_string();
        let exponent = i64::from(exponent);
        let adjusted = exponent + digits.len() as i64 - 1;

        if exponent <= 0 && adjusted >= -6 {
            if exponent == 0 {
                return f.write_str(&digits);
            }
            let point = digits.len() as i64 + exponent;
            if point > 0 {
                let (whole, fraction) = digits.split_at(point as usize);
                write!(f, "{whole}.{fraction}")
            } else {
                write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)
            }
        } else {
            let (first, rest) = digits.split_at(1);
            f.write_str(first)?;
            if !rest.is_empty() {
                write!(f, ".{rest}")?;
            }
            write!(f, "E{}{}", if adjusted < 0 { "-" } else { "+" }, adjusted.abs())
        }
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal128(\"{self}\")")
    }
}
