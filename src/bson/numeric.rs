//! Exact canonical form of the numeric BSON kinds.
//!
//! Every finite non-zero number that can be stored as an `i32`, `i64`, `f64` or decimal128 is a
//! rational of the form `±n × 2^a × 5^b` where `n` is coprime to 10. That factorization is
//! unique, so comparing (and hashing) it is an exact numeric comparison across kinds.

/// The canonical numeric value of an `Int32`, `Int64`, `Double` or `Decimal128`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Numeric {
    Zero,
    Finite {
        negative: bool,
        coprime: u128,
        twos: i32,
        fives: i32,
    },
    Infinity {
        negative: bool,
    },
    NaN,
}

impl Numeric {
    pub(crate) fn from_i64(value: i64) -> Self {
        Self::from_parts(value < 0, u128::from(value.unsigned_abs()), 0, 0)
    }

    pub(crate) fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::NaN;
        }
        if value.is_infinite() {
            return Self::Infinity {
                negative: value < 0.0,
            };
        }

        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1 << 52) - 1);
        let (mantissa, exponent) = if biased_exponent == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1 << 52), biased_exponent - 1075)
        };

        Self::from_parts(negative, u128::from(mantissa), exponent, 0)
    }

    /// The value `±coefficient × 10^exponent`.
    pub(crate) fn from_decimal(negative: bool, coefficient: u128, exponent: i32) -> Self {
        Self::from_parts(negative, coefficient, exponent, exponent)
    }

    fn from_parts(negative: bool, mut coprime: u128, mut twos: i32, mut fives: i32) -> Self {
        if coprime == 0 {
            return Self::Zero;
        }

        let trailing = coprime.trailing_zeros();
        coprime >>= trailing;
        twos += trailing as i32;

        while coprime % 5 == 0 {
            coprime /= 5;
            fives += 1;
        }

        Self::Finite {
            negative,
            coprime,
            twos,
            fives,
        }
    }

    /// Converts to an `i64` if the value is an integer in range.
    pub(crate) fn to_i64(self) -> Option<i64> {
        match self {
            Self::Zero => Some(0),
            Self::Finite {
                negative,
                coprime,
                twos,
                fives,
            } => {
                if twos < 0 || fives < 0 {
                    return None;
                }
                let mut magnitude = coprime;
                magnitude = magnitude.checked_mul(2u128.checked_pow(twos as u32)?)?;
                magnitude = magnitude.checked_mul(5u128.checked_pow(fives as u32)?)?;
                if negative {
                    0i128
                        .checked_sub(i128::try_from(magnitude).ok()?)
                        .and_then(|v| i64::try_from(v).ok())
                } else {
                    i64::try_from(magnitude).ok()
                }
            }
            Self::Infinity { .. } | Self::NaN => None,
        }
    }
}
