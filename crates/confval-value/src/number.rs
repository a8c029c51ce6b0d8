//! Exact arbitrary-precision numbers.
//!
//! Numbers are stored as normalized rationals so that decimal literals
//! such as `0.1` stay exact and `1`, `1.0` and `10e-1` are the same number.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::ValueError;

/// Largest decimal exponent, and longest fractional part, accepted by
/// [`Number::parse`].
const MAX_EXPONENT: i64 = 10_000;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(BigRational);

impl Number {
    pub fn from_int(i: i64) -> Self {
        Number(BigRational::from_integer(BigInt::from(i)))
    }

    pub fn from_rational(r: BigRational) -> Self {
        Number(r)
    }

    /// Parses decimal text: optional sign, digits with an optional
    /// fractional part, and an optional `e`/`E` exponent.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidNumber(text.to_string());
        let (mantissa, exp) = match text.find(['e', 'E']) {
            Some(i) => {
                let exp = text[i + 1..].parse::<i64>().map_err(|_| invalid())?;
                (&text[..i], exp)
            }
            None => (text, 0),
        };
        if exp.abs() > MAX_EXPONENT {
            return Err(invalid());
        }

        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() as i64 > MAX_EXPONENT {
            return Err(invalid());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{int_part}{frac_part}");
        let mut numer = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            numer = -numer;
        }

        let scale = exp - frac_part.len() as i64;
        let ten = BigInt::from(10);
        let r = if scale >= 0 {
            BigRational::from_integer(numer * ten.pow(scale as u32))
        } else {
            BigRational::new(numer, ten.pow(scale.unsigned_abs() as u32))
        };
        Ok(Number(r))
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        if self.0.is_integer() {
            self.0.numer().to_i64()
        } else {
            None
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::from_int(i)
    }
}

impl From<BigInt> for Number {
    fn from(i: BigInt) -> Self {
        Number(BigRational::from_integer(i))
    }
}

impl FromStr for Number {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::parse(s)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        if r.is_integer() {
            return write!(f, "{}", r.numer());
        }

        // Terminating decimals only have 2s and 5s in the denominator.
        let two = BigInt::from(2);
        let five = BigInt::from(5);
        let mut rest = r.denom().clone();
        let mut twos = 0u32;
        let mut fives = 0u32;
        while (&rest % &two).is_zero() {
            rest /= &two;
            twos += 1;
        }
        while (&rest % &five).is_zero() {
            rest /= &five;
            fives += 1;
        }
        if !rest.is_one() {
            return write!(f, "{}/{}", r.numer(), r.denom());
        }

        let scale = twos.max(fives) as usize;
        let scaled = (r * BigRational::from_integer(BigInt::from(10).pow(scale as u32))).to_integer();
        let mut digits = scaled.abs().to_string();
        if digits.len() <= scale {
            digits = format!("{}{digits}", "0".repeat(scale - digits.len() + 1));
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        let sign = if scaled.is_negative() { "-" } else { "" };
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
