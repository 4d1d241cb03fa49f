//! Decimal arithmetic with a fixed number of significant digits.
//!
//! Every operation of [`Precision`] rounds its exact result half-to-even to
//! the configured number of significant digits. The precision is a plain
//! value handed to whoever needs it, so sessions with different requirements
//! never share rounding state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::Result;

pub const DEFAULT_DIGITS: u32 = 10;
pub const MAX_DIGITS: u32 = 18;
const GUARD_DIGITS: u32 = 1;

fn digit_count(value: u128) -> u32 {
    if value == 0 {
        1
    } else {
        value.ilog10() + 1
    }
}

/// A signed decimal number `coefficient * 10^exponent`.
#[derive(Clone, Copy, Debug)]
pub struct Decimal {
    coefficient: i64,
    exponent: i32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        coefficient: 0,
        exponent: 0,
    };
    pub const ONE: Decimal = Decimal {
        coefficient: 1,
        exponent: 0,
    };
    const HALF: Decimal = Decimal {
        coefficient: 5,
        exponent: -1,
    };

    pub const fn new(coefficient: i64, exponent: i32) -> Decimal {
        Decimal {
            coefficient,
            exponent,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient == 0
    }

    pub fn is_negative(&self) -> bool {
        self.coefficient < 0
    }

    pub fn abs(self) -> Decimal {
        Decimal {
            coefficient: self.coefficient.abs(),
            ..self
        }
    }

    fn negate(self) -> Decimal {
        Decimal {
            coefficient: -self.coefficient,
            ..self
        }
    }

    /// Exponent of the most significant digit.
    fn adjusted_exponent(&self) -> i32 {
        self.exponent + digit_count(self.coefficient.unsigned_abs() as u128) as i32 - 1
    }

    pub fn to_f64(&self) -> f64 {
        self.coefficient as f64 * 10f64.powi(self.exponent)
    }
}

fn compare_magnitude(lhs: &Decimal, rhs: &Decimal) -> Ordering {
    let adjusted = lhs.adjusted_exponent().cmp(&rhs.adjusted_exponent());
    if adjusted != Ordering::Equal {
        return adjusted;
    }
    // same leading digit position, so the exponents differ by less than the coefficient width
    let lhs_magnitude = lhs.coefficient.unsigned_abs() as u128;
    let rhs_magnitude = rhs.coefficient.unsigned_abs() as u128;
    match lhs.exponent.cmp(&rhs.exponent) {
        Ordering::Greater => {
            let scale = 10u128.pow((lhs.exponent - rhs.exponent) as u32);
            (lhs_magnitude * scale).cmp(&rhs_magnitude)
        }
        Ordering::Less => {
            let scale = 10u128.pow((rhs.exponent - lhs.exponent) as u32);
            lhs_magnitude.cmp(&(rhs_magnitude * scale))
        }
        Ordering::Equal => lhs_magnitude.cmp(&rhs_magnitude),
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.coefficient.signum().cmp(&other.coefficient.signum());
        if sign != Ordering::Equal || self.is_zero() {
            return sign;
        }
        let magnitude = compare_magnitude(self, other);
        if self.is_negative() {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.coefficient.unsigned_abs().to_string();
        if self.exponent >= 0 {
            return write!(
                f,
                "{}{}{}",
                sign,
                digits,
                "0".repeat(self.exponent as usize)
            );
        }
        let fraction_length = self.exponent.unsigned_abs() as usize;
        if digits.len() > fraction_length {
            let (integer, fraction) = digits.split_at(digits.len() - fraction_length);
            write!(f, "{}{}.{}", sign, integer, fraction)
        } else {
            write!(
                f,
                "{}0.{}{}",
                sign,
                "0".repeat(fraction_length - digits.len()),
                digits
            )
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidDecimal(text.to_owned());
        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(position) => (
                &text[..position],
                text[position + 1..].parse::<i32>().map_err(|_| invalid())?,
            ),
            None => (text, 0),
        };
        let (negative, mantissa) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all_digits = integer
            .chars()
            .chain(fraction.chars())
            .all(|c| c.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits {
            return Err(invalid());
        }

        let digits = format!("{}{}", integer, fraction);
        let significant = digits.trim_start_matches('0');
        let trimmed = significant.trim_end_matches('0');
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }
        if trimmed.len() > MAX_DIGITS as usize {
            return Err(invalid());
        }
        let coefficient: i64 = trimmed.parse().map_err(|_| invalid())?;
        let trailing_zeros = (significant.len() - trimmed.len()) as i32;
        let exponent = i32::try_from(fraction.len())
            .ok()
            .and_then(|fraction_length| exponent.checked_sub(fraction_length))
            .and_then(|exponent| exponent.checked_add(trailing_zeros))
            .ok_or_else(invalid)?;
        Ok(Decimal {
            coefficient: if negative { -coefficient } else { coefficient },
            exponent,
        })
    }
}

/// Rounding context: significant digits kept by every operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    pub fn new(digits: u32) -> Result<Precision> {
        if digits == 0 || digits > MAX_DIGITS {
            return Err(Error::UnsupportedPrecision(digits));
        }
        Ok(Precision { digits })
    }

    /// The finest precision available, used for verifying tables.
    pub fn widest() -> Precision {
        Precision { digits: MAX_DIGITS }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    fn round(&self, coefficient: i128, exponent: i32) -> Decimal {
        if coefficient == 0 {
            return Decimal::ZERO;
        }
        let negative = coefficient < 0;
        let mut magnitude = coefficient.unsigned_abs();
        let mut exponent = exponent;
        let excess = digit_count(magnitude).saturating_sub(self.digits);
        if excess > 0 {
            let divisor = 10u128.pow(excess);
            let quotient = magnitude / divisor;
            let remainder = magnitude % divisor;
            magnitude = match remainder.cmp(&(divisor / 2)) {
                Ordering::Less => quotient,
                Ordering::Greater => quotient + 1,
                Ordering::Equal => quotient + (quotient & 1),
            };
            exponent += excess as i32;
            // carry out of the top digit, e.g. 999 -> 1000
            if digit_count(magnitude) > self.digits {
                magnitude /= 10;
                exponent += 1;
            }
        }
        let coefficient = magnitude as i64;
        Decimal {
            coefficient: if negative { -coefficient } else { coefficient },
            exponent,
        }
    }

    fn round_decimal(&self, value: Decimal) -> Decimal {
        self.round(value.coefficient as i128, value.exponent)
    }

    pub fn add(&self, lhs: Decimal, rhs: Decimal) -> Decimal {
        if lhs.is_zero() {
            return self.round_decimal(rhs);
        }
        if rhs.is_zero() {
            return self.round_decimal(lhs);
        }
        let (larger, smaller) = if lhs.adjusted_exponent() >= rhs.adjusted_exponent() {
            (lhs, rhs)
        } else {
            (rhs, lhs)
        };
        // smaller is below a tenth of the last kept digit even after a borrow
        if smaller.adjusted_exponent() < larger.adjusted_exponent() - self.digits as i32 - 2 {
            return self.round_decimal(larger);
        }
        let exponent = lhs.exponent.min(rhs.exponent);
        let scaled = |value: Decimal| {
            value.coefficient as i128 * 10i128.pow((value.exponent - exponent) as u32)
        };
        self.round(scaled(lhs) + scaled(rhs), exponent)
    }

    pub fn sub(&self, lhs: Decimal, rhs: Decimal) -> Decimal {
        self.add(lhs, rhs.negate())
    }

    pub fn mul(&self, lhs: Decimal, rhs: Decimal) -> Decimal {
        self.round(
            lhs.coefficient as i128 * rhs.coefficient as i128,
            lhs.exponent + rhs.exponent,
        )
    }

    /// Quotient rounded to the precision, `None` when dividing by zero.
    pub fn div(&self, dividend: Decimal, divisor: Decimal) -> Option<Decimal> {
        if divisor.is_zero() {
            return None;
        }
        if dividend.is_zero() {
            return Some(Decimal::ZERO);
        }
        let numerator = dividend.coefficient.unsigned_abs() as u128;
        let denominator = divisor.coefficient.unsigned_abs() as u128;
        // at least one digit beyond the precision, plus a sticky digit for the remainder
        let shift = (self.digits + digit_count(denominator) + 1).saturating_sub(digit_count(numerator));
        let scaled = numerator * 10u128.pow(shift);
        let mut quotient = scaled / denominator;
        let mut exponent = dividend.exponent - divisor.exponent - shift as i32;
        if scaled % denominator != 0 {
            quotient = quotient * 10 + 1;
            exponent -= 1;
        }
        let quotient = quotient as i128;
        let negative = dividend.is_negative() != divisor.is_negative();
        Some(self.round(if negative { -quotient } else { quotient }, exponent))
    }

    /// `numerator / denominator` with a single rounding.
    pub fn ratio(&self, numerator: usize, denominator: usize) -> Option<Decimal> {
        let numerator = Decimal::new(i64::try_from(numerator).ok()?, 0);
        let denominator = Decimal::new(i64::try_from(denominator).ok()?, 0);
        self.div(numerator, denominator)
    }

    /// `low + (high - low) / 2`, which stays inside `[low, high)` whenever
    /// the width spans a few units in the last place.
    pub fn midpoint(&self, low: Decimal, high: Decimal) -> Decimal {
        self.add(low, self.mul(self.sub(high, low), Decimal::HALF))
    }

    /// Unit in the last place of `value` at this precision.
    pub fn ulp(&self, value: Decimal) -> Decimal {
        Decimal {
            coefficient: 1,
            exponent: value.adjusted_exponent() - self.digits as i32 + 1,
        }
    }

    /// Narrowest interval width near `value` that can still be told apart from its neighbours.
    pub fn min_width(&self, value: Decimal) -> Decimal {
        Decimal {
            coefficient: 1,
            exponent: self.ulp(value).exponent + GUARD_DIGITS as i32,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision {
            digits: DEFAULT_DIGITS,
        }
    }
}
