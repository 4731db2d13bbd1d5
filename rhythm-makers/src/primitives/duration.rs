use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use fraction::{Fraction, Zero};
use serde::{Deserialize, Serialize};

use crate::error::ArithmeticError;

/// Exact duration in whole notes.
///
/// Always reduced and finite, sign is carried by numerator, zero is
/// never negative. No constructor or operator makes NaN or infinity:
/// zero denominators and division by zero are errors. Unlike floats, sums of durations are exact, so
/// `1/3 + 1/3 + 1/3 == 1`.
///
/// # Example
/// ```
/// # use rhythm_makers::primitives::Duration;
/// let third = Duration::new(1, 3).unwrap();
/// assert_eq!(third + third + third, Duration::from_integer(1));
/// assert_eq!(Duration::new(6, -8).unwrap().to_reduced_form(), (-3, 4));
/// assert!(Duration::new(1, 0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDuration", into = "RawDuration")]
pub struct Duration {
    fraction: Fraction,
}

#[derive(Serialize, Deserialize)]
struct RawDuration {
    numerator: i64,
    denominator: i64,
}
impl TryFrom<RawDuration> for Duration {
    type Error = ArithmeticError;
    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}
impl From<Duration> for RawDuration {
    fn from(duration: Duration) -> Self {
        let (numerator, denominator) = duration.to_reduced_form();
        Self {
            numerator,
            denominator: denominator as i64,
        }
    }
}

impl Duration {
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, ArithmeticError> {
        if denominator == 0 {
            return Err(ArithmeticError::ZeroDenominator { numerator });
        }
        let negative = (numerator < 0) != (denominator < 0);
        let (num, den) = (numerator.unsigned_abs(), denominator.unsigned_abs());
        let fraction = match negative && num != 0 {
            true => Fraction::new_neg(num, den),
            false => Fraction::new(num, den),
        };
        Ok(Self::from_fraction(fraction))
    }

    /// Duration of `numerator / denominator` for a denominator, known
    /// to be positive.
    pub fn from_parts(numerator: i64, denominator: u64) -> Self {
        let den = denominator.max(1);
        let fraction = match numerator < 0 {
            true => Fraction::new_neg(numerator.unsigned_abs(), den),
            false => Fraction::new(numerator.unsigned_abs(), den),
        };
        Self::from_fraction(fraction)
    }

    pub fn from_integer(value: i64) -> Self {
        Self::from_parts(value, 1)
    }

    pub fn zero() -> Self {
        Self {
            fraction: Fraction::zero(),
        }
    }

    /// Normalizes zero, so `-0` and `0` hash the same.
    fn from_fraction(fraction: Fraction) -> Self {
        debug_assert!(
            !fraction.is_nan() && !fraction.is_infinite(),
            "duration is not finite: {fraction}"
        );
        match fraction.is_zero() {
            true => Self::zero(),
            false => Self { fraction },
        }
    }

    /// Signed numerator of the reduced form.
    ///
    /// Durations are finite, so the fraction always has a numerator.
    pub fn numerator(&self) -> i64 {
        let numer = self.fraction.numer().copied().unwrap_or(0) as i64;
        match self.fraction.is_sign_negative() {
            true => -numer,
            false => numer,
        }
    }
    /// Positive denominator of the reduced form.
    pub fn denominator(&self) -> u64 {
        self.fraction.denom().copied().unwrap_or(1)
    }
    pub fn to_reduced_form(&self) -> (i64, u64) {
        (self.numerator(), self.denominator())
    }
    pub fn get(&self) -> Fraction {
        self.fraction
    }

    pub fn is_zero(&self) -> bool {
        self.fraction.is_zero()
    }
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && !self.fraction.is_sign_negative()
    }
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.fraction.is_sign_negative()
    }
    pub fn abs(&self) -> Self {
        Self::from_fraction(self.fraction.abs())
    }

    pub fn mul_int(&self, factor: i64) -> Self {
        *self * Self::from_integer(factor)
    }

    pub fn checked_div(&self, rhs: Self) -> Result<Self, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero(*self));
        }
        Ok(Self::from_fraction(self.fraction / rhs.fraction))
    }

    /// Whole part, rounded toward negative infinity.
    pub fn floor(&self) -> i64 {
        self.numerator().div_euclid(self.denominator() as i64)
    }

    pub fn is_integer(&self) -> bool {
        self.denominator() == 1
    }
}

impl Add for Duration {
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_fraction(self.fraction + rhs.fraction)
    }
    type Output = Self;
}
impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}
impl Sub for Duration {
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_fraction(self.fraction - rhs.fraction)
    }
    type Output = Self;
}
impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs
    }
}
impl Mul for Duration {
    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_fraction(self.fraction * rhs.fraction)
    }
    type Output = Self;
}
impl Neg for Duration {
    fn neg(self) -> Self::Output {
        Self::from_fraction(-self.fraction)
    }
    type Output = Self;
}
impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, d| acc + d)
    }
}
impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cross-multiplication keeps the comparison exact.
        let lhs = self.numerator() as i128 * other.denominator() as i128;
        let rhs = other.numerator() as i128 * self.denominator() as i128;
        lhs.cmp(&rhs)
    }
}
impl Default for Duration {
    fn default() -> Self {
        Self::zero()
    }
}
impl From<i64> for Duration {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}
impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self)
    }
}
impl FromStr for Duration {
    type Err = ArithmeticError;

    /// Parses `"3/4"`, `"-1/8"` or `"2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |token: &str| -> Result<i64, ArithmeticError> {
            token
                .trim()
                .parse::<i64>()
                .map_err(|_| ArithmeticError::Parse(s.to_string()))
        };
        match s.split_once('/') {
            None => Ok(Self::from_integer(parse(s)?)),
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
        }
    }
}
