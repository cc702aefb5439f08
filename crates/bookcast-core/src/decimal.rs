//! Precision-safe decimal types for order-book data.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. On-chain quantities
//! exceed the f64 mantissa range, so floating point is never an option here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Round down to the nearest multiple of `bucket`.
    ///
    /// Used for bid-side price grouping: a bid never moves up a bucket.
    #[inline]
    pub fn bucket_down(&self, bucket: Decimal) -> Self {
        if bucket.is_zero() {
            return *self;
        }
        Self((self.0 / bucket).floor() * bucket)
    }

    /// Round up to the nearest multiple of `bucket`.
    ///
    /// Used for ask-side price grouping: an ask never moves down a bucket.
    #[inline]
    pub fn bucket_up(&self, bucket: Decimal) -> Self {
        if bucket.is_zero() {
            return *self;
        }
        Self((self.0 / bucket).ceil() * bucket)
    }

    /// Render as a plain base-10 string with trailing zeros stripped.
    pub fn render(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Price {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Size/quantity with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Render as a plain base-10 string with trailing zeros stripped.
    pub fn render(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_bucket_down() {
        let price = Price::new(dec!(101.7));
        assert_eq!(price.bucket_down(dec!(5)).inner(), dec!(100));

        // Exact multiple stays put
        let price = Price::new(dec!(100));
        assert_eq!(price.bucket_down(dec!(5)).inner(), dec!(100));
    }

    #[test]
    fn test_price_bucket_up() {
        let price = Price::new(dec!(101.2));
        assert_eq!(price.bucket_up(dec!(5)).inner(), dec!(105));

        let price = Price::new(dec!(105));
        assert_eq!(price.bucket_up(dec!(5)).inner(), dec!(105));
    }

    #[test]
    fn test_zero_bucket_is_identity() {
        let price = Price::new(dec!(101.7));
        assert_eq!(price.bucket_down(dec!(0)), price);
        assert_eq!(price.bucket_up(dec!(0)), price);
    }

    #[test]
    fn test_render_strips_trailing_zeros() {
        assert_eq!(Price::new(dec!(100.00)).render(), "100");
        assert_eq!(Price::new(dec!(1.10)).render(), "1.1");
        assert_eq!(Size::new(dec!(0.500)).render(), "0.5");
        assert_eq!(Size::new(dec!(0)).render(), "0");
    }

    #[test]
    fn test_render_preserves_high_precision() {
        // Beyond f64 mantissa range, must survive exactly
        let size = Size::new(dec!(9007199254740993.000000001));
        assert_eq!(size.render(), "9007199254740993.000000001");
    }

    #[test]
    fn test_size_addition() {
        let total = Size::new(dec!(1.5)) + Size::new(dec!(2.25));
        assert_eq!(total.inner(), dec!(3.75));
    }
}
