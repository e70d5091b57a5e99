//! [`Money`]-related definitions.

use std::{fmt, iter::Sum, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};

/// Amount of money with exactly two fractional digits.
///
/// Every construction rounds half-to-even to cents, so sums and differences
/// of [`Money`] are always exact.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Number of fractional digits kept by [`Money`].
    pub const SCALE: u32 = 2;

    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] rounding the provided amount half-to-even to
    /// cents.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount.round_dp_with_strategy(
            Self::SCALE,
            RoundingStrategy::MidpointNearestEven,
        );
        if amount.is_zero() {
            amount = Decimal::ZERO;
        }
        amount.rescale(Self::SCALE);
        Self(amount)
    }

    /// Returns the decimal amount of this [`Money`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `self × numerator ÷ denominator` rounded to cents.
    ///
    /// The product is computed before the division, so no precision is lost
    /// on intermediate values. [`None`] is returned on a zero `denominator`.
    #[must_use]
    pub fn prorate(
        self,
        numerator: impl Into<Decimal>,
        denominator: impl Into<Decimal>,
    ) -> Option<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return None;
        }
        Some(Self::new(self.0 * numerator.into() / denominator))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values read from storage may carry a different scale.
        let mut amount = self.0;
        if amount.is_zero() {
            amount = Decimal::ZERO;
        }
        amount.rescale(Self::SCALE);
        write!(f, "{amount}")
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let (major, minor) =
            digits.split_once('.').ok_or("missing fractional part")?;
        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err("invalid integer part");
        }
        if minor.len() != 2 || !minor.bytes().all(|b| b.is_ascii_digit()) {
            return Err("fractional part must have exactly two digits");
        }

        let amount = Decimal::from_str(s).map_err(|_| "invalid amount")?;
        if amount.is_zero() && s.starts_with('-') {
            return Err("zero must not be signed");
        }
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(d)?;
            Self::from_str(&raw).map_err(|e| {
                de::Error::custom(format!("cannot parse `Money`: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(Money::new(decimal("2.345")), money("2.34"));
        assert_eq!(Money::new(decimal("2.355")), money("2.36"));
        assert_eq!(Money::new(decimal("-2.345")), money("-2.34"));
        assert_eq!(Money::new(decimal("2.3451")), money("2.35"));
        assert_eq!(Money::new(decimal("1000")), money("1000.00"));
    }

    #[test]
    fn prorates_before_rounding() {
        assert_eq!(
            money("3000.00").prorate(3, 30),
            Some(money("300.00")),
        );
        assert_eq!(money("1000.00").prorate(1, 3), Some(money("333.33")));
        assert_eq!(money("100.00").prorate(1, 0), None);
    }

    #[test]
    fn arithmetic_is_exact() {
        let parts = [money("0.10"), money("0.20"), money("0.30")];
        assert_eq!(parts.iter().sum::<Money>(), money("0.60"));
        assert_eq!(money("3000.00") - money("3000.00"), Money::ZERO);
        assert_eq!(money("1.00") - money("2.50"), money("-1.50"));
    }

    #[test]
    fn from_str() {
        assert_eq!(money("123.45").amount(), decimal("123.45"));
        assert_eq!(money("-0.01").amount(), decimal("-0.01"));

        assert!(Money::from_str("123").is_err());
        assert!(Money::from_str("123.4").is_err());
        assert!(Money::from_str("123.456").is_err());
        assert!(Money::from_str("1,234.00").is_err());
        assert!(Money::from_str("+1.00").is_err());
        assert!(Money::from_str("-0.00").is_err());
        assert!(Money::from_str(".50").is_err());
        assert!(Money::from_str("1e3.00").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(money("123.45").to_string(), "123.45");
        assert_eq!(Money::new(decimal("123")).to_string(), "123.00");
        assert_eq!(Money::new(decimal("123.5")).to_string(), "123.50");
        assert_eq!(Money::new(decimal("-0.001")).to_string(), "0.00");
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(money("-7.10").to_string(), "-7.10");
    }
}
