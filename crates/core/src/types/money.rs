//! Fixed-point money representation.
//!
//! Amounts are stored as integer cents so that SQL aggregation (`SUM`) and
//! equality comparisons are exact. The JSON boundary speaks decimal currency
//! units (`19.99`), converted through `rust_decimal` to avoid accumulating
//! float error.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in integer cents.
///
/// Serializes to a JSON number in currency units (e.g. `Money::from_cents(1999)`
/// becomes `19.99`). Deserializes from a JSON number, rounding to cent
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create from an amount in cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create from a whole number of currency units. Saturates at the bounds
    /// of the representable cent range, like the arithmetic impls below.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Create from a decimal amount in currency units, rounding to cents.
    ///
    /// Returns `None` if the amount does not fit in an `i64` cent count.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.round().to_i64())
            .map(Self)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in currency units as a decimal.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            let units = self
                .to_decimal()
                .to_f64()
                .ok_or_else(|| serde::ser::Error::custom("amount not representable"))?;
            serializer.serialize_f64(units)
        }
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a monetary amount in currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from_units(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map(Money::from_units)
            .map_err(|_| E::custom("amount out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Decimal::from_f64_retain(v)
            .and_then(|d| Money::from_decimal(d.round_dp(2)))
            .ok_or_else(|| E::custom("amount out of range"))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// SQLx support (with sqlite feature): stored as INTEGER cents.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Money {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Money {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(cents))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        assert_eq!(Money::from_units(999).cents(), 99_900);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        let d: Decimal = "19.999".parse().unwrap();
        assert_eq!(Money::from_decimal(d).unwrap().cents(), 2000);
    }

    #[test]
    fn test_arithmetic() {
        let subtotal: Money = [Money::from_cents(600_00) * 2, Money::from_cents(50)]
            .into_iter()
            .sum();
        assert_eq!(subtotal, Money::from_cents(1200_50));
    }

    #[test]
    fn test_ordering() {
        assert!(Money::from_units(999) > Money::from_cents(99_899));
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_serialize_whole_units_as_integer() {
        let json = serde_json::to_string(&Money::from_units(1200)).unwrap();
        assert_eq!(json, "1200");
    }

    #[test]
    fn test_serialize_fractional_units() {
        let json = serde_json::to_string(&Money::from_cents(1999)).unwrap();
        assert_eq!(json, "19.99");
    }

    #[test]
    fn test_from_units_saturates_at_bounds() {
        assert_eq!(Money::from_units(i64::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_units(i64::MIN).cents(), i64::MIN);
    }

    #[test]
    fn test_from_decimal_overflow_is_none() {
        assert!(Money::from_decimal(Decimal::MAX).is_none());
        assert!(Money::from_decimal(Decimal::MIN).is_none());
    }

    #[test]
    fn test_deserialize_extreme_integer_saturates() {
        let max: Money = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(max.cents(), i64::MAX);

        let min: Money = serde_json::from_str("-9223372036854775808").unwrap();
        assert_eq!(min.cents(), i64::MIN);
    }

    #[test]
    fn test_deserialize_huge_float_is_an_error() {
        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }

    #[test]
    fn test_serialize_extreme_cents() {
        let json = serde_json::to_string(&Money::from_cents(i64::MAX)).unwrap();
        assert!(!json.is_empty());
    }

    #[test]
    fn test_deserialize_integer_and_float() {
        let a: Money = serde_json::from_str("600").unwrap();
        assert_eq!(a, Money::from_units(600));

        let b: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(b, Money::from_cents(1999));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1999).to_string(), "19.99");
    }
}
