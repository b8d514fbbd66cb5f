//! Cart normalization and order pricing.
//!
//! Clients send cart lines with loosely typed fields; everything is coerced
//! server-side before pricing. Quantities floor to 1, unparseable prices
//! become zero, and an unparseable or missing product id becomes a line with
//! no catalog reference (the name/price snapshot is still stored).

use minicart_core::{Money, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Free shipping applies at or above this subtotal.
const FREE_SHIPPING_THRESHOLD: Money = Money::from_units(999);
/// Flat shipping for orders below the threshold.
const FLAT_SHIPPING: Money = Money::from_units(99);

/// A cart line as received from the client. `id`, `quantity`, and `price`
/// accept any JSON value and are coerced in [`normalize_line`].
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub price: Value,
}

/// A cart line after coercion, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Captured totals for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

/// Coerce a JSON value to an integer, accepting numbers and numeric strings.
/// Fractional values are truncated.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Coerce a JSON value to a monetary amount in major units, accepting numbers
/// and numeric strings. Anything else yields `None`.
fn as_money(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => {
            if let Some(units) = n.as_i64() {
                Some(Money::from_units(units))
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64_retain)
                    .and_then(|d| Money::from_decimal(d.round_dp(2)))
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .ok()
            .and_then(|d| Money::from_decimal(d.round_dp(2))),
        _ => None,
    }
}

/// Coerce one cart line. A quantity that is missing, unparseable, or below 1
/// becomes 1; an unparseable price becomes zero; an id that is missing,
/// unparseable, or zero drops the catalog reference.
#[must_use]
pub fn normalize_line(line: &CartLine) -> NormalizedLine {
    let quantity = as_integer(&line.quantity).map_or(1, |q| q.max(1));
    let unit_price = as_money(&line.price).unwrap_or(Money::ZERO);
    let product_id = as_integer(&line.id)
        .filter(|id| *id != 0)
        .map(ProductId::new);

    NormalizedLine {
        product_id,
        name: line.name.clone(),
        quantity,
        unit_price,
    }
}

/// Price a normalized cart. Shipping is free for an empty subtotal and at or
/// above the free-shipping threshold, flat otherwise.
#[must_use]
pub fn price_cart(lines: &[NormalizedLine]) -> OrderPricing {
    let subtotal: Money = lines
        .iter()
        .map(|line| line.unit_price * line.quantity)
        .sum();

    let shipping = if subtotal == Money::ZERO || subtotal >= FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        FLAT_SHIPPING
    };

    OrderPricing {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn line(id: Value, name: &str, quantity: Value, price: Value) -> CartLine {
        CartLine {
            id,
            name: name.to_owned(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_normalize_well_formed_line() {
        let normalized = normalize_line(&line(json!(3), "Mug", json!(2), json!(19.99)));
        assert_eq!(normalized.product_id, Some(ProductId::new(3)));
        assert_eq!(normalized.quantity, 2);
        assert_eq!(normalized.unit_price, Money::from_cents(1999));
    }

    #[test]
    fn test_quantity_floors_to_one() {
        for quantity in [json!(0), json!(-5), json!("abc"), Value::Null] {
            let normalized = normalize_line(&line(json!(1), "Mug", quantity, json!(10)));
            assert_eq!(normalized.quantity, 1);
        }
    }

    #[test]
    fn test_fractional_quantity_truncates() {
        let normalized = normalize_line(&line(json!(1), "Mug", json!(2.9), json!(10)));
        assert_eq!(normalized.quantity, 2);
    }

    #[test]
    fn test_unparseable_price_becomes_zero() {
        let normalized = normalize_line(&line(json!(1), "Mug", json!(1), json!("free")));
        assert_eq!(normalized.unit_price, Money::ZERO);
    }

    #[test]
    fn test_numeric_string_fields() {
        let normalized = normalize_line(&line(json!("7"), "Mug", json!("3"), json!("19.99")));
        assert_eq!(normalized.product_id, Some(ProductId::new(7)));
        assert_eq!(normalized.quantity, 3);
        assert_eq!(normalized.unit_price, Money::from_cents(1999));
    }

    #[test]
    fn test_extreme_prices_do_not_panic() {
        let normalized = normalize_line(&line(
            json!(1),
            "Gold bar",
            json!(1),
            json!(9_223_372_036_854_775_807_i64),
        ));
        assert_eq!(normalized.unit_price, Money::from_cents(i64::MAX));

        let pricing = price_cart(&[normalized]);
        assert_eq!(pricing.shipping, Money::ZERO);
        assert_eq!(pricing.total, Money::from_cents(i64::MAX));

        // A numeric string beyond decimal range coerces like any other
        // unparseable price.
        let normalized = normalize_line(&line(
            json!(1),
            "Moon",
            json!(1),
            json!("99999999999999999999999999999999"),
        ));
        assert_eq!(normalized.unit_price, Money::ZERO);
    }

    #[test]
    fn test_unparseable_id_drops_reference() {
        for id in [json!("not-an-id"), Value::Null, json!(0)] {
            let normalized = normalize_line(&line(id, "Mug", json!(1), json!(10)));
            assert_eq!(normalized.product_id, None);
        }
    }

    fn priced(unit_price: Money) -> OrderPricing {
        price_cart(&[NormalizedLine {
            product_id: None,
            name: "Item".to_owned(),
            quantity: 1,
            unit_price,
        }])
    }

    #[test]
    fn test_shipping_thresholds() {
        assert_eq!(priced(Money::ZERO).shipping, Money::ZERO);
        assert_eq!(priced(Money::from_units(1)).shipping, Money::from_units(99));
        assert_eq!(priced(Money::from_units(998)).shipping, Money::from_units(99));
        assert_eq!(priced(Money::from_cents(99_899)).shipping, Money::from_units(99));
        assert_eq!(priced(Money::from_units(999)).shipping, Money::ZERO);
        assert_eq!(priced(Money::from_cents(99_901)).shipping, Money::ZERO);
        assert_eq!(priced(Money::from_units(1500)).shipping, Money::ZERO);
    }

    #[test]
    fn test_total_includes_shipping() {
        let pricing = priced(Money::from_units(100));
        assert_eq!(pricing.subtotal, Money::from_units(100));
        assert_eq!(pricing.total, Money::from_units(199));
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let lines = vec![
            NormalizedLine {
                product_id: Some(ProductId::new(1)),
                name: "A".to_owned(),
                quantity: 2,
                unit_price: Money::from_cents(1050),
            },
            NormalizedLine {
                product_id: Some(ProductId::new(2)),
                name: "B".to_owned(),
                quantity: 1,
                unit_price: Money::from_cents(500),
            },
        ];
        let pricing = price_cart(&lines);
        assert_eq!(pricing.subtotal, Money::from_cents(2600));
    }
}
