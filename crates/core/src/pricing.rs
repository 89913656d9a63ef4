//! Order pricing: subtotal, shipping, GST and grand total.
//!
//! Rules:
//! - subtotal is the sum of `unit_price * quantity` over all line items
//! - shipping is free when the subtotal is strictly above 500, otherwise a flat 50
//! - tax is a flat 18% GST on the subtotal (never on shipping)
//! - total is subtotal + shipping + tax
//!
//! Subtotal and tax are each rounded half-up to two decimal places, and the
//! total is the exact sum of the rounded parts, so
//! `total == subtotal + shipping_cost + tax` always holds to the paisa.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Money;

/// Orders with a subtotal strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::new(Decimal::from_parts(500, 0, 0, false, 0));

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING: Money = Money::new(Decimal::from_parts(50, 0, 0, false, 0));

/// Goods and Services Tax rate applied to the subtotal (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Errors constructing a [`LineItem`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// Unit price cannot be negative.
    #[error("unit price cannot be negative (got {0})")]
    NegativePrice(Money),
}

/// One product entry in a cart or order.
///
/// Only constructible through [`LineItem::new`], so `quantity >= 1` and
/// `unit_price >= 0` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    unit_price: Money,
    quantity: u32,
}

impl LineItem {
    /// Create a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero or `unit_price` is negative.
    pub const fn new(unit_price: Money, quantity: u32) -> Result<Self, PricingError> {
        if quantity == 0 {
            return Err(PricingError::ZeroQuantity);
        }
        if unit_price.is_negative() {
            return Err(PricingError::NegativePrice(unit_price));
        }
        Ok(Self {
            unit_price,
            quantity,
        })
    }

    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Number of units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Derived totals for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub total: Money,
}

impl PricingResult {
    /// Whether the order qualified for free shipping.
    #[must_use]
    pub const fn has_free_shipping(&self) -> bool {
        self.shipping_cost.is_zero()
    }
}

/// Compute subtotal, shipping, tax and total for `items`.
///
/// An empty slice prices as zero everywhere except shipping, which is the
/// flat charge (0 is not above the threshold).
#[must_use]
pub fn compute_pricing(items: &[LineItem]) -> PricingResult {
    let subtotal = items
        .iter()
        .map(LineItem::line_total)
        .sum::<Money>()
        .round_currency();

    let shipping_cost = if subtotal > FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        FLAT_SHIPPING
    };

    let tax = (subtotal * GST_RATE).round_currency();
    let total = subtotal + shipping_cost + tax;

    PricingResult {
        subtotal,
        shipping_cost,
        tax,
        total,
    }
}

/// Total number of units across `items` (the cart badge count).
#[must_use]
pub fn total_quantity(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn item(price: Decimal, quantity: u32) -> LineItem {
        LineItem::new(Money::new(price), quantity).unwrap()
    }

    #[test]
    fn test_two_item_cart() {
        let items = [item(dec!(300), 2), item(dec!(50), 1)];
        let pricing = compute_pricing(&items);

        assert_eq!(pricing.subtotal, Money::from_units(650));
        assert_eq!(pricing.shipping_cost, Money::ZERO);
        assert_eq!(pricing.tax, Money::from_units(117));
        assert_eq!(pricing.total, Money::from_units(767));
        assert!(pricing.has_free_shipping());
    }

    #[test]
    fn test_empty_cart_still_pays_shipping() {
        let pricing = compute_pricing(&[]);

        assert_eq!(pricing.subtotal, Money::ZERO);
        assert_eq!(pricing.shipping_cost, FLAT_SHIPPING);
        assert_eq!(pricing.tax, Money::ZERO);
        assert_eq!(pricing.total, Money::from_units(50));
    }

    #[test]
    fn test_free_shipping_threshold_is_exclusive() {
        let at_threshold = compute_pricing(&[item(dec!(500.00), 1)]);
        assert_eq!(at_threshold.shipping_cost, Money::from_units(50));

        let just_above = compute_pricing(&[item(dec!(500.01), 1)]);
        assert_eq!(just_above.shipping_cost, Money::ZERO);
    }

    #[test]
    fn test_tax_is_on_subtotal_not_total() {
        let pricing = compute_pricing(&[item(dec!(100), 1)]);

        // 18% of 100, not of 100 + 50 shipping
        assert_eq!(pricing.tax, Money::from_units(18));
        assert_eq!(pricing.total, Money::from_units(168));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 0.25 * 0.18 = 0.045 -> 0.05
        let pricing = compute_pricing(&[item(dec!(0.25), 1)]);
        assert_eq!(pricing.tax, Money::new(dec!(0.05)));

        // 10.99 * 3 = 32.97; 32.97 * 0.18 = 5.9346 -> 5.93
        let pricing = compute_pricing(&[item(dec!(10.99), 3)]);
        assert_eq!(pricing.subtotal, Money::new(dec!(32.97)));
        assert_eq!(pricing.tax, Money::new(dec!(5.93)));
    }

    #[test]
    fn test_total_is_exact_sum_of_parts() {
        let carts = [
            vec![item(dec!(19.99), 7), item(dec!(0.01), 3)],
            vec![item(dec!(333.33), 1), item(dec!(166.67), 1)],
            vec![item(dec!(1234.567), 2)],
            vec![item(dec!(0), 4)],
        ];

        for cart in &carts {
            let p = compute_pricing(cart);
            assert_eq!(p.total, p.subtotal + p.shipping_cost + p.tax);
            assert_eq!(p.tax, (p.subtotal * GST_RATE).round_currency());
        }
    }

    #[test]
    fn test_line_item_rejects_bad_input() {
        assert_eq!(
            LineItem::new(Money::from_units(10), 0),
            Err(PricingError::ZeroQuantity)
        );
        assert!(matches!(
            LineItem::new(Money::new(dec!(-1)), 1),
            Err(PricingError::NegativePrice(_))
        ));
        assert!(LineItem::new(Money::ZERO, 1).is_ok());
    }

    #[test]
    fn test_total_quantity() {
        let items = [item(dec!(300), 2), item(dec!(50), 1)];
        assert_eq!(total_quantity(&items), 3);
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn test_constants() {
        assert_eq!(FREE_SHIPPING_THRESHOLD, Money::from_units(500));
        assert_eq!(FLAT_SHIPPING, Money::from_units(50));
        assert_eq!(GST_RATE, dec!(0.18));
    }
}
